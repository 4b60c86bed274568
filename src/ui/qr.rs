use super::{format_ts, panel};
use crate::app_state::App;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(area);

    let items: Vec<ListItem> = app
        .qr_list
        .iter()
        .map(|e| {
            let status_color = match e.status.as_str() {
                "submitted" => Color::Yellow,
                "missing" => Color::Red,
                _ => Color::Green,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<28}", e.code), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:<24} ", e.item_name)),
                Span::styled(format!("{:<10}", e.status), Style::default().fg(status_color)),
                Span::raw(format!("{:<18} {}", e.submitter, e.location)),
            ]))
        })
        .collect();

    let query_info = if app.qr_query.is_empty() {
        String::new()
    } else {
        format!(" 搜索: \"{}\"", app.qr_query)
    };
    let title = format!("QR Management [{} 条]{}", app.qr_list.len(), query_info);
    let list = List::new(items)
        .block(panel(app, &title, "↑↓ 选择, Enter 链接, w 保存图片, /qr search"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    app.qr_list_state.select(Some(app.selected_index));
    f.render_stateful_widget(list, chunks[0], &mut app.qr_list_state);

    let detail = match app.selected_qr() {
        Some(e) => vec![
            Line::from(vec![
                Span::styled("Item: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{} [#{}] {}", e.item_name, e.item_id, e.category)),
            ]),
            Line::from(vec![
                Span::styled("Created: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format_ts(e.created_at)),
                Span::styled("  Last scan: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(
                    e.last_scanned_at
                        .map(format_ts)
                        .unwrap_or_else(|| "never".to_string()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Submitted by: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(e.submitter.clone()),
            ]),
        ],
        None => vec![Line::from("没有 QR 记录")],
    };
    f.render_widget(
        Paragraph::new(detail).block(Block::default().borders(Borders::ALL).title("QR 详情")),
        chunks[1],
    );
}
