mod analytics;
mod compliance;
mod dashboard;
mod qr;
mod static_pages;
mod submit;

use crate::app_state::{App, FocusArea, InputMode, ViewMode};
use crate::submission::NotificationVariant;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    // 创建布局
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 顶部标题栏
            Constraint::Min(0),    // 中间内容区域
            Constraint::Min(8),    // 底部命令/日志区域
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);

    // 中间内容区域（左侧菜单 + 主视图）
    let middle_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(0)])
        .split(chunks[1]);

    render_left_menu(f, middle_chunks[0], app);
    render_main_view(f, middle_chunks[1], app);
    render_bottom_bar(f, chunks[2], app);

    render_toast(f, middle_chunks[1], app);
}

/// 主视图面板，焦点在主视图时高亮并附加操作提示
pub(crate) fn panel(app: &App, title: &str, hint: &str) -> Block<'static> {
    let focused = app.focus_area == FocusArea::MainView;
    let title = if focused && !hint.is_empty() {
        format!("{} ({})", title, hint)
    } else {
        title.to_string()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        })
}

pub(crate) fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// 文本进度条，pct 取 0..=100
pub(crate) fn bar(pct: u8, width: usize) -> String {
    let filled = (usize::from(pct.min(100)) * width) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub(crate) fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "--".to_string())
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    let user = match &app.user_label {
        Some(name) => Span::styled(format!("  已登录: {}", name), Style::default().fg(Color::White)),
        None => Span::styled("  未登录", Style::default().fg(Color::Red)),
    };
    let title_text = Line::from(vec![
        Span::styled(
            " EcoScan E-Waste Tracker ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Terminal TUI"),
        user,
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(title)
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_left_menu(f: &mut Frame, area: Rect, app: &App) {
    let menu_items: Vec<ListItem> = ViewMode::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let is_selected = i == app.menu_selected_index;
            let is_active = *view == app.view_mode;

            let style = if is_selected {
                if app.focus_area == FocusArea::Menu {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                }
            } else if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            let prefix = if is_active { "● " } else { "○ " };
            ListItem::new(format!("{}{}", prefix, view.title())).style(style)
        })
        .collect();

    let title = if app.focus_area == FocusArea::Menu {
        "菜单 (Enter 确认)"
    } else {
        "菜单 (Esc 切换)"
    };

    let menu =
        List::new(menu_items).block(Block::default().borders(Borders::ALL).title(title).style(
            if app.focus_area == FocusArea::Menu {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            },
        ));

    f.render_widget(menu, area);
}

fn render_main_view(f: &mut Frame, area: Rect, app: &mut App) {
    match app.view_mode {
        ViewMode::Home => static_pages::render_home(f, area, app),
        ViewMode::Dashboard => dashboard::render(f, area, app),
        ViewMode::Submit => submit::render(f, area, app),
        ViewMode::Analytics => analytics::render(f, area, app),
        ViewMode::QrManagement => qr::render(f, area, app),
        ViewMode::Compliance => compliance::render(f, area, app),
        ViewMode::About => static_pages::render_about(f, area, app),
    }
}

fn render_toast(f: &mut Frame, area: Rect, app: &App) {
    let Some(toast) = app.active_toast() else {
        return;
    };
    let width = area.width.min(52);
    let height = 5u16.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };
    let color = match toast.variant {
        NotificationVariant::Default => Color::Green,
        NotificationVariant::Destructive => Color::Red,
    };
    let content = vec![
        Line::from(Span::styled(
            toast.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(toast.description.clone()),
    ];
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(color)),
            ),
        rect,
    );
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // 命令输入区域
    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "命令: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app.command_cursor.min(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));

        // 如果有建议，添加浅灰色幽灵文本
        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }

        vec![Line::from(spans)]
    } else if app.input_mode == InputMode::Editing {
        vec![Line::from(vec![
            Span::styled("编辑: ", Style::default().fg(Color::Magenta)),
            Span::raw(format!(
                "{} (Enter/Esc 完成, Tab 下一项)",
                app.selected_field().label()
            )),
        ])]
    } else {
        vec![Line::from(vec![
            Span::styled("命令: ", Style::default().fg(Color::Yellow)),
            Span::raw("(按 / 进入命令模式, help 查看命令, q 退出)"),
        ])]
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "命令输入模式"
            } else {
                "命令输入"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    // 日志区域 - 最新的在顶部，最多 20 条
    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with("✓") {
                Style::default().fg(Color::Green)
            } else if msg.starts_with("✗") {
                Style::default().fg(Color::Red)
            } else if msg.starts_with("⚠") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("日志 (共 {} 条)", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppEvent;
    use crate::submission::SubmissionError;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn render_all(app: &mut App) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn every_page_renders() {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let mut app = App::new(vec![], Some("Sarah Davis".to_string()), cmd_tx, evt_rx);
        for view in ViewMode::ALL {
            app.view_mode = view;
            let screen = render_all(&mut app);
            assert!(screen.contains("EcoScan"), "{:?}", view);
        }
    }

    #[test]
    fn toast_is_drawn() {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let mut app = App::new(vec![], None, cmd_tx, evt_rx);
        app.apply_event(AppEvent::SubmitFailed(SubmissionError::AuthenticationMissing));
        let screen = render_all(&mut app);
        assert!(screen.contains("Authentication Required"));
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(50, 4), "██░░");
        assert_eq!(bar(200, 2), "██");
        assert_eq!(bar(0, 3), "░░░");
    }
}
