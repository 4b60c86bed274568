use super::{bar, heading, panel};
use crate::app_state::App;
use crate::insights::Breakdown;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn breakdown_lines(rows: &[Breakdown], lines: &mut Vec<Line<'static>>) {
    if rows.is_empty() {
        lines.push(Line::from("  暂无数据"));
    }
    for row in rows {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<24}", row.label)),
            Span::styled(bar(row.percentage, 20), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " {:>3}%  {:>5} items  {:>8.1} kg CO₂",
                row.percentage, row.items, row.co2_saved
            )),
        ]));
    }
}

pub(super) fn render(f: &mut Frame, area: Rect, app: &App) {
    let a = &app.analytics;
    let mut lines = vec![
        heading("--- Environmental Impact ---"),
        Line::from(format!(
            "  Items Processed {:>6}   CO₂ Saved {:>8.1} kg   Landfill Diverted {:>8.1} kg",
            a.total_items, a.total_co2, a.total_weight_kg
        )),
        Line::from(format!(
            "  Estimated Value {:>8.0}   Active Contributors {:>4}",
            a.total_value, a.active_contributors
        )),
        Line::from(""),
        heading("--- Department Contributions ---"),
    ];
    breakdown_lines(&a.departments, &mut lines);

    lines.push(Line::from(""));
    lines.push(heading("--- Category Breakdown ---"));
    breakdown_lines(&a.categories, &mut lines);

    lines.push(Line::from(""));
    lines.push(heading("--- Monthly Trends ---"));
    let peak = a.monthly.iter().map(|m| m.items).max().unwrap_or(0);
    for m in &a.monthly {
        let pct = if peak > 0 {
            ((m.items * 100) / peak) as u8
        } else {
            0
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {} {:<4}", m.label, m.year)),
            Span::styled(bar(pct, 20), Style::default().fg(Color::Green)),
            Span::raw(format!(" {:>5} items  {:>8.1} kg CO₂", m.items, m.co2_saved)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(heading("--- Top Contributors ---"));
    for (i, c) in a.top_contributors.iter().enumerate() {
        lines.push(Line::from(format!(
            "  {}. {:<18} {:<22} {:>4} items {:>6} pts",
            i + 1,
            c.name,
            c.department,
            c.items,
            c.points
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(app, "Analytics", "↑↓ 滚动, Esc 菜单"))
        .scroll((app.page_scroll, 0));
    f.render_widget(paragraph, area);
}
