use super::{format_ts, heading, panel};
use crate::app_state::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

struct Certificate {
    name: &'static str,
    issuer: &'static str,
    issued: &'static str,
    expires: &'static str,
}

const CERTIFICATES: [Certificate; 4] = [
    Certificate {
        name: "ISO 14001 Environmental Management",
        issuer: "International Standards Organization",
        issued: "2023-06-15",
        expires: "2026-06-15",
    },
    Certificate {
        name: "WEEE Compliance Certificate",
        issuer: "Environmental Protection Agency",
        issued: "2023-09-01",
        expires: "2024-09-01",
    },
    Certificate {
        name: "RoHS Compliance Certificate",
        issuer: "Regulatory Compliance Board",
        issued: "2023-08-20",
        expires: "2025-08-20",
    },
    Certificate {
        name: "Data Security Compliance",
        issuer: "Cybersecurity Standards Board",
        issued: "2023-11-10",
        expires: "2024-11-10",
    },
];

pub(super) fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![heading("--- Compliance Reports ---")];
    if app.reports.is_empty() {
        lines.push(Line::from("  暂无报告，可输入 `demo seed` 生成示例"));
    }
    for r in &app.reports {
        let title = r.data_str("title").unwrap_or(r.report_type.as_str());
        let status = r.data_str("status").unwrap_or("--");
        let status_color = match status {
            "Completed" => Color::Green,
            "In Progress" => Color::Yellow,
            _ => Color::Gray,
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  RPT-{:03} {:<36}", r.id, title)),
            Span::raw(format!("{:<15}", r.data_str("period").unwrap_or("--"))),
            Span::styled(format!("{:<12}", status), Style::default().fg(status_color)),
            Span::raw(format!(
                "{}  {}",
                format_ts(r.created_at),
                r.file_url.as_deref().unwrap_or("--")
            )),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(heading("--- Certificates ---"));
    for c in &CERTIFICATES {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<38}", c.name), Style::default().fg(Color::Cyan)),
            Span::raw(format!("{:<38} {} → {}", c.issuer, c.issued, c.expires)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(app, "Compliance", "↑↓ 滚动, Esc 菜单"))
        .scroll((app.page_scroll, 0));
    f.render_widget(paragraph, area);
}
