use super::{heading, panel};
use crate::app_state::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const FEATURES: [(&str, &str); 6] = [
    ("Smart E-Waste Submission", "Easy-to-use forms for logging electronic waste with AI-powered categorization"),
    ("QR Code Tracking", "Generate unique QR codes for each item to track movement from submission to disposal"),
    ("Analytics Dashboard", "Charts showing environmental impact, trends, and department contributions"),
    ("Gamification System", "Earn points, badges, and compete on leaderboards to encourage sustainable practices"),
    ("Compliance Management", "Reporting and compliance certificates for regulatory requirements"),
    ("Audit Trail", "Every submission is stored with its QR code for complete tracking"),
];

const VALUES: [(&str, &str); 4] = [
    ("Environmental Responsibility", "Committed to reducing e-waste impact and promoting circular economy principles for a sustainable future."),
    ("Transparency & Trust", "Traceable records keep the e-waste management process transparent."),
    ("Community Engagement", "Empowering individuals and organizations to make a collective environmental impact."),
    ("Innovation & Technology", "Using automation to simplify waste classification and tracking."),
];

fn feature_lines(items: &[(&'static str, &'static str)], lines: &mut Vec<Line<'static>>) {
    for (title, desc) in items {
        lines.push(Line::from(Span::styled(
            format!("  • {}", title),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", desc),
            Style::default().fg(Color::Gray),
        )));
    }
}

pub(super) fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let a = &app.analytics;
    let mut lines = vec![
        Line::from(Span::styled(
            "Smart E-Waste Management for a Greener Future",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Track, manage, and recycle electronic waste responsibly."),
        Line::from(""),
        heading("--- Impact So Far ---"),
        Line::from(format!(
            "  Items Processed {:>6}   Waste Diverted {:>8.1} kg   CO₂ Reduced {:>8.1} kg   Contributors {:>4}",
            a.total_items, a.total_weight_kg, a.total_co2, a.active_contributors
        )),
        Line::from(""),
        heading("--- Features ---"),
    ];
    feature_lines(&FEATURES, &mut lines);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "开始: 菜单选择 Submit E-Waste，或输入 /submit name=.. category=.. dept=.. condition=..",
        Style::default().fg(Color::Yellow),
    )));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(app, "Home", "↑↓ 滚动, Esc 菜单"))
        .scroll((app.page_scroll, 0));
    f.render_widget(paragraph, area);
}

pub(super) fn render_about(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "About EcoScan",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("An e-waste tracking platform that helps organizations log, classify, and responsibly recycle electronics."),
        Line::from(""),
        heading("--- Our Core Values ---"),
    ];
    feature_lines(&VALUES, &mut lines);
    lines.push(Line::from(""));
    lines.push(heading("--- Get in Touch ---"));
    lines.push(Line::from("  contact@ecoscan.com"));
    lines.push(Line::from("  +1 (555) 123-4567"));
    lines.push(Line::from("  123 Green Tech Way, Sustainability City, SC 12345"));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(app, "About", "↑↓ 滚动, Esc 菜单"))
        .scroll((app.page_scroll, 0));
    f.render_widget(paragraph, area);
}
