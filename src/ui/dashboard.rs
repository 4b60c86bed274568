use super::{bar, format_ts, heading, panel};
use crate::app_state::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render(f: &mut Frame, area: Rect, app: &App) {
    let snap = &app.dashboard;
    let mut lines = Vec::new();

    match &snap.user {
        Some(user) => {
            lines.push(Line::from(Span::styled(
                format!("Welcome Back, {}! 🌱", user.name),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "  提交 {:>4}   积分 {:>6}   CO₂ 减排 {:>8.1} kg   排名 {}",
                user.total_submissions,
                user.points,
                user.co2_saved,
                user.rank
                    .map(|r| format!("#{}", r))
                    .unwrap_or_else(|| "--".to_string())
            )));
            if let Some(dept) = &user.department {
                lines.push(Line::from(Span::styled(
                    format!("  部门: {}", dept),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "未登录：设置 EWASTE_USER_ID 后可查看个人看板",
            Style::default().fg(Color::Red),
        ))),
    }

    if !snap.badges.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("--- Achievements ---"));
        for badge in &snap.badges {
            let (mark, color) = if badge.earned {
                ("★", Color::Yellow)
            } else {
                ("☆", Color::DarkGray)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {} {:<16}", mark, badge.name), Style::default().fg(color)),
                Span::styled(badge.description, Style::default().fg(Color::Gray)),
            ]));
        }
    }

    if !snap.challenges.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("--- Active Challenges ---"));
        for c in &snap.challenges {
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<18}", c.title)),
                Span::styled(bar(c.progress, 20), Style::default().fg(Color::Green)),
                Span::raw(format!(" {:>3}%  +{} pts", c.progress, c.reward)),
            ]));
        }
    }

    if !snap.recent.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("--- Recent Submissions ---"));
        for r in &snap.recent {
            lines.push(Line::from(format!(
                "  {}  {:<24} {:<22} {:<11} {:>4} pts",
                format_ts(r.created_at),
                r.item_name,
                r.category,
                r.classification,
                r.points
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("--- Leaderboard ---"));
    if snap.leaderboard.is_empty() {
        lines.push(Line::from("  暂无数据，可输入 `demo seed` 生成示例"));
    }
    for e in &snap.leaderboard {
        let style = if e.is_current {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "  #{:<2} {:<18} {:<22} {:>6} pts {:>4} items",
                e.rank, e.name, e.department, e.points, e.submissions
            ),
            style,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(app, "Dashboard", "↑↓ 滚动, Esc 菜单"))
        .scroll((app.page_scroll, 0));
    f.render_widget(paragraph, area);
}
