use super::panel;
use crate::app_state::{App, InputMode};
use crate::scoring::{estimate_value, Category, Condition};
use crate::submission::{validate, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// 表单可完整通过校验且类别、状态都已知时给出预计积分
fn estimate_preview(app: &App) -> Option<i64> {
    let valid = validate(&app.form).ok()?;
    Category::parse(&valid.category)?;
    Condition::parse(&valid.condition)?;
    let value = estimate_value(&valid.category, &valid.condition, valid.quantity);
    Some(value.floor() as i64)
}

pub(super) fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Log your electronic waste for proper recycling and earn eco-points",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    let selected = app.selected_field();
    for field in FormField::ALL {
        let is_selected = field == selected;
        let editing = is_selected && app.input_mode == InputMode::Editing;
        let value = app.form.get(field);

        let marker = if is_selected { ">> " } else { "   " };
        let shown = if field.choices().is_some() {
            if value.is_empty() {
                "< 请选择 >".to_string()
            } else {
                format!("< {} >", value)
            }
        } else if editing {
            format!("{}_", value)
        } else {
            value.to_string()
        };

        let label_style = if is_selected {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let value_style = if editing {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<24}", field.label()), label_style),
            Span::styled(shown, value_style),
        ]));
        if let Some(msg) = app.field_error(field) {
            lines.push(Line::from(Span::styled(
                format!("      {}", msg),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::from(""));
    if let Some(points) = estimate_preview(app) {
        lines.push(Line::from(vec![
            Span::raw("预计积分: "),
            Span::styled(points.to_string(), Style::default().fg(Color::Green)),
            Span::styled("  (分类在提交时确定)", Style::default().fg(Color::DarkGray)),
        ]));
    }
    lines.push(if app.submitting {
        Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            "[s] Submit E-Waste Item   [r] Reset",
            Style::default().fg(Color::Gray),
        ))
    });

    let block = panel(
        app,
        "Submit E-Waste",
        "↑↓ 选择字段, Enter 编辑, ←→ 切换选项, s 提交, r 重置",
    );
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn preview_only_for_known_choices() {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let mut app = App::new(vec![], None, cmd_tx, evt_rx);
        assert_eq!(estimate_preview(&app), None);

        app.form.item_name = "Monitor".into();
        app.form.category = "Monitors & TVs".into();
        app.form.department = "IT Department".into();
        app.form.condition = "working".into();
        app.form.quantity = "3".into();
        assert_eq!(estimate_preview(&app), Some(90));

        app.form.category = "Toasters".into();
        assert_eq!(estimate_preview(&app), None);
    }

    #[test]
    fn preview_follows_calculator() {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let mut app = App::new(vec![], None, cmd_tx, evt_rx);
        app.form.item_name = "Batch".into();
        app.form.department = "IT Department".into();
        app.form.quantity = "2".into();
        for category in Category::ALL {
            for condition in Condition::ALL {
                app.form.category = category.label().into();
                app.form.condition = condition.as_str().into();
                let expected = estimate_value(category.label(), condition.as_str(), 2).floor() as i64;
                assert_eq!(estimate_preview(&app), Some(expected));
            }
        }
    }
}
