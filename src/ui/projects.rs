use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, marker, name_style};
use super::theme::Theme;
use crate::app::App;
use crate::core::format_duration;

pub fn build_projects_text(app: &App) -> Text<'_> {
    if let Some(status) = &app.status {
        return Text::from(status.as_str());
    }
    if app.project_totals.is_empty() {
        return Text::from("No projects yet. Add one with `thyme project add <name>`.");
    }

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("  {:<32} {:>8} {:>10}", "Project", "Own", "With sub"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {:<32} {:>8} {:>10}", "-".repeat(32), "--------", "----------"),
        Style::default().fg(Theme::dim()),
    )));
    for (index, total) in app.project_totals.iter().enumerate() {
        let selected = index == app.selected_project_index;
        let name = format!("{}{}", "  ".repeat(total.depth), total.name);
        lines.push(Line::from(vec![
            marker(selected),
            Span::styled(clamp_name(&name, 32), name_style(selected)),
            Span::raw(" "),
            Span::styled(
                format!("{:>8}", format_duration(total.own)),
                Style::default().fg(Theme::accent()),
            ),
            Span::raw(" "),
            Span::styled(
                format!("{:>10}", format_duration(total.with_children)),
                Style::default().fg(Theme::included()),
            ),
        ]));
    }
    Text::from(lines)
}
