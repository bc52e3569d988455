use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, marker, name_style};
use super::theme::Theme;
use crate::app::App;
use crate::core::{format_duration, tree_display_name};

const NAME_WIDTH: usize = 40;

pub fn build_report_text(app: &App) -> Text<'_> {
    if let Some(status) = &app.status {
        return Text::from(status.as_str());
    }

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("      {:<NAME_WIDTH$} {:>11}", "Project", "Total spent"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("      {} {}", "-".repeat(NAME_WIDTH), "-".repeat(11)),
        Style::default().fg(Theme::dim()),
    )));

    for (index, row) in app.report.rows.iter().enumerate() {
        let selected = index == app.selected_row;
        let included = app.is_row_included(row);
        let check = if included { "[x] " } else { "[ ] " };
        let check_style = if included {
            Style::default().fg(Theme::included())
        } else {
            Style::default().fg(Theme::dim())
        };
        let mut style = name_style(selected);
        if !included && !selected {
            style = style.fg(Theme::dim());
        }
        lines.push(Line::from(vec![
            marker(selected),
            Span::styled(check, check_style),
            Span::styled(clamp_name(&tree_display_name(&row.node), NAME_WIDTH), style),
            Span::raw(" "),
            Span::styled(
                format!("{:>11}", format_duration(row.time)),
                Style::default().fg(Theme::accent()),
            ),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("      {} {}", "-".repeat(NAME_WIDTH), "-".repeat(11)),
        Style::default().fg(Theme::dim()),
    )));
    lines.push(Line::from(vec![
        Span::styled(
            format!("      {:<NAME_WIDTH$} ", "Total"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:>11}", format_duration(app.filtered_total())),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    Text::from(lines)
}
