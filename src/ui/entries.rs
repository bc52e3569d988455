use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{marker, name_style};
use super::theme::Theme;
use crate::app::App;
use crate::core::{entry_duration, format_duration, tree_display_name};

pub fn build_entries_title(app: &App) -> String {
    match app.selected_report_row() {
        Some(row) => format!(" {} ", tree_display_name(&row.node)),
        None => " Entries ".to_string(),
    }
}

pub fn build_entries_text(app: &App) -> Text<'_> {
    let Some(row) = app.selected_report_row() else {
        return Text::from("Nothing selected.");
    };
    if row.entries.is_empty() {
        return Text::from(format!("No entries between {}.", app.range));
    }

    let notes = app.settings.enable_notes;
    let mut header = format!("  {:<10} {:>5}   {:>5} {:>8}", "Date", "Start", "End", "Duration");
    if notes {
        header.push_str("  Notes");
    }
    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))];

    let rounding = app.settings.entry_rounding();
    for (index, entry) in row.entries.iter().enumerate() {
        let selected = index == app.selected_entry;
        let duration = entry_duration(entry, rounding, app.settings.round_amount);
        let mut spans = vec![
            marker(selected),
            Span::styled(
                format!("{:<10} {:>5} → {:>5}", entry.date, entry.start, entry.end),
                name_style(selected),
            ),
            Span::styled(
                format!(" {:>8}", format_duration(duration)),
                Style::default().fg(Theme::accent()),
            ),
        ];
        if notes {
            let text = if entry.notes.is_empty() {
                Span::styled("  (no notes)", Style::default().fg(Theme::dim()))
            } else {
                Span::raw(format!("  {}", entry.notes))
            };
            spans.push(text);
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}
