use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit",
        "?: Toggle help",
        "h: Report  p: Projects",
        "r: Reload from the database",
        "esc: Back",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Range"));
    lines.extend(section_lines(&[
        "Tab/Shift+Tab: Next/previous preset (today, week, last week, month, last month)",
        "Left/Right: Move the range one period back/forward",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Report"));
    lines.extend(section_lines(&[
        "Up/Down: Move selection",
        "space: Include/exclude the selected project from the total",
        "a: Include every project again",
        "Enter: Show the entries of the selected project",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Editing"));
    lines.extend(section_lines(&[
        "Use `thyme entry add`, `thyme project add` and friends, then press r",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
