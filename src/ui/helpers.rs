use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use super::theme::Theme;

/// Pads `value` to `width` characters, cutting it with `..` when too long.
pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}");
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

/// The `> ` marker in front of the selected list line.
pub fn marker(selected: bool) -> Span<'static> {
    if selected {
        Span::styled("> ", Style::default().fg(Theme::selection_marker()))
    } else {
        Span::styled("  ", Style::default().fg(Theme::dim()))
    }
}

pub fn name_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_long_names() {
        assert_eq!(clamp_name("Website redesign", 8), "Websit..");
        assert_eq!(clamp_name("Web", 5), "Web  ");
    }
}
