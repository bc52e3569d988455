use ratatui::style::Color;

/// Colors shared by every view.
pub struct Theme;

impl Theme {
    pub fn primary() -> Color {
        Color::Green
    }

    /// Borders and headings
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Rows counted in the total
    pub fn included() -> Color {
        Color::LightGreen
    }

    pub fn warn() -> Color {
        Color::Yellow
    }

    pub fn highlight() -> Color {
        Color::Cyan
    }

    pub fn selection_marker() -> Color {
        Color::Green
    }

    pub fn dim() -> Color {
        Color::DarkGray
    }

    pub fn text() -> Color {
        Color::White
    }

    /// Durations
    pub fn accent() -> Color {
        Color::LightBlue
    }
}
