use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(99, 102, 241);
pub const HEADER_BG: Color = Color::Rgb(49, 46, 129);
pub const CARD_BORDER: Color = Color::Rgb(75, 85, 99);
pub const LABEL: Color = Color::Gray;
pub const MUTED: Color = Color::DarkGray;
pub const TEXT: Color = Color::White;
pub const SELECTED_BG: Color = Color::Rgb(30, 27, 75);

/// Star color for a friendliness score
pub fn score_color(value: f64) -> Color {
    match value.floor() as i64 {
        i64::MIN..=1 => Color::LightRed,
        2 => Color::Yellow,
        3 => Color::LightYellow,
        _ => ACCENT,
    }
}

/// Border color for a card
pub fn card_border(is_selected: bool) -> Color {
    if is_selected {
        ACCENT
    } else {
        CARD_BORDER
    }
}
