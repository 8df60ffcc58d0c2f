//! Parrot/neon style tokens.
//!
//! Dark background with neon accents. Candle colors come from the figure
//! itself; these are the fallbacks and the chrome around it.

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

/// Overlay trace colors, cycled by trace position.
const SERIES: [Color; 8] = [
    Color::Rgb(255, 215, 0),
    Color::Rgb(0, 191, 255),
    Color::Rgb(255, 105, 180),
    Color::Rgb(127, 255, 212),
    Color::Rgb(255, 160, 122),
    Color::Rgb(186, 85, 211),
    Color::Rgb(173, 255, 47),
    Color::Rgb(240, 230, 140),
];

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

/// Parse a figure color ("#00ff00", "red"), falling back when unknown.
pub fn figure_color(spec: Option<&str>, fallback: Color) -> Color {
    spec.and_then(|s| s.parse::<Color>().ok()).unwrap_or(fallback)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn cursor() -> Style {
    accent().add_modifier(Modifier::REVERSED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_colors_parse() {
        assert_eq!(figure_color(Some("#00ff00"), MUTED), Color::Rgb(0, 255, 0));
        assert_eq!(figure_color(Some("red"), MUTED), Color::Red);
        assert_eq!(figure_color(Some("not-a-color"), MUTED), MUTED);
        assert_eq!(figure_color(None, NEGATIVE), NEGATIVE);
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), series_color(8));
        assert_ne!(series_color(0), series_color(1));
    }
}
