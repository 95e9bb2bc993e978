use ratatui::style::Color;

use super::helpers::hex_to_color;
use crate::types::ScreenType;

/// Unified color theme for the application
pub struct Theme;

impl Theme {
    /// Primary branding color
    pub fn primary() -> Color {
        Color::LightBlue
    }

    /// Secondary/border color
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Screen running right now
    pub fn active() -> Color {
        Color::LightGreen
    }

    pub fn inactive() -> Color {
        Color::Red
    }

    /// Unsaved drafts, filter indicators
    pub fn warn() -> Color {
        Color::Yellow
    }

    /// Selection/highlight
    pub fn highlight() -> Color {
        Color::Cyan
    }

    /// Selection marker/arrow
    pub fn selection_marker() -> Color {
        Color::Green
    }

    /// Dimmed/inactive text
    pub fn dim() -> Color {
        Color::DarkGray
    }

    /// Normal text
    pub fn text() -> Color {
        Color::White
    }

    /// Money and counts
    pub fn accent() -> Color {
        Color::LightMagenta
    }

    /// Map marker color per screen type.
    pub fn screen_type(kind: ScreenType) -> Color {
        let hex = match kind {
            ScreenType::Outdoor => "#1976d2",
            ScreenType::Indoor => "#4caf50",
        };
        hex_to_color(hex).unwrap_or(Color::Blue)
    }
}
