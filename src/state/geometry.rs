//! Window geometry and placement

use serde::{Deserialize, Serialize};

/// Default window width in points
pub const DEFAULT_WINDOW_WIDTH: f64 = 820.0;
/// Default window height in points
pub const DEFAULT_WINDOW_HEIGHT: f64 = 380.0;
/// Height added to the content height for the hidden title bar
pub const TITLE_BAR_HEIGHT: f64 = 28.0;

/// Vertical placement on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Horizontal placement on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalPosition {
    Left,
    #[default]
    Center,
    Right,
}

/// Parse a position token such as `topleft`, `bottom` or `centre`
///
/// Each axis falls back to centre when the token doesn't mention it.
pub fn parse_position(token: &str) -> (VerticalPosition, HorizontalPosition) {
    let token = token.trim().to_lowercase();

    let vertical = if token.contains("top") {
        VerticalPosition::Top
    } else if token.contains("bottom") {
        VerticalPosition::Bottom
    } else {
        VerticalPosition::Center
    };

    let horizontal = if token.contains("left") {
        HorizontalPosition::Left
    } else if token.contains("right") {
        HorizontalPosition::Right
    } else {
        HorizontalPosition::Center
    };

    (vertical, horizontal)
}

/// Window size and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: f64,
    pub height: f64,
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalPosition,
    /// Distance kept from the screen edge
    pub offset: f64,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            vertical: VerticalPosition::default(),
            horizontal: HorizontalPosition::default(),
            offset: 0.0,
        }
    }
}

impl WindowGeometry {
    /// Frame height including the title bar
    pub fn frame_height(&self) -> f64 {
        self.height + TITLE_BAR_HEIGHT
    }
}
