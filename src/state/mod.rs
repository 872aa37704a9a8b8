//! Observed dialog state
//!
//! The engine is the only writer. Renderers receive snapshots of
//! [`DialogState`] and redraw from them.

pub mod geometry;
pub mod list;
pub mod options;
pub mod style;

pub use geometry::{HorizontalPosition, VerticalPosition, WindowGeometry};
pub use list::{ListItem, ListItemCommand, ListItems, StatusIcon};
pub use options::{CommandLineOption, DialogOptions};
pub use style::{Colour, FontWeight, TitleFont};

use serde::{Deserialize, Serialize};

use crate::protocol::text::parse_number;

/// Default progress total when none is given at launch
pub const DEFAULT_PROGRESS_TOTAL: f64 = 100.0;
/// Default icon width, also the value `icon: size:` resets to
pub const DEFAULT_ICON_SIZE: f64 = 150.0;
/// Fully opaque icon
pub const DEFAULT_ICON_ALPHA: f64 = 1.0;

/// Progress bar state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// `None` means indeterminate
    pub value: Option<f64>,
    pub total: f64,
}

impl Progress {
    pub fn is_indeterminate(&self) -> bool {
        self.value.is_none()
    }
}

/// An entry of the main image area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainImage {
    pub path: String,
    pub caption: Option<String>,
}

impl MainImage {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            caption: None,
        }
    }
}

/// Everything the renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogState {
    pub options: DialogOptions,
    pub window: WindowGeometry,
    pub title_font: TitleFont,
    pub progress: Progress,
    pub icon_size: f64,
    pub icon_alpha: f64,
    pub images: Vec<MainImage>,
    pub list_items: ListItems,
    /// Row touched by the latest list-item directive
    pub last_updated_row: Option<usize>,
}

impl DialogState {
    /// Build the initial state from launch options
    pub fn new(mut options: DialogOptions) -> Self {
        // A visible timer bar keeps button 1 disabled until it expires
        if options.timer_bar.present && !options.hide_timer_bar.present {
            options.button1_disabled.present = true;
        }

        let total = parse_number(&options.progress_bar.value).unwrap_or(DEFAULT_PROGRESS_TOTAL);
        let icon_size = parse_number(&options.icon_size.value).unwrap_or(DEFAULT_ICON_SIZE);
        let icon_alpha = parse_number(&options.icon_alpha.value).unwrap_or(DEFAULT_ICON_ALPHA);
        let offset = parse_number(&options.position_offset.value).unwrap_or_default();

        let images = if options.main_image.value.is_empty() {
            Vec::new()
        } else {
            vec![MainImage::new(options.main_image.value.clone())]
        };

        Self {
            window: WindowGeometry {
                offset,
                ..Default::default()
            },
            title_font: TitleFont::default(),
            progress: Progress { value: None, total },
            icon_size,
            icon_alpha,
            images,
            list_items: ListItems::new(),
            last_updated_row: None,
            options,
        }
    }
}

impl Default for DialogState {
    fn default() -> Self {
        Self::new(DialogOptions::default())
    }
}
