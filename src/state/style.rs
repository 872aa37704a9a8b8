//! Title font styling

use serde::{Deserialize, Serialize};

/// Default title font size
pub const DEFAULT_TITLE_FONT_SIZE: f64 = 30.0;

/// Font weight names accepted by `titlefont: weight=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    UltraLight,
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
    Black,
}

impl FontWeight {
    /// Parse a weight name, falling back to regular
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ultralight" => FontWeight::UltraLight,
            "thin" => FontWeight::Thin,
            "light" => FontWeight::Light,
            "medium" => FontWeight::Medium,
            "semibold" => FontWeight::Semibold,
            "bold" => FontWeight::Bold,
            "heavy" => FontWeight::Heavy,
            "black" => FontWeight::Black,
            _ => FontWeight::Regular,
        }
    }
}

/// Colour argument: the system primary colour, a named colour or `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Colour {
    #[default]
    Primary,
    Named(String),
    Rgb(u8, u8, u8),
}

impl Colour {
    pub fn white() -> Self {
        Colour::Named("white".to_string())
    }

    /// Parse a colour argument; unparseable hex falls back to primary
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).unwrap_or_default();
        }
        match s.to_lowercase().as_str() {
            "" | "primary" | "default" => Colour::Primary,
            name => Colour::Named(name.to_string()),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Colour::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Title font overrides applied by `titlefont:`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleFont {
    pub size: f64,
    pub weight: FontWeight,
    pub colour: Colour,
    pub name: Option<String>,
    pub shadow: bool,
}

impl Default for TitleFont {
    fn default() -> Self {
        Self {
            size: DEFAULT_TITLE_FONT_SIZE,
            weight: FontWeight::default(),
            colour: Colour::default(),
            name: None,
            shadow: false,
        }
    }
}
