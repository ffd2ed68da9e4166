//! Frame appearance settings.

use crate::outline::OutlineOptions;
use inkboard_core::SerializableColor;
use serde::{Deserialize, Serialize};

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridStyle {
    /// Plain background.
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Dots at intersections.
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Colors and geometry of the per-frame layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub background: SerializableColor,
    pub grid_style: GridStyle,
    pub grid_color: SerializableColor,
    /// Outline around the selected element.
    pub selection_color: SerializableColor,
    /// Outline around the selected decoration.
    pub decoration_selection_color: SerializableColor,
    /// Alpha applied to decorations.
    pub decoration_opacity: f64,
    pub editor_border_color: SerializableColor,
    pub alert_width: f64,
    pub alert_height: f64,
    pub alert_background: SerializableColor,
    pub alert_text_color: SerializableColor,
    pub alert_font_size: f64,
    /// Drawn in place of rasters the surface cannot resolve.
    pub placeholder_color: SerializableColor,
    pub freehand: OutlineOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
            grid_style: GridStyle::default(),
            grid_color: SerializableColor::new(200, 200, 200, 100),
            selection_color: SerializableColor::rgb(59, 130, 246),
            decoration_selection_color: SerializableColor::rgb(0xFF, 0xD7, 0x00),
            decoration_opacity: 0.7,
            editor_border_color: SerializableColor::rgb(59, 130, 246),
            alert_width: 300.0,
            alert_height: 100.0,
            alert_background: SerializableColor::new(0, 0, 0, 204),
            alert_text_color: SerializableColor::white(),
            alert_font_size: 24.0,
            placeholder_color: SerializableColor::new(160, 160, 160, 255),
            freehand: OutlineOptions::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
