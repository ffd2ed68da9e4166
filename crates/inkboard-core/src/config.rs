//! Engine configuration.

use crate::element::SerializableColor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How plain wheel events are interpreted.
///
/// The modifier-held variant always does the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WheelBinding {
    /// Wheel pans, modifier + wheel zooms.
    #[default]
    PanByWheel,
    /// Wheel zooms, modifier + wheel pans.
    ZoomByWheel,
}

/// Tunable engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum viewport scale.
    pub min_zoom: f64,
    /// Maximum viewport scale.
    pub max_zoom: f64,
    /// Factor applied by a single zoom-in / zoom-out step.
    pub zoom_step: f64,
    /// Box tolerance (screen pixels) for corner and endpoint handles.
    pub handle_tolerance: f64,
    /// Collinearity tolerance (screen pixels) for line hit-testing.
    pub line_tolerance: f64,
    /// Collinearity tolerance (screen pixels) for freehand hit-testing.
    pub freehand_tolerance: f64,
    /// Stroke color applied to new elements.
    pub default_stroke_color: SerializableColor,
    /// Stroke width applied to new elements.
    pub default_stroke_width: f64,
    /// Font size applied to new text.
    pub default_font_size: f64,
    /// Width of a freshly placed sticker.
    pub sticker_size: f64,
    /// Width and height of a freshly placed decoration.
    pub decoration_size: f64,
    /// Length of one decoration animation loop.
    pub decoration_duration_ms: u64,
    /// How long an alert banner stays visible.
    pub alert_duration_ms: u64,
    /// Grid spacing in world units.
    pub grid_size: f64,
    /// Maximum number of history versions kept (`None` = unbounded).
    pub history_limit: Option<usize>,
    /// Wheel interpretation.
    pub wheel_binding: WheelBinding,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.2,
            handle_tolerance: 5.0,
            line_tolerance: 1.0,
            freehand_tolerance: 5.0,
            default_stroke_color: SerializableColor::black(),
            default_stroke_width: 4.0,
            default_font_size: 36.0,
            sticker_size: 100.0,
            decoration_size: 150.0,
            decoration_duration_ms: 3000,
            alert_duration_ms: 3000,
            grid_size: 20.0,
            history_limit: None,
            wheel_binding: WheelBinding::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the zoom bounds and step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_zoom) || !positive(self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must be positive, got {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !positive(self.zoom_step) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
