//! Viewport module for pan/zoom transforms.

use crate::config::EngineConfig;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The pan/zoom mapping between screen and world coordinates.
///
/// `screen = world * scale + pan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Translation offset in screen pixels.
    pub pan: Vec2,
    /// Zoom scale (1.0 = 100%).
    pub scale: f64,
    /// Minimum allowed scale.
    pub min_scale: f64,
    /// Maximum allowed scale.
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 5.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewport using the zoom bounds from `config`.
    ///
    /// Bounds that fail [`EngineConfig::validate`] fall back to the defaults.
    pub fn from_config(config: &EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{e}; using default zoom bounds");
            return Self::default();
        }
        Self {
            min_scale: config.min_zoom,
            max_scale: config.max_zoom,
            ..Self::default()
        }
    }

    /// World-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Screen-to-world transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.pan)
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.scale,
            (screen.y - self.pan.y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan.x,
            world.y * self.scale + self.pan.y,
        )
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Multiply the scale by `factor`, keeping `anchor` (screen space) fixed.
    ///
    /// The resulting scale is clamped to the configured bounds; the pan is
    /// derived from the clamped ratio so the anchor never drifts.
    pub fn zoom(&mut self, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("Ignoring invalid zoom factor {factor}");
            return;
        }
        let new_scale = (self.scale * factor).max(self.min_scale).min(self.max_scale);
        let ratio = new_scale / self.scale;
        let anchor = anchor.to_vec2();
        self.pan = anchor - (anchor - self.pan) * ratio;
        self.scale = new_scale;
    }

    /// Set an absolute scale around `anchor`.
    pub fn set_scale(&mut self, scale: f64, anchor: Point) {
        if scale > 0.0 {
            self.zoom(scale / self.scale, anchor);
        }
    }

    /// Back to pan (0,0), scale 1.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Visible world rectangle for a screen of `size`.
    pub fn visible_world(&self, size: Size) -> kurbo::Rect {
        kurbo::Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(size.width, size.height)),
        )
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }
}
