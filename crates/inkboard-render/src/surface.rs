//! The abstract 2D raster surface frames are painted onto.

use crate::error::RenderResult;
use inkboard_core::TextMeasure;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;

/// A drawing target with a transform stack.
///
/// Coordinates passed to drawing calls are mapped through the current
/// transform. `save`/`restore` push and pop both the transform and the
/// alpha. Text metrics come from the [`TextMeasure`] supertrait so overlays
/// can size themselves with the surface's own fonts.
pub trait Surface: TextMeasure {
    /// Reset the transform and paint the whole surface with `color`.
    fn clear(&mut self, color: Color);

    fn save(&mut self);

    fn restore(&mut self);

    /// Compose `affine` with the current transform; it applies to
    /// coordinates before the existing transform does.
    fn transform(&mut self, affine: Affine);

    fn translate(&mut self, offset: Vec2) {
        self.transform(Affine::translate(offset));
    }

    fn scale(&mut self, factor: f64) {
        self.transform(Affine::scale(factor));
    }

    /// Global alpha multiplier for subsequent drawing.
    fn set_alpha(&mut self, alpha: f64);

    fn fill_path(&mut self, path: &BezPath, color: Color);

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);

    /// Blit the raster registered as `source` into `rect`.
    fn draw_image(&mut self, source: &str, rect: Rect) -> RenderResult<()>;

    /// Draw one line of text with its top-left at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);
}
