//! Sticker (raster image) element.

use super::ElementId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raster image placed on the board, referenced by source id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub(crate) id: ElementId,
    /// Top-left corner.
    pub anchor: Point,
    pub width: f64,
    pub height: f64,
    /// Asset identifier; pixel data is never embedded.
    pub source: String,
}

impl Sticker {
    pub fn new(anchor: Point, width: f64, height: f64, source: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            width,
            height,
            source,
        }
    }

    /// Size a sticker to `width`, keeping the aspect ratio of `natural`.
    pub fn fitted(anchor: Point, width: f64, natural: Size, source: String) -> Self {
        let height = if natural.width > 0.0 {
            width * natural.height / natural.width
        } else {
            width
        };
        Self::new(anchor, width, height, source)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(
            self.anchor,
            Point::new(self.anchor.x + self.width, self.anchor.y + self.height),
        )
    }

    /// Make width and height positive, moving the anchor to the top-left.
    pub fn normalize(&mut self) {
        let rect = self.bounds();
        self.anchor = rect.origin();
        self.width = rect.width();
        self.height = rect.height();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitted_keeps_aspect() {
        let s = Sticker::fitted(Point::ZERO, 100.0, Size::new(200.0, 50.0), "cat".into());
        assert!((s.height - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_negative_size() {
        let mut s = Sticker::new(Point::new(100.0, 100.0), -40.0, -20.0, "cat".into());
        s.normalize();
        assert_eq!(s.anchor, Point::new(60.0, 80.0));
        assert!((s.width - 40.0).abs() < f64::EPSILON);
        assert!((s.height - 20.0).abs() < f64::EPSILON);
    }
}
