//! Rectangle element.

use super::{ElementId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle described by two corner points.
///
/// While being dragged the corners may be in any order; after commit
/// `p1` is the top-left and `p2` the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ElementId,
    pub p1: Point,
    pub p2: Point,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(p1: Point, p2: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            p1,
            p2,
            style,
        }
    }

    /// The rectangle as an ordered kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.p1, self.p2)
    }

    /// Rewrite the corners as min/max per axis.
    pub fn normalize(&mut self) {
        let rect = self.as_rect();
        self.p1 = Point::new(rect.x0, rect.y0);
        self.p2 = Point::new(rect.x1, rect.y1);
    }

    pub fn is_normalized(&self) -> bool {
        self.p1.x <= self.p2.x && self.p1.y <= self.p2.y
    }
}
