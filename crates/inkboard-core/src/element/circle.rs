//! Circle element.

use super::{ElementId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle defined by its center and a point on its edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ElementId,
    pub center: Point,
    /// Radius-defining point; also the single resize handle.
    pub edge: Point,
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, edge: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            edge,
            style,
        }
    }

    pub fn radius(&self) -> f64 {
        self.center.distance(self.edge)
    }

    pub fn bounds(&self) -> Rect {
        let r = self.radius();
        Rect::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }
}
