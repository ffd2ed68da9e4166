//! Straight line element.

use super::{ElementId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ElementId,
    pub start: Point,
    pub end: Point,
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    /// Order the endpoints so `start` is the lexicographically smaller one
    /// (x first, then y).
    pub fn normalize(&mut self) {
        let swap = self.end.x < self.start.x
            || (self.end.x == self.start.x && self.end.y < self.start.y);
        if swap {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }
}
