//! Freehand stroke element.

use super::{ElementId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (ordered series of world-space points).
///
/// Always holds at least one point; points are only appended while drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ElementId,
    /// Points in stroke order.
    pub points: Vec<Point>,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
}

impl Freehand {
    /// Start a stroke at `start`.
    pub fn new(start: Point, stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            stroke_color,
            stroke_width,
        }
    }

    /// Append a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }
}
