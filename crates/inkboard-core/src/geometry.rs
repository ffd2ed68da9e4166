//! Hit-testing and pointer classification.
//!
//! All functions are pure and operate in world coordinates.

use crate::config::EngineConfig;
use crate::element::{Element, ElementId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Where a pointer sits relative to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "inside")]
    Inside,
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "end")]
    End,
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
}

impl Position {
    pub fn is_none(self) -> bool {
        self == Position::None
    }

    /// True for named resize handles (everything except `none`/`inside`).
    pub fn is_handle(self) -> bool {
        !matches!(self, Position::None | Position::Inside)
    }
}

/// Cursor category shown for a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Move,
    /// Diagonal north-west / south-east.
    NwseResize,
    /// Diagonal north-east / south-west.
    NeswResize,
    /// Panning in progress.
    Grabbing,
    Crosshair,
    Text,
}

/// Distance tolerances used by hit-testing, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTolerance {
    /// Half-size of the box around a handle.
    pub handle: f64,
    /// Collinearity slack for straight lines.
    pub line: f64,
    /// Collinearity slack for freehand segments.
    pub freehand: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            handle: 5.0,
            line: 1.0,
            freehand: 5.0,
        }
    }
}

impl From<&EngineConfig> for HitTolerance {
    fn from(config: &EngineConfig) -> Self {
        Self {
            handle: config.handle_tolerance,
            line: config.line_tolerance,
            freehand: config.freehand_tolerance,
        }
    }
}

/// Result of a top-most hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: ElementId,
    /// Index in the element collection (z-order).
    pub index: usize,
    pub position: Position,
}

/// Box test: both axis distances strictly below `tolerance`.
pub fn point_near(point: Point, target: Point, tolerance: f64) -> bool {
    (point.x - target.x).abs() < tolerance && (point.y - target.y).abs() < tolerance
}

/// Distance-sum collinearity test.
///
/// A point is on the segment when `|a-p| + |p-b|` exceeds `|a-b|` by less than
/// `max_distance`. Points on the extended line beyond either endpoint are
/// rejected by the growing distance sum, not by a projection clamp.
pub fn point_on_segment(a: Point, b: Point, point: Point, max_distance: f64) -> Position {
    let offset = a.distance(b) - (a.distance(point) + b.distance(point));
    if offset.abs() < max_distance {
        Position::Inside
    } else {
        Position::None
    }
}

fn corner_handles(rect_p1: Point, rect_p2: Point, point: Point, tolerance: f64) -> Position {
    let corners = [
        (rect_p1, Position::TopLeft),
        (Point::new(rect_p2.x, rect_p1.y), Position::TopRight),
        (Point::new(rect_p1.x, rect_p2.y), Position::BottomLeft),
        (rect_p2, Position::BottomRight),
    ];
    corners
        .iter()
        .find(|(corner, _)| point_near(point, *corner, tolerance))
        .map_or(Position::None, |(_, position)| *position)
}

fn inside_rect(rect: Rect, point: Point) -> Position {
    // Closed interval on every edge.
    if point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1 {
        Position::Inside
    } else {
        Position::None
    }
}

/// Classify `point` against a single element.
pub fn classify_position(point: Point, element: &Element, tol: &HitTolerance) -> Position {
    match element {
        Element::Line(line) => {
            if point_near(point, line.start, tol.handle) {
                Position::Start
            } else if point_near(point, line.end, tol.handle) {
                Position::End
            } else {
                point_on_segment(line.start, line.end, point, tol.line)
            }
        }
        Element::Rectangle(rect) => match corner_handles(rect.p1, rect.p2, point, tol.handle) {
            Position::None => inside_rect(rect.as_rect(), point),
            handle => handle,
        },
        Element::Circle(circle) => {
            if point_near(point, circle.edge, tol.handle) {
                Position::End
            } else if circle.center.distance(point) <= circle.radius() {
                Position::Inside
            } else {
                Position::None
            }
        }
        Element::Freehand(stroke) => {
            if let [only] = stroke.points.as_slice() {
                return if point_near(point, *only, tol.freehand) {
                    Position::Inside
                } else {
                    Position::None
                };
            }
            let hit = stroke
                .points
                .windows(2)
                .any(|w| !point_on_segment(w[0], w[1], point, tol.freehand).is_none());
            if hit {
                Position::Inside
            } else {
                Position::None
            }
        }
        Element::Text(text) => inside_rect(text.bounds(), point),
        Element::Sticker(sticker) => {
            let rect = sticker.bounds();
            match corner_handles(
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y1),
                point,
                tol.handle,
            ) {
                Position::None => inside_rect(rect, point),
                handle => handle,
            }
        }
        Element::Decoration(_) => Position::None,
    }
}

/// Find the top-most (last-drawn) element under `point`.
pub fn topmost_hit(point: Point, elements: &[Element], tol: &HitTolerance) -> Option<Hit> {
    elements.iter().enumerate().rev().find_map(|(index, element)| {
        let position = classify_position(point, element, tol);
        (!position.is_none()).then(|| Hit {
            id: element.id(),
            index,
            position,
        })
    })
}

/// Find the top-most decoration whose box contains `point`.
pub fn decoration_at(point: Point, elements: &[Element]) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .find(|e| e.is_decoration() && !inside_rect(e.bounds(), point).is_none())
        .map(Element::id)
}

/// Cursor affordance for a classified position.
pub fn cursor_for_position(position: Position) -> CursorKind {
    match position {
        Position::TopLeft | Position::BottomRight | Position::Start | Position::End => {
            CursorKind::NwseResize
        }
        Position::TopRight | Position::BottomLeft => CursorKind::NeswResize,
        Position::Inside => CursorKind::Move,
        Position::None => CursorKind::Default,
    }
}
