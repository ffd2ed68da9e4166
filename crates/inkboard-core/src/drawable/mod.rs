//! Derived rendering handles for styled shapes.
//!
//! Line, Rectangle and Circle elements are drawn from a precomputed
//! [`Drawable`]. Drawables are never persisted or snapshotted: they live in a
//! [`DrawableCache`] keyed by element id and are regenerated from the shape
//! description (geometry, style and seed) whenever that description changes.

mod fill;
mod rough;

pub use rough::RoughGenerator;

use crate::element::{Element, ElementId, SerializableColor, ShapeStyle};
use kurbo::{BezPath, Point, Rect};
use std::collections::HashMap;

/// Geometry of a styled shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Line { start: Point, end: Point },
    Rectangle(Rect),
    Circle { center: Point, radius: f64 },
}

/// Everything a sketchy renderer needs to build a drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescription {
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
}

impl ShapeDescription {
    /// Describe `element`, or `None` for variants without a drawable.
    pub fn of(element: &Element) -> Option<Self> {
        let (geometry, style) = match element {
            Element::Line(line) => (
                ShapeGeometry::Line {
                    start: line.start,
                    end: line.end,
                },
                &line.style,
            ),
            Element::Rectangle(rect) => (ShapeGeometry::Rectangle(rect.as_rect()), &rect.style),
            Element::Circle(circle) => (
                ShapeGeometry::Circle {
                    center: circle.center,
                    radius: circle.radius(),
                },
                &circle.style,
            ),
            Element::Freehand(_) | Element::Text(_) | Element::Sticker(_) | Element::Decoration(_) => {
                return None;
            }
        };
        Some(Self {
            geometry,
            style: style.clone(),
        })
    }
}

/// Fill layer of a drawable.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableFill {
    /// Fill the closed path.
    Solid { path: BezPath, color: SerializableColor },
    /// Stroke pattern lines (hachure, zigzag, cross-hatch).
    Pattern {
        path: BezPath,
        color: SerializableColor,
        width: f64,
    },
}

/// Precomputed sketch-style strokes and fill for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Outline passes, drawn in order.
    pub strokes: Vec<BezPath>,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Drawn before the strokes.
    pub fill: Option<DrawableFill>,
}

/// Turns shape descriptions into drawables.
pub trait SketchyRenderer {
    fn generate(&self, shape: &ShapeDescription) -> Drawable;
}

/// Side table of drawables keyed by element id.
#[derive(Debug, Default, Clone)]
pub struct DrawableCache {
    entries: HashMap<ElementId, (ShapeDescription, Drawable)>,
}

impl DrawableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate the drawable for `element` if its description changed.
    ///
    /// Elements without a drawable are evicted.
    pub fn refresh(&mut self, element: &Element, renderer: &dyn SketchyRenderer) {
        let id = element.id();
        let Some(description) = ShapeDescription::of(element) else {
            self.entries.remove(&id);
            return;
        };
        if matches!(self.entries.get(&id), Some((cached, _)) if *cached == description) {
            return;
        }
        let drawable = renderer.generate(&description);
        self.entries.insert(id, (description, drawable));
    }

    /// Rebuild the table for a whole collection, dropping stale entries.
    pub fn rebuild(&mut self, elements: &[Element], renderer: &dyn SketchyRenderer) {
        self.entries
            .retain(|id, _| elements.iter().any(|e| e.id() == *id));
        for element in elements {
            self.refresh(element, renderer);
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Drawable> {
        self.entries.get(&id).map(|(_, drawable)| drawable)
    }

    pub fn remove(&mut self, id: ElementId) {
        self.entries.remove(&id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
