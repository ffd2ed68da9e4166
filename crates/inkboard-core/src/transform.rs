//! Element creation and editing during draw, move and resize gestures.

use crate::element::{DrawStyle, Element, ElementId};
use crate::error::{EngineError, Result};
use crate::geometry::Position;
use crate::scene::Scene;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// Move the corner(s) that `handle` controls to `to`.
///
/// `tl`/`start` drive corner 1, `br`/`end` drive corner 2, `tr` takes
/// corner 2's x and corner 1's y, `bl` takes corner 1's x and corner 2's y.
fn remap_corners(p1: &mut Point, p2: &mut Point, to: Point, handle: Position) {
    match handle {
        Position::TopLeft | Position::Start => *p1 = to,
        Position::BottomRight | Position::End => *p2 = to,
        Position::TopRight => {
            p2.x = to.x;
            p1.y = to.y;
        }
        Position::BottomLeft => {
            p1.x = to.x;
            p2.y = to.y;
        }
        Position::Inside | Position::None => {}
    }
}

impl Scene {
    /// Create an element for `tool` anchored at `at`.
    ///
    /// Shapes start zero-sized with both corners on `at`; freehand strokes
    /// start with `at` as their only point.
    pub fn begin_element(&mut self, tool: ToolKind, at: Point, style: &DrawStyle) -> Result<ElementId> {
        let kind = tool
            .element_kind()
            .ok_or_else(|| EngineError::InvalidElementType(tool.name().to_string()))?;
        let id = self.push(Element::create(kind, at, style));
        log::debug!("Began {kind} element {id}");
        Ok(id)
    }

    /// Grow the element being drawn towards `to`.
    pub fn extend_element(&mut self, id: ElementId, to: Point) -> Result<()> {
        match self.element_mut(id)? {
            Element::Freehand(stroke) => stroke.add_point(to),
            Element::Line(line) => line.end = to,
            Element::Rectangle(rect) => rect.p2 = to,
            Element::Circle(circle) => circle.edge = to,
            Element::Sticker(sticker) => {
                sticker.width = to.x - sticker.anchor.x;
                sticker.height = to.y - sticker.anchor.y;
            }
            // Sized at commit.
            Element::Text(_) | Element::Decoration(_) => return Ok(()),
        }
        self.refresh_drawable(id);
        Ok(())
    }

    /// Translate an element by `delta`.
    pub fn move_element(&mut self, id: ElementId, delta: Vec2) -> Result<()> {
        self.element_mut(id)?.translate(delta);
        self.refresh_drawable(id);
        Ok(())
    }

    /// Drag `handle` of an element to `to`.
    ///
    /// Circles always move their radius point. Freehand strokes and text have
    /// no resize handles; resizing them is a no-op.
    pub fn resize_element(&mut self, id: ElementId, to: Point, handle: Position) -> Result<()> {
        match self.element_mut(id)? {
            Element::Line(line) => remap_corners(&mut line.start, &mut line.end, to, handle),
            Element::Rectangle(rect) => remap_corners(&mut rect.p1, &mut rect.p2, to, handle),
            Element::Circle(circle) => circle.edge = to,
            Element::Sticker(sticker) => {
                let mut p1 = sticker.anchor;
                let mut p2 = Point::new(p1.x + sticker.width, p1.y + sticker.height);
                remap_corners(&mut p1, &mut p2, to, handle);
                sticker.anchor = p1;
                sticker.width = p2.x - p1.x;
                sticker.height = p2.y - p1.y;
            }
            Element::Freehand(_) | Element::Text(_) | Element::Decoration(_) => return Ok(()),
        }
        self.refresh_drawable(id);
        Ok(())
    }

    /// Finalize an element after a gesture: canonical corner order,
    /// measured text extent, fresh drawable. Idempotent.
    pub fn commit_element(&mut self, id: ElementId) -> Result<()> {
        let (element, measure) = self.element_and_measure_mut(id)?;
        match element {
            Element::Line(line) => line.normalize(),
            Element::Rectangle(rect) => rect.normalize(),
            Element::Sticker(sticker) => sticker.normalize(),
            Element::Text(text) => text.remeasure(measure),
            Element::Freehand(_) | Element::Circle(_) | Element::Decoration(_) => {}
        }
        self.refresh_drawable(id);
        Ok(())
    }
}
