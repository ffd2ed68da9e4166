//! Text element and text metrics.

use super::{ElementId, SerializableColor};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text metrics provider.
///
/// Rendering surfaces implement this with their font stack; the engine only
/// needs the extent of a block of text.
pub trait TextMeasure {
    /// Width and height of `text` at `font_size`.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// Glyph-free approximation: every character is half an em wide and every
/// line is one em tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f64 * font_size * 0.5,
            lines.len() as f64 * font_size,
        )
    }
}

/// A block of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ElementId,
    pub anchor: Point,
    pub content: String,
    pub font_size: f64,
    pub color: SerializableColor,
    /// Measured extent, refreshed whenever the content is committed.
    #[serde(default)]
    pub size: Size,
}

impl Text {
    pub fn new(anchor: Point, content: String, font_size: f64, color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            content,
            font_size,
            color,
            size: Size::ZERO,
        }
    }

    /// Recompute `size` from the current content.
    pub fn remeasure(&mut self, measure: &dyn TextMeasure) {
        self.size = measure.measure(&self.content, self.font_size);
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.anchor, self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
