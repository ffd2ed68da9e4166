//! Transient screen-space overlays: the in-place text editor and the alert
//! banner. Neither is part of the element collection or history.

use crate::element::{ElementId, SerializableColor};
use kurbo::Point;

/// In-place editor for a text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditor {
    /// Existing element being edited, `None` for new text.
    pub target: Option<ElementId>,
    /// Top-left of the text in world coordinates.
    pub anchor: Point,
    pub buffer: String,
    pub font_size: f64,
    pub color: SerializableColor,
}

impl TextEditor {
    pub fn new(anchor: Point, font_size: f64, color: SerializableColor) -> Self {
        Self {
            target: None,
            anchor,
            buffer: String::new(),
            font_size,
            color,
        }
    }

    /// Editor pre-filled with an existing element's content.
    pub fn for_element(
        id: ElementId,
        anchor: Point,
        content: &str,
        font_size: f64,
        color: SerializableColor,
    ) -> Self {
        Self {
            target: Some(id),
            anchor,
            buffer: content.to_string(),
            font_size,
            color,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn insert_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Blank (whitespace-only) content commits as a removal.
    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

/// A timed message banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub shown_at_ms: u64,
    pub duration_ms: u64,
}

impl Alert {
    pub fn new(message: impl Into<String>, shown_at_ms: u64, duration_ms: u64) -> Self {
        Self {
            message: message.into(),
            shown_at_ms,
            duration_ms,
        }
    }

    pub fn is_visible(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.shown_at_ms) < self.duration_ms
    }
}
