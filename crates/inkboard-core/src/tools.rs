//! Tool selection.

use crate::element::ElementKind;
use crate::geometry::CursorKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Freehand,
    Line,
    Rectangle,
    Circle,
    Text,
    Sticker,
    Eraser,
}

impl ToolKind {
    /// Element type created by drag-drawing with this tool.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Freehand => Some(ElementKind::Freehand),
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Text => Some(ElementKind::Text),
            ToolKind::Sticker => Some(ElementKind::Sticker),
            ToolKind::Select | ToolKind::Pan | ToolKind::Eraser => None,
        }
    }

    /// True for tools that create elements by dragging.
    pub fn draws(self) -> bool {
        matches!(
            self,
            ToolKind::Freehand | ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle
        )
    }

    /// Idle cursor over empty canvas.
    pub fn cursor(self) -> CursorKind {
        match self {
            ToolKind::Select => CursorKind::Default,
            ToolKind::Pan => CursorKind::Grabbing,
            ToolKind::Text => CursorKind::Text,
            ToolKind::Freehand
            | ToolKind::Line
            | ToolKind::Rectangle
            | ToolKind::Circle
            | ToolKind::Sticker
            | ToolKind::Eraser => CursorKind::Crosshair,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pan => "pan",
            ToolKind::Freehand => "freehand",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Text => "text",
            ToolKind::Sticker => "sticker",
            ToolKind::Eraser => "eraser",
        }
    }
}
