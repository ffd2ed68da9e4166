//! Pointer and keyboard event types.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command modifier (Ctrl or Meta).
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Left-button mouse event without modifiers.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: MouseButton::Left,
            kind: PointerKind::Mouse,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A wheel event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    /// Scroll delta in pixels (positive y scrolls down).
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

/// A keyboard event. Keys use DOM-style names (`"z"`, `" "`, `"Enter"`,
/// `"Escape"`, `"Backspace"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn is_space(&self) -> bool {
        self.key == " " || self.key.eq_ignore_ascii_case("space")
    }
}

/// Double-click detection constants.
pub(crate) const DOUBLE_CLICK_TIME_MS: u64 = 500;
pub(crate) const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Remembers the last click to recognise double-clicks.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ClickTracker {
    last: Option<(u64, Point)>,
}

impl ClickTracker {
    /// Record a click; true if it completes a double-click.
    pub(crate) fn click(&mut self, now_ms: u64, position: Point) -> bool {
        let double = self.last.is_some_and(|(at, pos)| {
            now_ms.saturating_sub(at) < DOUBLE_CLICK_TIME_MS
                && pos.distance(position) < DOUBLE_CLICK_DISTANCE
        });
        self.last = if double { None } else { Some((now_ms, position)) };
        double
    }
}
