//! Time-animated decorative overlays.

use super::ElementId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Looping animation applied to a decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    #[default]
    Rotate,
    Bounce,
    Pulse,
    Float,
}

/// A purely visual animated image.
///
/// Decorations are never persisted and never take part in editing hit-tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub(crate) id: ElementId,
    /// Top-left corner.
    pub position: Point,
    pub size: Size,
    pub animation: AnimationKind,
    pub source: String,
    pub started_at_ms: u64,
    pub duration_ms: u64,
}

impl Decoration {
    pub fn new(
        position: Point,
        size: Size,
        animation: AnimationKind,
        source: String,
        started_at_ms: u64,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            animation,
            source,
            started_at_ms,
            duration_ms,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Loop progress in `[0, 1)` at time `now_ms`.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        (elapsed % self.duration_ms) as f64 / self.duration_ms as f64
    }
}
