//! A surface that records draw calls into a display list.

use crate::error::{RenderError, RenderResult};
use crate::surface::Surface;
use inkboard_core::element::ApproxTextMeasure;
use inkboard_core::{SerializableColor, TextMeasure};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use std::collections::HashSet;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(SerializableColor),
    Save,
    Restore,
    Transform(Affine),
    SetAlpha(f64),
    FillPath {
        path: BezPath,
        color: SerializableColor,
    },
    StrokePath {
        path: BezPath,
        color: SerializableColor,
        width: f64,
    },
    DrawImage {
        source: String,
        rect: Rect,
    },
    FillText {
        text: String,
        origin: Point,
        font_size: f64,
        color: SerializableColor,
    },
}

/// Display-list surface used for tests and headless export.
///
/// Tracks the transform and alpha stacks so callers can inspect the state a
/// command was issued under.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    transform: Affine,
    alpha: f64,
    stack: Vec<(Affine, f64)>,
    /// Known raster sources; `None` accepts every source.
    assets: Option<HashSet<String>>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            transform: Affine::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
            assets: None,
        }
    }

    /// Only the given sources resolve; other images fail with
    /// [`RenderError::MissingAsset`].
    pub fn with_assets<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current transform.
    pub fn current_transform(&self) -> Affine {
        self.transform
    }

    pub fn current_alpha(&self) -> f64 {
        self.alpha
    }

    /// Depth of the save stack; zero after a balanced frame.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl TextMeasure for RecordingSurface {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        ApproxTextMeasure.measure(text, font_size)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.transform = Affine::IDENTITY;
        self.alpha = 1.0;
        self.stack.clear();
        self.commands.push(DrawCommand::Clear(color.into()));
    }

    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some((transform, alpha)) => {
                self.transform = transform;
                self.alpha = alpha;
            }
            None => log::warn!("Unbalanced surface restore"),
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn transform(&mut self, affine: Affine) {
        self.transform *= affine;
        self.commands.push(DrawCommand::Transform(affine));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
        self.commands.push(DrawCommand::SetAlpha(self.alpha));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color: color.into(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color: color.into(),
            width,
        });
    }

    fn draw_image(&mut self, source: &str, rect: Rect) -> RenderResult<()> {
        if self.assets.as_ref().is_some_and(|known| !known.contains(source)) {
            return Err(RenderError::MissingAsset(source.to_string()));
        }
        self.commands.push(DrawCommand::DrawImage {
            source: source.to_string(),
            rect,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            font_size,
            color: color.into(),
        });
    }
}
