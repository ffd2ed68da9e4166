//! InkBoard Render Library
//!
//! Paints an engine state onto any [`Surface`]: background and grid, animated
//! decorations, sketch-style shapes and freehand outlines, then the
//! screen-space text editor and alert banner. [`RecordingSurface`] captures
//! the draw calls as a display list for headless use and tests.

pub mod animation;
pub mod config;
mod error;
pub mod outline;
mod painter;
pub mod recording;
mod surface;

pub use animation::{animation_at, animation_transform};
pub use config::{GridStyle, RenderConfig};
pub use error::{RenderError, RenderResult};
pub use outline::{OutlineOptions, freehand_path, stroke_outline};
pub use painter::{RenderContext, Renderer, ScenePainter};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::Surface;
