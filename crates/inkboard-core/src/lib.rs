//! InkBoard Core Library
//!
//! Platform-agnostic engine for the InkBoard infinite drawing board: the
//! element model, hit-testing, viewport, undo history, input state machine
//! and scene persistence.

pub mod assets;
pub mod config;
pub mod drawable;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod overlay;
pub mod persistence;
pub mod scene;
pub mod tools;
pub mod transform;
pub mod viewport;

pub use assets::{AssetInfo, AssetLoader, AssetPlacement, AssetRequest, ImageAssetLoader};
pub use config::{ConfigError, EngineConfig, WheelBinding};
pub use drawable::{Drawable, DrawableFill, RoughGenerator, ShapeDescription, SketchyRenderer};
pub use element::{
    AnimationKind, DrawStyle, Element, ElementId, ElementKind, FillStyle, SerializableColor,
    ShapeStyle, StrokeWidth, TextMeasure,
};
pub use engine::{Action, Engine, EngineState, Interaction};
pub use error::{EngineError, Result};
pub use geometry::{CursorKind, Hit, HitTolerance, Position};
pub use history::History;
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent, PointerKind, WheelEvent};
pub use overlay::{Alert, TextEditor};
pub use persistence::{FileStore, MemoryStore, SceneStore, ScenePayload, StorageError};
pub use scene::Scene;
pub use tools::ToolKind;
pub use viewport::Viewport;
