//! Scene persistence: the transport-neutral payload and storage backends.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::element::Element;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Scene not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Board variant label stored alongside a scene.
pub const DEFAULT_BOARD_KIND: &str = "Board1";

/// The persisted form of a scene.
///
/// Contains no drawables and no decorations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePayload {
    pub elements: Vec<Element>,
    pub name: String,
    pub board_kind: String,
}

impl ScenePayload {
    /// Build a payload, dropping decorations.
    pub fn new(elements: &[Element], name: impl Into<String>, board_kind: impl Into<String>) -> Self {
        Self {
            elements: elements
                .iter()
                .filter(|e| !e.is_decoration())
                .cloned()
                .collect(),
            name: name.into(),
            board_kind: board_kind.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a payload. Any decorations present are discarded.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let mut payload: Self =
            serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
        payload.elements.retain(|e| !e.is_decoration());
        payload.validate()?;
        Ok(payload)
    }

    /// Reject payloads whose elements could never have been drawn.
    pub fn validate(&self) -> StorageResult<()> {
        for element in &self.elements {
            if matches!(element, Element::Freehand(stroke) if stroke.points.is_empty()) {
                log::warn!("Rejecting scene payload: freehand {} has no points", element.id());
                return Err(StorageError::Serialization(format!(
                    "freehand {} has no points",
                    element.id()
                )));
            }
        }
        Ok(())
    }
}

/// Per-user scene storage.
///
/// Scene ids are UUID strings assigned on first save.
pub trait SceneStore: Send + Sync {
    /// Save `payload`, creating a new scene when `scene_id` is `None`.
    /// Returns the scene id.
    fn save<'a>(
        &'a self,
        owner: &'a str,
        scene_id: Option<&'a str>,
        payload: &'a ScenePayload,
    ) -> BoxFuture<'a, StorageResult<String>>;

    fn load<'a>(&'a self, owner: &'a str, scene_id: &'a str) -> BoxFuture<'a, StorageResult<ScenePayload>>;

    /// Scene ids owned by `owner`.
    fn list<'a>(&'a self, owner: &'a str) -> BoxFuture<'a, StorageResult<Vec<String>>>;

    fn delete<'a>(&'a self, owner: &'a str, scene_id: &'a str) -> BoxFuture<'a, StorageResult<()>>;
}

fn new_scene_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
