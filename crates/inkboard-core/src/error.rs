//! Engine error taxonomy.

use crate::element::ElementId;
use crate::persistence::StorageError;
use thiserror::Error;

/// Errors raised by engine operations.
///
/// None of these are fatal: the caller aborts the operation in progress and
/// the input machine falls back to `idle`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid element type: {0}")]
    InvalidElementType(String),
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] StorageError),
    #[error("Asset load failure: {0}")]
    AssetLoadFailure(String),
    #[error("No user identity available")]
    NotAuthenticated,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
