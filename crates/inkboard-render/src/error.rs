//! Rendering errors.

use thiserror::Error;

/// Errors raised by a drawing surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(String),
    /// A raster asset the surface has never seen. The painter substitutes a
    /// placeholder rather than failing the frame.
    #[error("Missing asset: {0}")]
    MissingAsset(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
