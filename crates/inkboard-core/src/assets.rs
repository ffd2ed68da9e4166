//! Raster assets for stickers and decorations.
//!
//! Loading is the engine's only suspension point. A request is handed to
//! the host as an action; when the load settles the host feeds the outcome
//! back and the engine appends one fully-formed element.

use crate::element::AnimationKind;
use crate::error::{EngineError, Result};
use crate::persistence::BoxFuture;
use image::ImageReader;
use kurbo::{Point, Size};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::RwLock;

/// What to create once an asset is available.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPlacement {
    /// Sticker with its top-left at `anchor` (world).
    Sticker { anchor: Point },
    /// Animated decoration with its top-left at `position` (world).
    Decoration {
        position: Point,
        animation: AnimationKind,
    },
}

/// A pending asset load.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub source: String,
    pub placement: AssetPlacement,
}

/// Decoded asset metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetInfo {
    /// Natural pixel size.
    pub size: Size,
}

/// Resolves asset ids to decoded metadata.
pub trait AssetLoader: Send + Sync {
    fn load<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<AssetInfo>>;
}

/// Reads PNG/JPEG headers from an in-memory registry.
#[derive(Default)]
pub struct ImageAssetLoader {
    sources: RwLock<HashMap<String, Vec<u8>>>,
}

impl ImageAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under `source`.
    pub fn register(&self, source: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let mut sources = self
            .sources
            .write()
            .map_err(|e| EngineError::AssetLoadFailure(format!("Lock error: {e}")))?;
        sources.insert(source.into(), bytes);
        Ok(())
    }

    fn decode(&self, source: &str) -> Result<AssetInfo> {
        let sources = self
            .sources
            .read()
            .map_err(|e| EngineError::AssetLoadFailure(format!("Lock error: {e}")))?;
        let bytes = sources
            .get(source)
            .ok_or_else(|| EngineError::AssetLoadFailure(format!("Unknown asset: {source}")))?;
        let (width, height) = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| EngineError::AssetLoadFailure(format!("{source}: {e}")))?
            .into_dimensions()
            .map_err(|e| EngineError::AssetLoadFailure(format!("{source}: {e}")))?;
        log::debug!("Read asset {source}: {width}x{height}");
        Ok(AssetInfo {
            size: Size::new(width as f64, height as f64),
        })
    }
}

impl AssetLoader for ImageAssetLoader {
    fn load<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<AssetInfo>> {
        Box::pin(async move { self.decode(source) })
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}
