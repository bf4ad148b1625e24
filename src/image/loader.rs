use super::ImageSource;
use crate::{Error, Result};

/// Decoded image properties reported to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
}

fn decode_sync(bytes: Vec<u8>) -> Result<LoadedImage> {
    let img = image::load_from_memory(&bytes)
        .map_err(|e| Error::ImageLoad(format!("Failed to decode image: {}", e)))?;
    Ok(LoadedImage {
        width: img.width(),
        height: img.height(),
    })
}

/// Load `source` the way a display would, off the async runtime.
///
/// Any failure, from a malformed data URL to undecodable bytes, is reported
/// as [`Error::ImageLoad`].
pub async fn decode_source(source: &ImageSource) -> Result<LoadedImage> {
    let bytes = source.bytes().map_err(|e| Error::ImageLoad(e.to_string()))?;

    tokio::task::spawn_blocking(move || decode_sync(bytes))
        .await
        .map_err(|e| Error::ImageLoad(format!("Image decode task join error: {}", e)))?
}
