//! Image sources and render-time loading
//!
//! An [`ImageSource`] is what the rendering surface displays: the bundled
//! placeholder or a `data:` URL built from a generated image.

pub mod loader;

pub use loader::{decode_source, LoadedImage};

use crate::{Error, Result};
use base64::Engine as _;

/// Reference string reported for the bundled fallback image.
pub const PLACEHOLDER_REF: &str = "assets/default_image.png";

/// Bundled fallback image bytes.
pub const PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/default_image.png");

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSource {
    #[default]
    Placeholder,
    DataUrl(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Placeholder => PLACEHOLDER_REF,
            Self::DataUrl(url) => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Raw image bytes behind this source.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Placeholder => Ok(PLACEHOLDER_PNG.to_vec()),
            Self::DataUrl(url) => decode_data_url(url),
        }
    }
}

/// Split `data:<mime>;base64,<payload>` into MIME type and payload.
pub fn split_data_url(url: &str) -> Result<(&str, &str)> {
    let rest = url
        .strip_prefix(DATA_URL_SCHEME)
        .ok_or_else(|| Error::Decode("Not a data URL".to_string()))?;
    let (mime_type, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| Error::Decode("Data URL is not base64 encoded".to_string()))?;
    Ok((mime_type, payload))
}

pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (_, payload) = split_data_url(url)?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::Decode(format!("Failed to decode base64 image: {}", e)))
}
