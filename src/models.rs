//! Data models and configuration
//!
//! Defines the extracted image value produced by generation clients and the
//! runtime configuration used to construct them.

use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_IMAGE_MODEL";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Image found in a generation response: MIME type plus the base64 payload
/// exactly as the API returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub mime_type: String,
    pub data: String,
}

impl ExtractedImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// `data:<mime>;base64,<payload>`, with the payload untouched.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// API credential as handed to a client. `Missing` is a real state: clients
/// report it at call time instead of failing construction.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiKey {
    Present(String),
    Missing,
}

impl ApiKey {
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(key) if !key.trim().is_empty() => Self::Present(key),
            _ => Self::Missing,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(key) => Some(key),
            Self::Missing => None,
        }
    }
}

// Keep keys out of logs.
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present(_) => f.write_str("ApiKey::Present(***)"),
            Self::Missing => f.write_str("ApiKey::Missing"),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Unset optional values fall
    /// back to defaults; an unset key becomes [`ApiKey::Missing`].
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout = match non_empty(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    crate::Error::InvalidConfiguration(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        TIMEOUT_VAR, raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_key: ApiKey::from_option(lookup(API_KEY_VAR)),
            model: non_empty(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
        })
    }
}
