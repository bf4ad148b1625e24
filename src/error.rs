//! Error handling and custom error types
//!
//! Every failure in the generation pipeline is one of these variants. The
//! projector recovers all of them locally; none escape to the caller of
//! `Projector::generate`.

use std::fmt;
use thiserror::Error;

/// Why a 2xx response could not be turned into an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    NoCandidates,
    NoContentParts,
    NoImagePart,
}

impl MalformedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCandidates => "no-candidates",
            Self::NoContentParts => "no-content-parts",
            Self::NoImagePart => "no-image-part",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::NoCandidates => "No candidates found in API response",
            Self::NoContentParts => "No content parts found in API response",
            Self::NoImagePart => "No image data found in the API response parts",
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// `text` holds the first text part of the candidate, if any, for logs.
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        reason: MalformedReason,
        text: Option<String>,
    },

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("A generation request is already in flight")]
    Busy,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(reason: MalformedReason) -> Self {
        Self::MalformedResponse { reason, text: None }
    }

    /// Concise message suitable for showing to the user.
    ///
    /// Raw API bodies and returned text never appear here; those are logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyPrompt => "Please enter a description for the image.".to_string(),
            Self::MissingConfiguration(name) => {
                format!("API key is not configured. Please set {}.", name)
            }
            Self::Api { message, .. } => format!("Failed to generate image: {}.", message),
            Self::MalformedResponse { reason, .. } => {
                format!("Failed to generate image: {}.", reason.describe())
            }
            Self::Transport(message) => format!("Failed to generate image: {}.", message),
            Self::ImageLoad(_) => "Failed to load the generated image. Please try again.".to_string(),
            Self::Busy => "An image is already being generated. Please wait.".to_string(),
            other => format!("Failed to generate image: {}.", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
