//! Image generation service integration
//!
//! Provides the generation trait the projector drives, the Gemini
//! implementation behind it, and a scripted mock for tests and harnesses.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::{MockImageGenerationClient, MockReply};

use crate::models::ExtractedImage;
use crate::prompt::Prompt;
use crate::Result;
use async_trait::async_trait;

/// One remote call per invocation, no retries.
///
/// Failures are classified as [`crate::Error::Api`],
/// [`crate::Error::MalformedResponse`], [`crate::Error::Transport`] or
/// [`crate::Error::MissingConfiguration`].
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<ExtractedImage>;
}
