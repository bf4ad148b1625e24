use super::ImageGenerationService;
use crate::error::MalformedReason;
use crate::models::ExtractedImage;
use crate::prompt::Prompt;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// 1x1 PNG, base64.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Scripted outcome for one mock call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Image(ExtractedImage),
    Api { status: u16, message: String },
    Malformed(MalformedReason, Option<String>),
    Transport(String),
}

impl MockReply {
    fn into_result(self) -> Result<ExtractedImage> {
        match self {
            Self::Image(image) => Ok(image),
            Self::Api { status, message } => Err(Error::Api { status, message }),
            Self::Malformed(reason, text) => Err(Error::MalformedResponse { reason, text }),
            Self::Transport(message) => Err(Error::Transport(message)),
        }
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_image_response(self, mime_type: &str, data: &str) -> Self {
        self.with_reply(MockReply::Image(ExtractedImage::new(mime_type, data)))
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate(&self, prompt: &Prompt) -> Result<ExtractedImage> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.as_str().to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(ExtractedImage::new("image/png", TINY_PNG_BASE64))
        } else {
            let index = (*count - 1) % replies.len();
            replies[index].clone().into_result()
        }
    }
}
