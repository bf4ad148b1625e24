use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part, RequestPart};
use crate::ai::ImageGenerationService;
use crate::error::MalformedReason;
use crate::models::{ApiKey, ExtractedImage};
use crate::prompt::Prompt;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

/// `generateContent` body for one prompt. Built once, never mutated.
///
/// No `responseMimeType` is sent: image-capable models reject it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
}

impl GenerationRequest {
    pub fn new(prompt: &Prompt) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.as_str().to_string(),
                }],
            }],
            generation_config: ImageGenerationConfig {
                response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
            },
        }
    }
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: ApiKey, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: ApiKey, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }
}

/// Pull the image out of a decoded response.
///
/// Only the first candidate is consulted. The first part whose inline MIME
/// type starts with `image/` wins; later image parts are ignored.
pub fn extract_image(response: &GenerateContentResponse) -> Result<ExtractedImage> {
    let candidate = response
        .candidates
        .as_deref()
        .and_then(|candidates| candidates.first())
        .and_then(Option::as_ref)
        .ok_or_else(|| {
            tracing::error!("No candidates in Gemini response: {:?}", response);
            Error::malformed(MalformedReason::NoCandidates)
        })?;

    // Null entries are skipped; a list of only nulls counts as empty.
    let parts: Vec<&Part> = candidate
        .content
        .as_ref()
        .and_then(|content| content.parts.as_deref())
        .map(|parts| parts.iter().flatten().collect())
        .unwrap_or_default();
    if parts.is_empty() {
        tracing::error!("No content parts in Gemini candidate: {:?}", candidate);
        return Err(Error::malformed(MalformedReason::NoContentParts));
    }

    let image_part = parts.iter().find_map(|part| {
        part.inline_data.as_ref().filter(|inline| {
            inline
                .mime_type
                .as_deref()
                .is_some_and(|mime| mime.starts_with("image/"))
        })
    });

    if let Some(inline) = image_part {
        match (inline.mime_type.as_deref(), inline.data.as_deref()) {
            (Some(mime_type), Some(data)) if !data.is_empty() => {
                tracing::debug!(
                    "Gemini returned image with mime_type: {} ({} base64 chars)",
                    mime_type,
                    data.len()
                );
                return Ok(ExtractedImage::new(mime_type, data));
            }
            _ => tracing::error!("Gemini image part is missing its base64 payload"),
        }
    }

    for (index, part) in parts.iter().enumerate() {
        tracing::debug!(
            "Part {}: text={} inlineData={}",
            index,
            part.text.is_some(),
            part.inline_data.is_some()
        );
    }

    let text = parts.iter().find_map(|part| part.text.clone());
    if let Some(text) = &text {
        tracing::warn!("Gemini returned text but no image: {}", text);
    }

    Err(Error::MalformedResponse {
        reason: MalformedReason::NoImagePart,
        text,
    })
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate(&self, prompt: &Prompt) -> Result<ExtractedImage> {
        let request = GenerationRequest::new(prompt);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;
        extract_image(&response)
    }
}
