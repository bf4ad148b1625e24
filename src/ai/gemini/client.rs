use super::types::ErrorEnvelope;
use crate::models::{ApiKey, API_KEY_VAR, DEFAULT_BASE_URL};
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client. Classifies every failure into the
/// transport / API / configuration variants of [`Error`].
pub struct GeminiHttpClient {
    pub(crate) client: Client,
    api_key: ApiKey,
    model: String,
    pub(crate) base_url: String,
    timeout: Option<Duration>,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` may be the bare model ID (for example
    /// `gemini-2.0-flash-exp-image-generation`) or a `models/...` path; the
    /// prefix is stripped.
    pub fn new(api_key: ApiKey, model: String) -> Self {
        Self::new_with_client(api_key, model, Client::new())
    }

    pub fn new_with_client(api_key: ApiKey, model: String, client: Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout. `None` leaves the transport default in place.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_to_url<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: String,
        request: &Req,
    ) -> Result<Resp> {
        let api_key = self.api_key.as_str().ok_or_else(|| {
            tracing::error!("API key is missing, refusing to call Gemini");
            Error::MissingConfiguration(API_KEY_VAR.to_string())
        })?;

        let mut builder = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        // `without_url` keeps the key query parameter out of messages.
        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to send request to Gemini: {}", e);
            Error::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(api_error(status, &error_text));
        }

        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to read Gemini response body: {}", e);
            Error::Transport(e.to_string())
        })?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::Transport(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        tracing::debug!("Sending generateContent request (model: {})", self.model);
        self.post_to_url(url, request).await
    }
}

/// Build an [`Error::Api`] from a non-success status and its raw body.
///
/// Uses `error.message` from the body, or `API Error: <code>` when the body
/// has no usable message. ` (<error.status>)` is appended to either when the
/// envelope carries a status.
pub(crate) fn api_error(status: StatusCode, body: &str) -> Error {
    let code = status.as_u16();
    let error = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);

    let (message, error_status) = match error {
        Some(error) => (
            error.message.filter(|m| !m.is_empty()),
            error.status.filter(|s| !s.is_empty()),
        ),
        None => (None, None),
    };
    let message = message.unwrap_or_else(|| format!("API Error: {}", code));
    let message = match error_status {
        Some(error_status) => format!("{} ({})", message, error_status),
        None => message,
    };

    Error::Api {
        status: code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: Error) -> (u16, String) {
        match err {
            Error::Api { status, message } => (status, message),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_uses_message_and_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let (status, message) = message_of(api_error(StatusCode::BAD_REQUEST, body));
        assert_eq!(status, 400);
        assert_eq!(message, "API key not valid. (INVALID_ARGUMENT)");
    }

    #[test]
    fn test_api_error_message_without_status() {
        let body = r#"{"error":{"message":"Quota exceeded"}}"#;
        let (_, message) = message_of(api_error(StatusCode::TOO_MANY_REQUESTS, body));
        assert_eq!(message, "Quota exceeded");
    }

    #[test]
    fn test_api_error_falls_back_on_plain_body() {
        let (status, message) =
            message_of(api_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded"));
        assert_eq!(status, 500);
        assert_eq!(message, "API Error: 500");
    }

    #[test]
    fn test_api_error_falls_back_when_message_absent() {
        let body = r#"{"error":{"status":"UNAVAILABLE"}}"#;
        let (_, message) = message_of(api_error(StatusCode::SERVICE_UNAVAILABLE, body));
        assert_eq!(message, "API Error: 503 (UNAVAILABLE)");
    }

    #[test]
    fn test_model_prefix_is_stripped() {
        let client = GeminiHttpClient::new(
            ApiKey::Missing,
            "models/gemini-2.0-flash-exp-image-generation".to_string(),
        );
        assert_eq!(client.model(), "gemini-2.0-flash-exp-image-generation");
    }
}
