use ai_image_generator::{
    ai::{GeminiImageClient, MockImageGenerationClient},
    image::{decode_source, ImageSource},
    models::{ApiKey, Config},
    ui::{Projector, UiState},
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.0-flash-exp-image-generation";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash-exp-image-generation:generateContent";

fn gemini_projector(server: &MockServer) -> Projector {
    let client = GeminiImageClient::new(ApiKey::Present("test-key".to_string()), MODEL.to_string())
        .with_base_url(server.uri());
    Projector::new(Box::new(client))
}

fn image_body(mime_type: &str, data: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "inlineData": { "mimeType": mime_type, "data": data } }]
            }
        }]
    })
}

#[tokio::test]
async fn test_red_bicycle_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("image/jpeg", "Zm9v")))
        .expect(1)
        .mount(&server)
        .await;

    let mut projector = gemini_projector(&server);
    let state = projector.generate("a red bicycle").await.clone();

    assert_eq!(
        state,
        UiState {
            current_image: ImageSource::DataUrl("data:image/jpeg;base64,Zm9v".to_string()),
            is_loading: false,
            last_error: None,
        }
    );
}

#[tokio::test]
async fn test_whitespace_prompt_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("image/png", "AAAA")))
        .expect(0)
        .mount(&server)
        .await;

    let mut projector = gemini_projector(&server);
    let state = projector.generate("   ").await;

    assert!(state.last_error.is_some());
    assert!(!state.is_loading);
    assert!(state.current_image.is_placeholder());
}

#[tokio::test]
async fn test_error_statuses_leave_placeholder() {
    for (status, body) in [
        (400, r#"{"error":{"message":"Invalid prompt","status":"INVALID_ARGUMENT"}}"#),
        (403, "forbidden"),
        (500, r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"AAAA"}}]}}]}"#),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;

        let mut projector = gemini_projector(&server);
        let state = projector.generate("a dream").await;

        assert!(!state.is_loading, "status {}", status);
        assert!(state.current_image.is_placeholder(), "status {}", status);
        assert!(state.last_error.is_some(), "status {}", status);
    }
}

#[tokio::test]
async fn test_text_only_response_reverts_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "sorry, can't generate that" }] }
            }]
        })))
        .mount(&server)
        .await;

    let mut projector = gemini_projector(&server);
    let state = projector.generate("something forbidden").await;

    assert!(state.current_image.is_placeholder());
    assert_eq!(
        state.last_error.as_deref(),
        Some("Failed to generate image: No image data found in the API response parts.")
    );
}

#[tokio::test]
async fn test_repeated_generation_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("image/png", "UA==")))
        .expect(3)
        .mount(&server)
        .await;

    let mut projector = gemini_projector(&server);
    let mut sources = Vec::new();
    for _ in 0..3 {
        sources.push(
            projector
                .generate("a quiet harbor")
                .await
                .current_image_source()
                .to_string(),
        );
    }

    assert_eq!(sources, vec!["data:image/png;base64,UA=="; 3]);
}

#[tokio::test]
async fn test_missing_api_key_surfaces_as_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config::from_lookup(|name| match name {
        "GEMINI_BASE_URL" => Some(server.uri()),
        _ => None,
    })
    .unwrap();
    let client = GeminiImageClient::new(config.api_key, config.model).with_base_url(config.base_url);
    let mut projector = Projector::new(Box::new(client));

    let state = projector.generate("a red bicycle").await;
    assert_eq!(
        state.last_error.as_deref(),
        Some("API key is not configured. Please set GEMINI_API_KEY.")
    );
    assert!(!state.is_loading);
    assert!(state.current_image.is_placeholder());
}

#[tokio::test]
async fn test_undecodable_image_triggers_load_failure() {
    let mock = MockImageGenerationClient::new().with_image_response("image/jpeg", "Zm9v");
    let mut projector = Projector::new(Box::new(mock.clone()));

    projector.generate("garbage bytes").await;
    assert!(projector.download().is_some());

    if decode_source(&projector.state().current_image).await.is_err() {
        projector.image_load_failed();
    }

    let state = projector.state();
    assert!(state.current_image.is_placeholder());
    assert_eq!(
        state.last_error.as_deref(),
        Some("Failed to load the generated image. Please try again.")
    );
    assert!(projector.download().is_none());
    assert_eq!(mock.get_call_count(), 1);
}

#[tokio::test]
async fn test_generated_png_loads_and_downloads() {
    let mock = MockImageGenerationClient::new();
    let mut projector = Projector::new(Box::new(mock));
    projector.generate("a single pixel").await;

    let loaded = decode_source(&projector.state().current_image).await.unwrap();
    assert_eq!((loaded.width, loaded.height), (1, 1));

    let dir = tempfile::tempdir().unwrap();
    let saved = projector
        .download()
        .unwrap()
        .save_to(dir.path())
        .await
        .unwrap();
    let bytes = std::fs::read(saved).unwrap();
    assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
}
