//! Integration tests for the Gemini backend against a mock HTTP server.

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use oneline::{
    AppState, GeminiModel, ModelClient, ModelConfig, SummarizationService, router,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn config(base_url: &str) -> ModelConfig {
    ModelConfig {
        api_key: Some(SecretString::new("test-key".to_string())),
        base_url: base_url.to_string(),
        ..ModelConfig::default()
    }
}

fn client(server: &MockServer) -> ModelClient<GeminiModel> {
    ModelClient::<GeminiModel>::initialize(&config(&server.uri())).unwrap()
}

fn invalid_key_response() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT"
        }
    }))
}

#[tokio::test]
async fn sends_rendered_prompt_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header_matcher("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": "Summarize the following text in one concise line: hello"}]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "A greeting."}], "role": "model"},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 3, "totalTokenCount": 13}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client(&server).summarize("hello").await.unwrap();
    assert_eq!(summary, "A greeting.");
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(invalid_key_response())
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server).summarize("hello").await.unwrap_err();
    assert_eq!(
        error.message(),
        "Gemini API returned 400: API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn malformed_body_is_a_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client(&server).summarize("hello").await.unwrap_err();
    assert!(error.message().starts_with("malformed Gemini response"));
}

#[tokio::test]
async fn unreachable_provider_is_a_generation_error() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ModelClient::<GeminiModel>::initialize(&config(&uri)).unwrap();
    let error = client.summarize("hello").await.unwrap_err();
    assert!(error.message().starts_with("request to Gemini failed"));
}

#[tokio::test]
async fn no_retry_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server).summarize("hello").await.unwrap_err();
    assert_eq!(error.message(), "Gemini API returned 503: overloaded");
}

async fn chat_with_invalid_key(legacy: bool) -> (StatusCode, Value) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(invalid_key_response())
        .expect(1)
        .mount(&server)
        .await;

    let service = SummarizationService::new(Some(client(&server)));
    let app = router(
        AppState::new(service).with_legacy_error_payloads(legacy),
        "static",
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("user_query=The+quick+brown+fox"))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn invalid_credential_signals_failure_over_chat() {
    let (status, body) = chat_with_invalid_key(false).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error summarizing text:"));
    assert!(detail.contains("API key not valid"));
}

#[tokio::test]
async fn invalid_credential_in_legacy_mode() {
    let (status, body) = chat_with_invalid_key(true).await;

    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_str().unwrap();
    assert!(response.starts_with("Error summarizing text:"));
}
