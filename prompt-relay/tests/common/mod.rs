use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use prompt_relay::config::{api_key_from, UpstreamConfig};
use prompt_relay::services::{GeminiTextProvider, TextProvider};
use prompt_relay::startup::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.0-flash";

/// Router wired to a Gemini provider pointed at `base_url`.
pub fn relay_router(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Router {
    let provider = GeminiTextProvider::new(UpstreamConfig {
        base_url: base_url.to_string(),
        model: TEST_MODEL.to_string(),
        timeout_secs,
    })
    .expect("Failed to build Gemini provider");

    let text_provider: Arc<dyn TextProvider> = Arc::new(provider);
    let state = AppState::new(api_key_from(api_key.map(str::to_string)), text_provider);

    build_router(state)
}

pub fn generate_path() -> String {
    format!("/models/{}:generateContent", TEST_MODEL)
}

/// Send a request and return the status with the parsed JSON body.
pub async fn send(
    app: Router,
    method: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri("/api/generate");
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }

    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).expect("response body is not JSON");

    (status, json)
}
