mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use common::{relay_router, send, TEST_API_KEY};
use prompt_relay::config::RelayConfig;
use prompt_relay::middleware::REQUEST_ID_HEADER;
use prompt_relay::startup::Application;
use std::time::Duration;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = relay_router("http://127.0.0.1:9", Some(TEST_API_KEY), 5);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "prompt-relay");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let app = relay_router("http://127.0.0.1:9", Some(TEST_API_KEY), 5);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn metrics_count_generate_outcomes() {
    let app = relay_router("http://127.0.0.1:9", Some(TEST_API_KEY), 5);
    let (status, _) = send(app.clone(), "POST", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("relay_requests_total{outcome=\"missing_prompt\"}"));
}

#[tokio::test]
async fn application_serves_on_random_port() {
    let mut config: RelayConfig = serde_json::from_str(r#"{ "port": 0 }"#).unwrap();
    config.upstream.base_url = "http://127.0.0.1:9".to_string();

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/generate", port))
        .json(&serde_json::json!({ "prompt": "hi" }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "API key not configured");
}
