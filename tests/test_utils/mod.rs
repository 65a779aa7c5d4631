//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, body::Body};

use mailpilot::api::AppState;
use mailpilot::api::app;
use mailpilot::core::AppConfig;
use mailpilot::store::seed;

fn test_config(llm_api_hostname: &str, llm_enabled: bool) -> AppConfig {
    AppConfig {
        llm_api_hostname: llm_api_hostname.to_string(),
        llm_api_key: String::from("test-api-key"),
        llm_model: String::from("gpt-4o-mini"),
        llm_enabled,
        llm_timeout_secs: 5,
        ..AppConfig::default()
    }
}

/// Creates a test application router over the demo mailbox with the
/// LLM provider disabled, so every pipeline stage produces its
/// deterministic fallback.
pub fn test_app() -> Router {
    let app_state = AppState::new(
        seed::demo_mailbox(),
        test_config("http://127.0.0.1:1", false),
    );
    app(Arc::new(app_state))
}

/// Same as `test_app` but with the LLM pointed at a mock server.
pub fn test_app_with_llm(hostname: &str) -> Router {
    let app_state = AppState::new(seed::demo_mailbox(), test_config(hostname, true));
    app(Arc::new(app_state))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body is not utf-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Response body is not JSON")
}
