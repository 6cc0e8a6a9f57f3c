/// API integration tests
///
/// Drives the full router (CORS, tracing, JSON error mapping) with the real
/// OpenAI provider pointed at an address where nothing is listening, so the
/// upstream failure paths are exercised without network access.
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use narrative_backend::app::create_app;
use narrative_backend::config::AppConfig;
use narrative_backend::services::llm_service::LlmService;
use narrative_backend::state::AppState;

fn unreachable_app() -> Router {
    let config = AppConfig::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_BASE_URL" => Some("http://127.0.0.1:9/v1".to_string()),
        "LLM_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .expect("valid test config");
    assert_eq!(config.llm.timeout, Duration::from_secs(5));

    let llm_service = Arc::new(LlmService::new(&config.llm));
    create_app(AppState::new(llm_service, config.assistant_offset))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

// ---------------------------------------------------------------------------
// POST /api/generate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_generate_rejects_empty_scenario() {
    let (status, body) = send(
        unreachable_app(),
        "POST",
        "/api/generate",
        Some(json!({"scenario": "", "history": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Missing 'scenario' text");
}

#[tokio::test]
async fn test_generate_unreachable_upstream_is_internal_error() {
    let (status, body) = send(
        unreachable_app(),
        "POST",
        "/api/generate",
        Some(json!({"scenario": "We plan to open a second store next quarter."})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let message = body["error"].as_str().expect("error message present");
    assert!(!message.is_empty());
}

// ---------------------------------------------------------------------------
// POST /api/scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_scenarios_fall_back_to_template_when_upstream_down() {
    let (status, body) = send(
        unreachable_app(),
        "POST",
        "/api/scenarios",
        Some(json!({
            "baseline": {"revenue": 1000, "cost": 800, "growth": 10},
            "scenarios": [
                {"name": "Price rise", "revenue": "+10%"},
                {"name": "Discounting", "revenue": "-10%", "cost": "oops"}
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(results.len(), 3);

    let rise = &results[1];
    assert!((rise["revenue"].as_f64().unwrap() - 1100.0).abs() < 1e-9);
    assert!((rise["profit"].as_f64().unwrap() - 300.0).abs() < 1e-9);
    assert!((rise["margin"].as_f64().unwrap() - 300.0 / 1100.0).abs() < 1e-9);
    assert!((rise["revenue_next"].as_f64().unwrap() - 1210.0).abs() < 1e-6);
    assert_eq!(rise["narrative_source"], "template");
    assert!(rise["narrative"].as_str().unwrap().contains("higher than baseline"));

    let discount = &results[2];
    assert_eq!(discount["cost"].as_f64().unwrap(), 800.0);
    assert!(discount["narrative"].as_str().unwrap().contains("lower than baseline"));
}

// ---------------------------------------------------------------------------
// Static routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_and_index() {
    let (status, body) = send(unreachable_app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, body) = send(unreachable_app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Financial Narrative Generator"));
}
