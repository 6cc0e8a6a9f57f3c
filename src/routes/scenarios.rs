use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{EvaluateScenariosRequest, NarrativeSource, ScenarioResult};
use crate::services::scenario_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(evaluate_scenarios))
}

/// POST /api/scenarios
///
/// Request body:
/// {
///   "baseline": {"revenue": 1000, "cost": 800, "growth": 10},
///   "scenarios": [{"name": "Price rise", "revenue": "+10%"}]
/// }
///
/// Returns the baseline followed by one result per scenario.
async fn evaluate_scenarios(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateScenariosRequest>, JsonRejection>,
) -> Result<Json<Vec<ScenarioResult>>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("POST /api/scenarios - rejected body: {}", rejection.body_text());
        AppError::from(rejection)
    })?;

    info!("POST /api/scenarios - {} scenario(s)", request.scenarios.len());

    let results =
        scenario_service::run_scenarios(&state.narrator, &request.baseline, &request.scenarios).await;

    let templated = results
        .iter()
        .filter(|r| r.narrative_source == NarrativeSource::Template)
        .count();
    if templated > 0 {
        info!("{} of {} scenario narrative(s) used the template fallback", templated, request.scenarios.len());
    }

    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use chrono::FixedOffset;
    use http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app::create_app;
    use crate::services::llm_service::LlmService;
    use crate::state::AppState;

    async fn post_json(body: Value) -> (StatusCode, Value) {
        let state = AppState::new(Arc::new(LlmService::disabled()), FixedOffset::east_opt(0).unwrap());
        let response = create_app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/scenarios")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_evaluates_baseline_and_scenarios() {
        let (status, body) = post_json(json!({
            "baseline": {"revenue": 1000, "cost": 800, "growth": 10},
            "scenarios": [{"name": "Price rise", "revenue": "+10%"}]
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "Baseline");
        assert_eq!(results[0]["narrative"], "Baseline scenario.");
        assert_eq!(results[1]["name"], "Price rise");
        assert!((results[1]["revenue"].as_f64().unwrap() - 1100.0).abs() < 1e-9);
        assert!((results[1]["profit"].as_f64().unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(results[1]["narrative_source"], "template");
    }

    #[tokio::test]
    async fn test_odd_scenario_names_do_not_reject_batch() {
        let (status, body) = post_json(json!({
            "baseline": {"revenue": 1000, "cost": 800, "growth": 10},
            "scenarios": [
                {"name": null, "revenue": "+10%"},
                {"name": 7, "cost": "-5%"}
            ]
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1]["name"], "Scenario");
        assert!((results[1]["revenue"].as_f64().unwrap() - 1100.0).abs() < 1e-9);
        assert_eq!(results[2]["name"], "7");
        assert!((results[2]["cost"].as_f64().unwrap() - 760.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_baseline_is_bad_request() {
        let (status, body) = post_json(json!({"scenarios": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
