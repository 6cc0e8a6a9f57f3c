use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::services::chat_service::{self, PromptContext};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_narrative))
}

/// POST /api/generate
///
/// Request body:
/// {
///   "scenario": "What happens if we raise prices by 10%?",
///   "history": [{"user": "...", "assistant": "..."}],
///   "title": "optional existing title"
/// }
///
/// Returns `{title, reply}` where `reply` is HTML.
async fn generate_narrative(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("POST /api/generate - rejected body: {}", rejection.body_text());
        AppError::from(rejection)
    })?;

    info!(
        "POST /api/generate - model: {}, history turns: {}",
        state.llm_service.model().unwrap_or("none"),
        request.history.len()
    );

    let context = PromptContext::now_in(state.assistant_offset);
    let response = chat_service::generate_reply(&state.llm_service, &context, request)
        .await
        .map_err(|e| {
            match &e {
                AppError::Validation(msg) => warn!("POST /api/generate - {}", msg),
                other => error!("❌ Error in /api/generate: {:?}", other),
            }
            e
        })?;

    info!("Generated reply titled '{}'", response.title);
    Ok(Json(response))
}
