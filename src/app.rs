use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{generate, health, index, scenarios};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .merge(index::router())
        .nest("/health", health::router())
        .nest("/api/generate", generate::router())
        .nest("/api/scenarios", scenarios::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
