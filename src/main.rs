use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use narrative_backend::app;
use narrative_backend::config::AppConfig;
use narrative_backend::logging::{self, LoggingConfig};
use narrative_backend::services::llm_service::LlmService;
use narrative_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().context("Invalid configuration")?;

    let llm_service = Arc::new(LlmService::new(&config.llm));
    let state = AppState::new(llm_service, config.assistant_offset);
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Financial Narrative Generator running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
