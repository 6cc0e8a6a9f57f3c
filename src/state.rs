use std::sync::Arc;

use chrono::FixedOffset;

use crate::services::llm_service::LlmService;
use crate::services::narrative_service::TieredNarrator;

#[derive(Clone)]
pub struct AppState {
    pub llm_service: Arc<LlmService>,
    pub narrator: Arc<TieredNarrator>,
    pub assistant_offset: FixedOffset,
}

impl AppState {
    pub fn new(llm_service: Arc<LlmService>, assistant_offset: FixedOffset) -> Self {
        let narrator = Arc::new(TieredNarrator::with_llm(llm_service.clone()));
        Self {
            llm_service,
            narrator,
            assistant_offset,
        }
    }
}
