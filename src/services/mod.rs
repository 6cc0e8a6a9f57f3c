pub mod chat_service;
pub mod llm_service;
pub mod metrics;
pub mod narrative_service;
pub mod scenario_service;
