mod chat;
pub mod llm;
pub mod scenario;

pub use chat::{ChatTurn, GenerateRequest, GenerateResponse};
pub use llm::{ChatMessage, ChatRole, CompletionRequest};
pub use scenario::{
    Baseline, EvaluateScenariosRequest, Metrics, NarrativeSource, ScenarioInput, ScenarioResult,
    ScenarioValue, ScoredScenario,
};
