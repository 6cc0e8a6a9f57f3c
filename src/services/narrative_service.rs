use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::{NarrativeSource, ScoredScenario};
use crate::services::llm_service::LlmService;
use crate::utils::format::format_money;

const NARRATIVE_MAX_TOKENS: usize = 250;
const NARRATIVE_TEMPERATURE: f32 = 0.6;

/// Produces a narrative comparing a scenario to the baseline.
/// `None` means "not available, ask someone else".
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn narrate(&self, scenario: &ScoredScenario, baseline: &ScoredScenario) -> Option<String>;

    fn source(&self) -> NarrativeSource;
}

/// Deterministic narrative built from the computed metrics.
pub fn template_narrative(scenario: &ScoredScenario, baseline: &ScoredScenario) -> String {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!(
        "{}: Revenue {}, cost {}, margin {:.1}%.",
        scenario.name,
        format_money(scenario.revenue),
        format_money(scenario.cost),
        scenario.metrics.margin * 100.0
    ));

    let change_pct = |delta: f64| {
        if baseline.revenue != 0.0 {
            delta / baseline.revenue * 100.0
        } else {
            0.0
        }
    };
    if scenario.revenue > baseline.revenue {
        let pct = change_pct(scenario.revenue - baseline.revenue);
        lines.push(format!("Revenue is {:.1}% higher than baseline.", pct));
    } else if scenario.revenue < baseline.revenue {
        let pct = change_pct(baseline.revenue - scenario.revenue);
        lines.push(format!("Revenue is {:.1}% lower than baseline.", pct));
    } else {
        lines.push("Revenue matches baseline.".to_string());
    }

    if scenario.metrics.margin < 0.05 {
        lines.push("Margin is low, consider cost reductions.".to_string());
    } else if scenario.metrics.margin > 0.20 {
        lines.push("Strong margins, potential for reinvestment.".to_string());
    }

    lines.push(format!(
        "Next year projected revenue: {}.",
        format_money(scenario.metrics.revenue_next)
    ));
    lines.join(" ")
}

pub fn build_comparison_prompt(scenario: &ScoredScenario, baseline: &ScoredScenario) -> String {
    format!(
        r#"You are a financial analyst. Compare the following scenario vs baseline:
Scenario: revenue={}, cost={}, margin={:.2}, growth={}
Baseline: revenue={}, cost={}, margin={:.2}, growth={}
Write a 4-6 sentence factual narrative summary with insight."#,
        scenario.revenue,
        scenario.cost,
        scenario.metrics.margin,
        scenario.growth,
        baseline.revenue,
        baseline.cost,
        baseline.metrics.margin,
        baseline.growth,
    )
}

pub struct TemplateNarrator;

#[async_trait]
impl NarrativeGenerator for TemplateNarrator {
    async fn narrate(&self, scenario: &ScoredScenario, baseline: &ScoredScenario) -> Option<String> {
        Some(template_narrative(scenario, baseline))
    }

    fn source(&self) -> NarrativeSource {
        NarrativeSource::Template
    }
}

/// Asks the completion service for a short narrative. Every failure is
/// reported as `None`, never as an error.
pub struct AiNarrator {
    llm_service: Arc<LlmService>,
}

impl AiNarrator {
    pub fn new(llm_service: Arc<LlmService>) -> Self {
        Self { llm_service }
    }
}

#[async_trait]
impl NarrativeGenerator for AiNarrator {
    async fn narrate(&self, scenario: &ScoredScenario, baseline: &ScoredScenario) -> Option<String> {
        if !self.llm_service.is_enabled() {
            return None;
        }

        let prompt = build_comparison_prompt(scenario, baseline);
        match self
            .llm_service
            .generate_completion(prompt, NARRATIVE_MAX_TOKENS, NARRATIVE_TEMPERATURE)
            .await
        {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!("LLM returned an empty narrative for '{}'", scenario.name);
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                warn!("LLM narrative failed for '{}': {}", scenario.name, e);
                None
            }
        }
    }

    fn source(&self) -> NarrativeSource {
        NarrativeSource::Ai
    }
}

/// Primary narrator with a deterministic template fallback.
pub struct TieredNarrator {
    primary: Box<dyn NarrativeGenerator>,
    fallback: TemplateNarrator,
}

impl TieredNarrator {
    pub fn new(primary: Box<dyn NarrativeGenerator>) -> Self {
        Self { primary, fallback: TemplateNarrator }
    }

    pub fn with_llm(llm_service: Arc<LlmService>) -> Self {
        Self::new(Box::new(AiNarrator::new(llm_service)))
    }

    pub async fn narrate(
        &self,
        scenario: &ScoredScenario,
        baseline: &ScoredScenario,
    ) -> (String, NarrativeSource) {
        if let Some(text) = self.primary.narrate(scenario, baseline).await {
            return (text, self.primary.source());
        }

        info!("Using template narrative for '{}'", scenario.name);
        let text = match self.fallback.narrate(scenario, baseline).await {
            Some(text) => text,
            None => template_narrative(scenario, baseline),
        };
        (text, self.fallback.source())
    }
}
