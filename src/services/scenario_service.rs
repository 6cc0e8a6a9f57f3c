use tracing::info;

use crate::models::{Baseline, NarrativeSource, ScenarioInput, ScenarioResult};
use crate::services::metrics::{score_baseline, score_scenario};
use crate::services::narrative_service::TieredNarrator;

pub const BASELINE_NARRATIVE: &str = "Baseline scenario.";

/// Evaluate every scenario against the baseline, in input order.
///
/// The first entry is always the baseline itself. Scenarios are narrated one
/// at a time; each one independently falls back to the template narrative.
pub async fn run_scenarios(
    narrator: &TieredNarrator,
    baseline: &Baseline,
    scenarios: &[ScenarioInput],
) -> Vec<ScenarioResult> {
    info!("Evaluating {} scenario(s) against baseline", scenarios.len());

    let scored_baseline = score_baseline(baseline);
    let mut results = Vec::with_capacity(scenarios.len() + 1);
    results.push(ScenarioResult {
        scenario: scored_baseline.clone(),
        narrative: BASELINE_NARRATIVE.to_string(),
        narrative_source: NarrativeSource::Baseline,
    });

    for input in scenarios {
        let scored = score_scenario(input, baseline);
        let (narrative, narrative_source) = narrator.narrate(&scored, &scored_baseline).await;
        results.push(ScenarioResult {
            scenario: scored,
            narrative,
            narrative_source,
        });
    }

    results
}
