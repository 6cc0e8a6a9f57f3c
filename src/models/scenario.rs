use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A scenario override: either a fixed amount or a percentage change
/// relative to the matching baseline field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioValue {
    Absolute(f64),
    /// Signed percent, `+10%` is stored as `10.0`.
    RelativeDelta(f64),
}

impl ScenarioValue {
    /// Parses `"1200"`, `"+10%"`, `"-5 %"`. Anything else yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.ends_with('%') {
            let number = trimmed.trim_end_matches('%').trim();
            parse_finite(number).map(ScenarioValue::RelativeDelta)
        } else {
            parse_finite(trimmed).map(ScenarioValue::Absolute)
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(ScenarioValue::Absolute),
            serde_json::Value::String(s) => ScenarioValue::parse(s),
            _ => None,
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Serialize for ScenarioValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScenarioValue::Absolute(v) => serializer.serialize_f64(*v),
            ScenarioValue::RelativeDelta(p) => serializer.serialize_str(&format!("{:+}%", p)),
        }
    }
}

/// Accepts any JSON value. Unusable values are logged and treated as absent,
/// so they resolve to the baseline during normalization.
fn lenient_value<'de, D>(deserializer: D) -> Result<Option<ScenarioValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    let parsed = ScenarioValue::from_json(&raw);
    if parsed.is_none() {
        warn!("Ignoring unparseable scenario value {}, using baseline", raw);
    }
    Ok(parsed)
}

fn default_scenario_name() -> String {
    "Scenario".to_string()
}

/// Strings pass through, numbers and booleans use their text form, anything
/// else falls back to the default name.
fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => default_scenario_name(),
        other => {
            warn!("Ignoring unusable scenario name {}, using default", other);
            default_scenario_name()
        }
    })
}

/// User-proposed variation on the baseline. Missing fields inherit the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    #[serde(default = "default_scenario_name", deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_value")]
    pub revenue: Option<ScenarioValue>,
    #[serde(default, deserialize_with = "lenient_value")]
    pub cost: Option<ScenarioValue>,
    #[serde(default, deserialize_with = "lenient_value")]
    pub growth: Option<ScenarioValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub revenue: f64,
    pub cost: f64,
    /// Percent per period.
    pub growth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub profit: f64,
    /// Fraction, not percent.
    pub margin: f64,
    pub revenue_next: f64,
}

/// A fully resolved scenario with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredScenario {
    pub name: String,
    pub revenue: f64,
    pub cost: f64,
    pub growth: f64,
    #[serde(flatten)]
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Baseline,
    Ai,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    #[serde(flatten)]
    pub scenario: ScoredScenario,
    pub narrative: String,
    pub narrative_source: NarrativeSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateScenariosRequest {
    pub baseline: Baseline,
    #[serde(default)]
    pub scenarios: Vec<ScenarioInput>,
}
