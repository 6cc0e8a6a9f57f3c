use crate::models::{Baseline, Metrics, ScenarioInput, ScenarioValue, ScoredScenario};

/// Resolves a scenario override against its baseline figure.
pub fn normalize_value(value: Option<&ScenarioValue>, base: f64) -> f64 {
    match value {
        None => base,
        Some(ScenarioValue::Absolute(v)) => *v,
        Some(ScenarioValue::RelativeDelta(pct)) => base * (1.0 + pct / 100.0),
    }
}

pub fn compute_metrics(revenue: f64, cost: f64, growth: f64) -> Metrics {
    let profit = revenue - cost;
    let margin = if revenue != 0.0 { profit / revenue } else { 0.0 };
    Metrics {
        profit,
        margin,
        revenue_next: revenue * (1.0 + growth / 100.0),
    }
}

pub fn score_baseline(baseline: &Baseline) -> ScoredScenario {
    ScoredScenario {
        name: "Baseline".to_string(),
        revenue: baseline.revenue,
        cost: baseline.cost,
        growth: baseline.growth,
        metrics: compute_metrics(baseline.revenue, baseline.cost, baseline.growth),
    }
}

pub fn score_scenario(input: &ScenarioInput, baseline: &Baseline) -> ScoredScenario {
    let revenue = normalize_value(input.revenue.as_ref(), baseline.revenue);
    let cost = normalize_value(input.cost.as_ref(), baseline.cost);
    let growth = normalize_value(input.growth.as_ref(), baseline.growth);

    ScoredScenario {
        name: input.name.clone(),
        revenue,
        cost,
        growth,
        metrics: compute_metrics(revenue, cost, growth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_percentage_delta_applies_to_base() {
        for base in [1.0, 250.0, 1000.0, 98765.4] {
            for pct in [-50.0, -5.0, 0.0, 10.0, 37.5] {
                let value = ScenarioValue::parse(&format!("{:+}%", pct)).unwrap();
                let got = normalize_value(Some(&value), base);
                assert!((got - base * (1.0 + pct / 100.0)).abs() < EPS, "base {} pct {}", base, pct);
            }
        }
    }

    #[test]
    fn test_absent_and_malformed_fall_back_to_base() {
        assert_eq!(normalize_value(None, 1000.0), 1000.0);
        for raw in ["abc", "12x%", "", "--5%"] {
            let value = ScenarioValue::parse(raw);
            assert_eq!(normalize_value(value.as_ref(), 1000.0), 1000.0, "input {:?}", raw);
        }
    }

    #[test]
    fn test_absolute_value_is_returned_as_is() {
        assert_eq!(normalize_value(Some(&ScenarioValue::Absolute(42.0)), 1000.0), 42.0);
    }

    #[test]
    fn test_zero_revenue_margin_is_zero() {
        for growth in [-10.0, 0.0, 5.0] {
            let metrics = compute_metrics(0.0, 0.0, growth);
            assert_eq!(metrics.margin, 0.0);
            assert_eq!(metrics.profit, 0.0);
        }
        assert_eq!(compute_metrics(0.0, 100.0, 0.0).margin, 0.0);
    }

    #[test]
    fn test_scenario_relative_revenue_end_to_end() {
        let baseline = Baseline { revenue: 1000.0, cost: 800.0, growth: 10.0 };
        let input: ScenarioInput = serde_json::from_str(r#"{"revenue": "+10%"}"#).unwrap();

        let scored = score_scenario(&input, &baseline);
        assert!((scored.revenue - 1100.0).abs() < EPS);
        assert_eq!(scored.cost, 800.0);
        assert_eq!(scored.growth, 10.0);
        assert!((scored.metrics.profit - 300.0).abs() < EPS);
        assert!((scored.metrics.margin - 300.0 / 1100.0).abs() < EPS);
        assert!((scored.metrics.revenue_next - 1210.0).abs() < 1e-6);
    }

    #[test]
    fn test_baseline_scoring() {
        let scored = score_baseline(&Baseline { revenue: 1000.0, cost: 800.0, growth: 10.0 });
        assert_eq!(scored.name, "Baseline");
        assert!((scored.metrics.margin - 0.2).abs() < EPS);
        assert!((scored.metrics.revenue_next - 1100.0).abs() < 1e-6);
    }
}
