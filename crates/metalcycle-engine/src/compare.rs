// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Scenario comparator: signed percentage deltas between two results,
//! with positive always meaning scenario B improves on scenario A.

use crate::{EngineError, Result};
use metalcycle_metrics::{AssessmentResult, ComparisonMetric, ScenarioDelta};
use serde::{Deserialize, Serialize};

/// Which direction counts as better, per metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDirections {
    pub co2_lower_is_better: bool,
    pub energy_lower_is_better: bool,
    pub water_lower_is_better: bool,
    pub circularity_lower_is_better: bool,
}

impl Default for MetricDirections {
    fn default() -> Self {
        Self {
            co2_lower_is_better: true,
            energy_lower_is_better: true,
            water_lower_is_better: true,
            circularity_lower_is_better: false,
        }
    }
}

impl MetricDirections {
    pub fn lower_is_better(&self, metric: ComparisonMetric) -> bool {
        match metric {
            ComparisonMetric::Co2 => self.co2_lower_is_better,
            ComparisonMetric::Energy => self.energy_lower_is_better,
            ComparisonMetric::Water => self.water_lower_is_better,
            ComparisonMetric::Circularity => self.circularity_lower_is_better,
        }
    }
}

/// One metric whose baseline made the delta undefined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineFailure {
    pub metric: ComparisonMetric,
}

/// Deltas for every computable metric plus flagged failures.
///
/// A zero baseline fails only its own metric; the rest of the batch
/// still computes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub deltas: Vec<ScenarioDelta>,
    pub failures: Vec<BaselineFailure>,
}

impl ScenarioComparison {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn delta_for(&self, metric: ComparisonMetric) -> Option<&ScenarioDelta> {
        self.deltas.iter().find(|d| d.metric == metric)
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Signed delta for one metric pair.
///
/// `raw = (B - A) / A * 100`; lower-is-better metrics report `-raw`,
/// so a positive signed delta always reads as an improvement.
pub fn signed_delta(
    metric: ComparisonMetric,
    value_a: f64,
    value_b: f64,
    lower_is_better: bool,
) -> Result<ScenarioDelta> {
    if value_a == 0.0 {
        return Err(EngineError::DivisionByZeroBaseline { metric });
    }

    let raw = (value_b - value_a) / value_a * 100.0;
    let signed = if lower_is_better { -raw } else { raw };

    Ok(ScenarioDelta {
        metric,
        value_a,
        value_b,
        delta_pct: round1(signed),
        improvement: signed > 0.0,
    })
}

fn metric_value(result: &AssessmentResult, metric: ComparisonMetric) -> f64 {
    match metric {
        ComparisonMetric::Co2 => result.co2_tonnes_per_tonne,
        ComparisonMetric::Energy => result.energy_kwh_per_tonne,
        ComparisonMetric::Water => result.water_litres_per_tonne,
        ComparisonMetric::Circularity => result.circularity_score.0,
    }
}

/// Compare scenario B against baseline A across all metrics.
pub fn compare_scenarios(
    a: &AssessmentResult,
    b: &AssessmentResult,
    directions: &MetricDirections,
) -> ScenarioComparison {
    let mut deltas = Vec::new();
    let mut failures = Vec::new();

    for metric in ComparisonMetric::ALL {
        let value_a = metric_value(a, metric);
        let value_b = metric_value(b, metric);

        match signed_delta(metric, value_a, value_b, directions.lower_is_better(metric)) {
            Ok(delta) => deltas.push(delta),
            Err(_) => failures.push(BaselineFailure { metric }),
        }
    }

    ScenarioComparison { deltas, failures }
}
