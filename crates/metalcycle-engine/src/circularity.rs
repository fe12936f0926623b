// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Circularity scorer: four normalized sub-indicators combined into a
//! weighted composite on the 0-100 scale.

use crate::config::EngineConfig;
use metalcycle_metrics::{AssessmentInput, CircularityScore, IndicatorBreakdown};

/// Saturating resource-efficiency curve of plant capacity.
///
/// `100 * c / (c + h)`: monotonically increasing, asymptote 100,
/// reaching 75 at three times the half-saturation capacity.
fn resource_efficiency(capacity_tonnes: f64, half_saturation: f64) -> f64 {
    if capacity_tonnes <= 0.0 {
        return 0.0;
    }
    100.0 * capacity_tonnes / (capacity_tonnes + half_saturation.max(0.0))
}

/// Score one scenario's circularity.
///
/// Pure arithmetic over the input and configuration; callers validate
/// weights before scoring.
pub fn score_circularity(
    input: &AssessmentInput,
    config: &EngineConfig,
) -> (CircularityScore, IndicatorBreakdown) {
    let params = &config.circularity;

    let indicators = IndicatorBreakdown {
        recycled_content: input.recycled_percent.clamp(0.0, 100.0),
        end_of_life_recovery: input.end_of_life_recovery_percent.clamp(0.0, 100.0),
        resource_efficiency: resource_efficiency(
            input.plant_capacity_tonnes_per_year,
            params.half_saturation_tonnes,
        ),
        design_for_circularity: params.recyclability.score_for(input.metal).clamp(0.0, 100.0),
    };

    let weights = &config.weights;
    let composite = (weights.recycled_content * indicators.recycled_content
        + weights.end_of_life_recovery * indicators.end_of_life_recovery
        + weights.resource_efficiency * indicators.resource_efficiency
        + weights.design_for_circularity * indicators.design_for_circularity)
        / 100.0;

    (CircularityScore::new(composite), indicators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metalcycle_metrics::{EnergySource, Metal};

    fn baseline_input() -> AssessmentInput {
        AssessmentInput {
            name: "Baseline".to_string(),
            metal: Metal::Aluminium,
            primary_percent: 70.0,
            recycled_percent: 30.0,
            energy_source: EnergySource::Grid,
            transport_distance_km: 500.0,
            end_of_life_recovery_percent: 60.0,
            plant_capacity_tonnes_per_year: 100_000.0,
        }
    }

    #[test]
    fn test_baseline_indicators_and_composite() {
        let config = EngineConfig::default();
        let (score, indicators) = score_circularity(&baseline_input(), &config);

        assert_eq!(indicators.recycled_content, 30.0);
        assert_eq!(indicators.end_of_life_recovery, 60.0);
        assert!((indicators.resource_efficiency - 75.0).abs() < 0.01);
        assert_eq!(indicators.design_for_circularity, 90.0);

        // 0.35*30 + 0.30*60 + 0.20*75 + 0.15*90 = 57.0
        assert!((score.0 - 57.0).abs() < 0.01);
    }

    #[test]
    fn test_more_recycled_content_scores_strictly_higher() {
        let config = EngineConfig::default();
        let low = baseline_input();

        let mut high = baseline_input();
        high.primary_percent = 40.0;
        high.recycled_percent = 60.0;

        let (low_score, _) = score_circularity(&low, &config);
        let (high_score, _) = score_circularity(&high, &config);
        assert!(high_score.0 > low_score.0);
    }

    #[test]
    fn test_resource_efficiency_curve_saturates() {
        let h = 33_333.0;
        assert_eq!(resource_efficiency(0.0, h), 0.0);
        let small = resource_efficiency(10_000.0, h);
        let large = resource_efficiency(1_000_000.0, h);
        assert!(small < large);
        assert!(large < 100.0);
        assert!((resource_efficiency(100_000.0, h) - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_perfect_scenario_caps_at_100() {
        let config = EngineConfig::default();
        let mut input = baseline_input();
        input.primary_percent = 0.0;
        input.recycled_percent = 100.0;
        input.end_of_life_recovery_percent = 100.0;
        input.plant_capacity_tonnes_per_year = 1e12;

        let (score, _) = score_circularity(&input, &config);
        assert!(score.0 <= 100.0);
        // aluminium design class 90 keeps this just below perfect
        assert!(score.0 > 95.0);
    }

    #[test]
    fn test_weight_shift_moves_score() {
        let mut config = EngineConfig::default();
        config.weights.recycled_content = 5.0;
        config.weights.end_of_life_recovery = 60.0;
        // still sums to 100 with the remaining defaults
        assert!(config.weights.validate().is_ok());

        let (score, _) = score_circularity(&baseline_input(), &config);
        // 0.05*30 + 0.60*60 + 0.20*75 + 0.15*90 = 66.0
        assert!((score.0 - 66.0).abs() < 0.01);
    }
}
