// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! End-to-end tests for the metalcycle assessment engine

use metalcycle_engine::config::EngineConfig;
use metalcycle_engine::factors::{starter_table, FactorTable};
use metalcycle_engine::{
    benchmark_result, compare_scenarios, compute_assessment, load_config, BenchmarkTable,
    EngineError, MetricDirections,
};
use metalcycle_metrics::{
    AssessmentInput, AssessmentResult, ComparisonMetric, EnergySource, Feasibility,
    LifecycleStage, Metal,
};

/// The canonical aluminium smelter scenario used across the suite
fn baseline_input() -> AssessmentInput {
    AssessmentInput {
        name: "Baseline smelter".to_string(),
        metal: Metal::Aluminium,
        primary_percent: 70.0,
        recycled_percent: 30.0,
        energy_source: EnergySource::Grid,
        transport_distance_km: 500.0,
        end_of_life_recovery_percent: 60.0,
        plant_capacity_tonnes_per_year: 100_000.0,
    }
}

fn assess(input: &AssessmentInput) -> AssessmentResult {
    let table = starter_table();
    let config = EngineConfig::default();
    compute_assessment(input, &table, &config).expect("assessment should succeed")
}

// ============================================================================
// Impact calculator
// ============================================================================
mod impact_calculator {
    use super::*;

    #[test]
    fn test_baseline_per_tonne_totals() {
        let result = assess(&baseline_input());

        assert!(
            (result.co2_tonnes_per_tonne - 4.201).abs() < 1e-9,
            "blended smelting + transport + processing + end-of-life"
        );
        assert!((result.energy_kwh_per_tonne - 12_500.0).abs() < 1e-6);
        assert!((result.water_litres_per_tonne - 8_500.0).abs() < 1e-6);
    }

    #[test]
    fn test_shares_sum_to_100_within_tolerance() {
        let result = assess(&baseline_input());
        let sum: f64 = result.hotspots.iter().map(|h| h.share_pct).sum();
        assert!((sum - 100.0).abs() <= 0.5, "share sum was {sum}");
    }

    #[test]
    fn test_recycled_share_lowers_smelting_co2() {
        let mut greener = baseline_input();
        greener.primary_percent = 40.0;
        greener.recycled_percent = 60.0;

        let base = assess(&baseline_input());
        let improved = assess(&greener);
        assert!(improved.co2_tonnes_per_tonne < base.co2_tonnes_per_tonne);
    }

    #[test]
    fn test_missing_factor_aborts_without_partial_result() {
        let empty = FactorTable::default();
        let config = EngineConfig::default();
        let err = compute_assessment(&baseline_input(), &empty, &config).unwrap_err();
        assert!(matches!(err, EngineError::UnknownFactor { .. }));
    }

    #[test]
    fn test_deterministic_outputs_across_runs() {
        let first = assess(&baseline_input());
        let second = assess(&baseline_input());

        assert_eq!(first.co2_tonnes_per_tonne, second.co2_tonnes_per_tonne);
        assert_eq!(first.circularity_score.0, second.circularity_score.0);
        assert_eq!(first.hotspots.len(), second.hotspots.len());
        for (a, b) in first.hotspots.iter().zip(&second.hotspots) {
            assert_eq!(a.share_pct, b.share_pct);
        }
        // identity differs run to run
        assert_ne!(first.id, second.id);
    }
}

// ============================================================================
// Hotspot ranker
// ============================================================================
mod hotspot_ranker {
    use super::*;

    #[test]
    fn test_baseline_hotspot_order_and_shares() {
        let result = assess(&baseline_input());

        let stages: Vec<LifecycleStage> = result.hotspots.iter().map(|h| h.stage).collect();
        assert_eq!(
            stages,
            vec![
                LifecycleStage::PrimaryProduction,
                LifecycleStage::Transport,
                LifecycleStage::Processing,
                LifecycleStage::EndOfLife,
            ]
        );

        let shares: Vec<f64> = result.hotspots.iter().map(|h| h.share_pct).collect();
        assert_eq!(shares, vec![65.0, 20.0, 10.0, 5.0]);
    }

    #[test]
    fn test_hotspots_always_descending() {
        let mut long_haul = baseline_input();
        long_haul.transport_distance_km = 5_000.0;

        let result = assess(&long_haul);
        for pair in result.hotspots.windows(2) {
            assert!(pair[0].share_pct >= pair[1].share_pct);
        }
    }
}

// ============================================================================
// Circularity scorer
// ============================================================================
mod circularity_scorer {
    use super::*;

    #[test]
    fn test_baseline_composite_and_breakdown() {
        let result = assess(&baseline_input());
        let b = &result.circularity_breakdown;

        assert_eq!(b.recycled_content, 30.0);
        assert_eq!(b.end_of_life_recovery, 60.0);
        assert!((b.resource_efficiency - 75.0).abs() < 0.01);
        assert_eq!(b.design_for_circularity, 90.0);

        // 0.35*30 + 0.30*60 + 0.20*75 + 0.15*90
        assert!((result.circularity_score.0 - 57.0).abs() < 0.01);
    }

    #[test]
    fn test_doubling_recycled_content_strictly_raises_score() {
        let mut greener = baseline_input();
        greener.primary_percent = 40.0;
        greener.recycled_percent = 60.0;

        let base = assess(&baseline_input());
        let improved = assess(&greener);
        assert!(improved.circularity_score.0 > base.circularity_score.0);
    }

    #[test]
    fn test_score_stays_within_bounds() {
        let mut input = baseline_input();
        input.primary_percent = 0.0;
        input.recycled_percent = 100.0;
        input.end_of_life_recovery_percent = 100.0;
        input.plant_capacity_tonnes_per_year = 1e12;

        let result = assess(&input);
        assert!(result.circularity_score.0 <= 100.0);
        assert!(result.circularity_score.0 >= 0.0);
    }

    #[test]
    fn test_invalid_weights_block_the_whole_run() {
        let mut config = EngineConfig::default();
        config.weights.recycled_content = 60.0;

        let table = starter_table();
        let err = compute_assessment(&baseline_input(), &table, &config).unwrap_err();
        match err {
            EngineError::InvalidWeightConfiguration { sum } => {
                assert!((sum - 125.0).abs() < 1e-9)
            }
            other => panic!("expected weight error, got {other}"),
        }
    }
}

// ============================================================================
// Recommendation engine
// ============================================================================
mod recommendation_engine {
    use super::*;

    #[test]
    fn test_baseline_recommendations_ranked_by_reduction() {
        let result = assess(&baseline_input());
        let recs = &result.recommendations;

        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].title, "Switch energy source to renewable");
        assert_eq!(recs[0].feasibility, Feasibility::Medium);
        assert_eq!(recs[1].title, "Increase recycled content");
        assert_eq!(recs[1].feasibility, Feasibility::High);

        let ranks: Vec<u32> = recs.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        for pair in recs.windows(2) {
            assert!(
                pair[0].estimated_co2_reduction_tonnes >= pair[1].estimated_co2_reduction_tonnes
            );
        }
    }

    #[test]
    fn test_renewable_scenario_drops_energy_archetype() {
        let mut input = baseline_input();
        input.energy_source = EnergySource::Renewable;

        let result = assess(&input);
        assert!(result
            .recommendations
            .iter()
            .all(|r| r.title != "Switch energy source to renewable"));
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn test_near_perfect_scenario_yields_few_candidates() {
        let mut input = baseline_input();
        input.primary_percent = 0.0;
        input.recycled_percent = 100.0;
        input.energy_source = EnergySource::Renewable;
        input.transport_distance_km = 0.0;
        input.end_of_life_recovery_percent = 95.0;

        let result = assess(&input);
        assert!(result.recommendations.is_empty());
    }
}

// ============================================================================
// Scenario comparator
// ============================================================================
mod scenario_comparator {
    use super::*;

    #[test]
    fn test_greener_scenario_improves_co2_and_circularity() {
        let mut greener = baseline_input();
        greener.name = "Greener smelter".to_string();
        greener.primary_percent = 40.0;
        greener.recycled_percent = 60.0;
        greener.energy_source = EnergySource::Renewable;

        let a = assess(&baseline_input());
        let b = assess(&greener);
        let comparison = compare_scenarios(&a, &b, &MetricDirections::default());

        assert!(comparison.is_complete());
        let co2 = comparison.delta_for(ComparisonMetric::Co2).unwrap();
        assert!(co2.improvement, "lower CO2 must read as an improvement");
        assert!(co2.delta_pct > 0.0);

        let circularity = comparison.delta_for(ComparisonMetric::Circularity).unwrap();
        assert!(circularity.improvement);
    }

    #[test]
    fn test_identical_results_compare_flat() {
        let a = assess(&baseline_input());
        let comparison = compare_scenarios(&a, &a, &MetricDirections::default());

        for delta in &comparison.deltas {
            assert_eq!(delta.delta_pct, 0.0);
            assert!(!delta.improvement, "no change is not an improvement");
        }
    }

    #[test]
    fn test_custom_direction_table_is_honored() {
        let mut greener = baseline_input();
        greener.energy_source = EnergySource::Renewable;

        let a = assess(&baseline_input());
        let b = assess(&greener);

        let mut directions = MetricDirections::default();
        directions.co2_lower_is_better = false;

        let comparison = compare_scenarios(&a, &b, &directions);
        let co2 = comparison.delta_for(ComparisonMetric::Co2).unwrap();
        // with the direction inverted, the CO2 drop stops counting as a win
        assert!(!co2.improvement);
    }
}

// ============================================================================
// Benchmark comparison
// ============================================================================
mod benchmark_comparison {
    use super::*;

    #[test]
    fn test_baseline_beats_industry_average_co2() {
        let result = assess(&baseline_input());
        let table = metalcycle_engine::benchmark::starter_benchmarks();
        let report = benchmark_result(&result, &table).unwrap();

        let co2 = report
            .deltas
            .iter()
            .find(|d| d.metric == ComparisonMetric::Co2)
            .unwrap();
        // 4.201 vs the 4.9 industry average
        assert!(co2.improvement);

        let circularity = report
            .deltas
            .iter()
            .find(|d| d.metric == ComparisonMetric::Circularity)
            .unwrap();
        // 57.0 vs best-practice 95
        assert!(!circularity.improvement);
    }

    #[test]
    fn test_empty_benchmark_table_is_an_error() {
        let result = assess(&baseline_input());
        let err = benchmark_result(&result, &BenchmarkTable::default()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownBenchmark { metal: Metal::Aluminium }));
    }
}

// ============================================================================
// Configuration loading
// ============================================================================
mod configuration {
    use super::*;
    use std::fs;

    #[test]
    fn test_config_file_overrides_flow_into_scoring() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "weights:\n  recycled_content: 50.0\n  end_of_life_recovery: 30.0\n\
             \x20 resource_efficiency: 10.0\n  design_for_circularity: 10.0\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let table = starter_table();
        let result = compute_assessment(&baseline_input(), &table, &config).unwrap();

        // 0.50*30 + 0.30*60 + 0.10*75 + 0.10*90 = 49.5
        assert!((result.circularity_score.0 - 49.5).abs() < 0.01);
    }

    #[test]
    fn test_bad_weight_file_blocks_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "weights:\n  recycled_content: 10.0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWeightConfiguration { .. }));
    }

    #[test]
    fn test_factor_table_survives_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("factors.yml");
        metalcycle_engine::factors::write_starter_table(&path).unwrap();

        let table = metalcycle_engine::factors::load_factor_table(&path).unwrap();
        let config = EngineConfig::default();
        let result = compute_assessment(&baseline_input(), &table, &config).unwrap();
        assert!((result.co2_tonnes_per_tonne - 4.201).abs() < 1e-9);
    }
}
