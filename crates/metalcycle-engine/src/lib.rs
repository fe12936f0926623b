// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! # Metalcycle Engine
//!
//! Life-cycle impact and circularity computation for metals production.
//! Pure synchronous arithmetic over caller-supplied emission factors;
//! the engine owns no factor data and performs no I/O while computing.

pub mod benchmark;
pub mod circularity;
pub mod compare;
pub mod config;
pub mod factors;
pub mod hotspots;
pub mod impact;
pub mod recommend;

use chrono::Utc;
use metalcycle_metrics::{
    AssessmentInput, AssessmentResult, ComparisonMetric, EnergySource, Metal, ProcessStage,
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub use benchmark::{benchmark_result, BenchmarkReference, BenchmarkReport, BenchmarkTable};
pub use compare::{compare_scenarios, BaselineFailure, MetricDirections, ScenarioComparison};
pub use config::{load_config, write_default_config, EngineConfig, ScoringWeights};
pub use factors::{FactorLookup, FactorTable};

/// Main error type for the assessment engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no emission factor for {metal}/{stage}/{energy_source}")]
    UnknownFactor {
        metal: Metal,
        stage: ProcessStage,
        energy_source: EnergySource,
    },

    #[error("scoring weights must sum to 100 (got {sum})")]
    InvalidWeightConfiguration { sum: f64 },

    #[error("baseline value for {metric} is zero, delta undefined")]
    DivisionByZeroBaseline { metric: ComparisonMetric },

    #[error("no benchmark reference for {metal}")]
    UnknownBenchmark { metal: Metal },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Run a full assessment: stage impacts, hotspot ranking, circularity
/// score, and ranked recommendations.
///
/// Weights are re-checked here even when the caller validated them at
/// load time; invalid weights abort the run rather than renormalize.
pub fn compute_assessment(
    input: &AssessmentInput,
    factors: &dyn FactorLookup,
    config: &EngineConfig,
) -> Result<AssessmentResult> {
    config.weights.validate()?;

    let breakdown = impact::compute_impact(input, factors)?;
    let hotspots = hotspots::rank_hotspots(impact::stage_impacts(&breakdown));
    let (score, indicators) = circularity::score_circularity(input, config);
    let recommendations = recommend::recommend(input, &breakdown, config);

    info!(
        assessment = %input.name,
        metal = %input.metal,
        co2 = breakdown.totals.co2.0,
        circularity = score.0,
        "assessment computed"
    );

    Ok(AssessmentResult {
        id: Uuid::new_v4(),
        name: input.name.clone(),
        metal: input.metal,
        computed_at: Utc::now(),
        co2_tonnes_per_tonne: breakdown.totals.co2.0,
        energy_kwh_per_tonne: breakdown.totals.energy.0,
        water_litres_per_tonne: breakdown.totals.water.0,
        hotspots,
        circularity_score: score,
        circularity_breakdown: indicators,
        recommendations,
    })
}
