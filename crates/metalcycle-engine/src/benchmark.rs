// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Benchmark comparison: a result measured against per-metal industry
//! reference values, reusing the comparator's sign convention.

use crate::compare::{signed_delta, BaselineFailure};
use crate::{EngineError, Result};
use metalcycle_metrics::{AssessmentResult, ComparisonMetric, Metal, ScenarioDelta};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Industry reference values for one metal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReference {
    /// Industry-average CO2, t per tonne of metal
    pub co2_tonnes_per_tonne: f64,
    /// Industry-average energy, kWh per tonne
    pub energy_kwh_per_tonne: f64,
    /// Industry-average water, litres per tonne
    pub water_litres_per_tonne: f64,
    /// Best-practice circularity score
    pub best_practice_circularity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub metal: Metal,
    #[serde(flatten)]
    pub reference: BenchmarkReference,
}

/// Serde-loadable table of per-metal references
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkTable {
    pub rows: Vec<BenchmarkRow>,
}

impl BenchmarkTable {
    pub fn get(&self, metal: Metal) -> Option<&BenchmarkReference> {
        self.rows.iter().find(|r| r.metal == metal).map(|r| &r.reference)
    }
}

/// A result's standing against its metal's references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub metal: Metal,
    /// Positive delta means the result beats the reference
    pub deltas: Vec<ScenarioDelta>,
    pub failures: Vec<BaselineFailure>,
}

/// Benchmark a result against the reference table.
///
/// Each metric uses the reference as baseline A and the result as B;
/// zero references fail per metric the same way zero baselines do.
pub fn benchmark_result(
    result: &AssessmentResult,
    table: &BenchmarkTable,
) -> Result<BenchmarkReport> {
    let reference = table
        .get(result.metal)
        .ok_or(EngineError::UnknownBenchmark { metal: result.metal })?;

    let pairs = [
        (ComparisonMetric::Co2, reference.co2_tonnes_per_tonne, result.co2_tonnes_per_tonne, true),
        (
            ComparisonMetric::Energy,
            reference.energy_kwh_per_tonne,
            result.energy_kwh_per_tonne,
            true,
        ),
        (
            ComparisonMetric::Water,
            reference.water_litres_per_tonne,
            result.water_litres_per_tonne,
            true,
        ),
        (
            ComparisonMetric::Circularity,
            reference.best_practice_circularity,
            result.circularity_score.0,
            false,
        ),
    ];

    let mut deltas = Vec::new();
    let mut failures = Vec::new();

    for (metric, reference_value, value, lower_is_better) in pairs {
        match signed_delta(metric, reference_value, value, lower_is_better) {
            Ok(delta) => deltas.push(delta),
            Err(_) => failures.push(BaselineFailure { metric }),
        }
    }

    Ok(BenchmarkReport {
        metal: result.metal,
        deltas,
        failures,
    })
}

/// Load a benchmark table from a YAML or TOML file
pub fn load_benchmark_table(path: &Path) -> Result<BenchmarkTable> {
    let content = std::fs::read_to_string(path)?;

    let table: BenchmarkTable = if path.extension().map(|e| e == "toml").unwrap_or(false) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    debug!(rows = table.rows.len(), "loaded benchmark table from {}", path.display());
    Ok(table)
}

/// Write the starter benchmark table, creating parent directories
pub fn write_starter_benchmarks(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let table = starter_benchmarks();
    let content = if path.extension().map(|e| e == "toml").unwrap_or(false) {
        toml::to_string_pretty(&table)?
    } else {
        serde_yaml::to_string(&table)?
    };

    std::fs::write(path, content)?;
    Ok(())
}

/// Industry-average references per metal.
pub fn starter_benchmarks() -> BenchmarkTable {
    let rows = [
        (Metal::Aluminium, 4.9, 14_200.0, 9_200.0),
        (Metal::Copper, 4.0, 10_500.0, 8_000.0),
        (Metal::Steel, 2.8, 6_200.0, 3_500.0),
        (Metal::Lithium, 11.0, 24_000.0, 18_000.0),
        (Metal::Other, 5.0, 9_000.0, 6_000.0),
    ]
    .into_iter()
    .map(|(metal, co2, energy, water)| BenchmarkRow {
        metal,
        reference: BenchmarkReference {
            co2_tonnes_per_tonne: co2,
            energy_kwh_per_tonne: energy,
            water_litres_per_tonne: water,
            best_practice_circularity: 95.0,
        },
    })
    .collect();

    BenchmarkTable { rows }
}
