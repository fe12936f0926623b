// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Configuration handling for the assessment engine.
//!
//! Scoring weights, circularity parameters, and recommendation tunables
//! are data, not engine constants. Weight validation happens at load
//! time; an invalid weight set blocks startup rather than being
//! silently renormalized.

use crate::{EngineError, Result};
use metalcycle_metrics::{Feasibility, Metal};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Circularity scoring weights
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Circularity sub-indicator parameters
    #[serde(default)]
    pub circularity: CircularityParams,

    /// Recommendation engine tunables
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

/// Weights for the four circularity sub-indicators, percent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_recycled_content_weight")]
    pub recycled_content: f64,

    #[serde(default = "default_end_of_life_weight")]
    pub end_of_life_recovery: f64,

    #[serde(default = "default_resource_efficiency_weight")]
    pub resource_efficiency: f64,

    #[serde(default = "default_design_weight")]
    pub design_for_circularity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            recycled_content: default_recycled_content_weight(),
            end_of_life_recovery: default_end_of_life_weight(),
            resource_efficiency: default_resource_efficiency_weight(),
            design_for_circularity: default_design_weight(),
        }
    }
}

fn default_recycled_content_weight() -> f64 {
    35.0
}

fn default_end_of_life_weight() -> f64 {
    30.0
}

fn default_resource_efficiency_weight() -> f64 {
    20.0
}

fn default_design_weight() -> f64 {
    15.0
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.recycled_content
            + self.end_of_life_recovery
            + self.resource_efficiency
            + self.design_for_circularity
    }

    /// Weights must sum to 100; anything else is a configuration error
    pub fn validate(&self) -> Result<()> {
        let sum = self.sum();
        if (sum - 100.0).abs() > 0.01 {
            return Err(EngineError::InvalidWeightConfiguration { sum });
        }
        Ok(())
    }
}

/// Parameters behind the circularity sub-indicators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularityParams {
    /// Capacity at which resource efficiency reaches 50 of 100
    #[serde(default = "default_half_saturation")]
    pub half_saturation_tonnes: f64,

    /// Per-metal design-for-circularity scores
    #[serde(default)]
    pub recyclability: RecyclabilityClasses,
}

impl Default for CircularityParams {
    fn default() -> Self {
        Self {
            half_saturation_tonnes: default_half_saturation(),
            recyclability: RecyclabilityClasses::default(),
        }
    }
}

fn default_half_saturation() -> f64 {
    // one third of the 100 kt/yr reference plant
    33_333.0
}

/// Design-for-circularity class per metal, 0-100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecyclabilityClasses {
    #[serde(default = "default_aluminium_class")]
    pub aluminium: f64,
    #[serde(default = "default_copper_class")]
    pub copper: f64,
    #[serde(default = "default_steel_class")]
    pub steel: f64,
    #[serde(default = "default_lithium_class")]
    pub lithium: f64,
    #[serde(default = "default_other_class")]
    pub other: f64,
}

impl Default for RecyclabilityClasses {
    fn default() -> Self {
        Self {
            aluminium: default_aluminium_class(),
            copper: default_copper_class(),
            steel: default_steel_class(),
            lithium: default_lithium_class(),
            other: default_other_class(),
        }
    }
}

fn default_aluminium_class() -> f64 {
    90.0
}

fn default_copper_class() -> f64 {
    85.0
}

fn default_steel_class() -> f64 {
    80.0
}

fn default_lithium_class() -> f64 {
    40.0
}

fn default_other_class() -> f64 {
    50.0
}

impl RecyclabilityClasses {
    pub fn score_for(&self, metal: Metal) -> f64 {
        match metal {
            Metal::Aluminium => self.aluminium,
            Metal::Copper => self.copper,
            Metal::Steel => self.steel,
            Metal::Lithium => self.lithium,
            Metal::Other => self.other,
        }
    }
}

/// Tunables for the recommendation archetypes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Recycled-content increase proposed, percent points
    #[serde(default = "default_recycled_step")]
    pub recycled_step_pct: f64,

    /// Secondary-route CO2 intensity relative to primary
    #[serde(default = "default_recycled_intensity_ratio")]
    pub recycled_intensity_ratio: f64,

    /// Cost change per percent point of recycled content, signed
    #[serde(default = "default_recycled_cost_per_point")]
    pub recycled_cost_per_point_pct: f64,

    /// Cost premium of a full switch to renewable energy
    #[serde(default = "default_renewable_premium")]
    pub renewable_premium_pct: f64,

    /// Fraction of transport distance proposed for elimination
    #[serde(default = "default_transport_cut_fraction")]
    pub transport_cut_fraction: f64,

    /// Cost change per percent point of distance cut, signed
    #[serde(default = "default_transport_cost_per_point")]
    pub transport_cost_per_point_pct: f64,

    /// End-of-life recovery increase proposed, percent points
    #[serde(default = "default_eol_step")]
    pub eol_step_pct: f64,

    /// Recovery rates above this are considered impractical
    #[serde(default = "default_eol_max")]
    pub eol_max_percent: f64,

    /// Cost change per percent point of recovery gained, signed
    #[serde(default = "default_eol_cost_per_point")]
    pub eol_cost_per_point_pct: f64,

    #[serde(default)]
    pub thresholds: FeasibilityThresholds,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            recycled_step_pct: default_recycled_step(),
            recycled_intensity_ratio: default_recycled_intensity_ratio(),
            recycled_cost_per_point_pct: default_recycled_cost_per_point(),
            renewable_premium_pct: default_renewable_premium(),
            transport_cut_fraction: default_transport_cut_fraction(),
            transport_cost_per_point_pct: default_transport_cost_per_point(),
            eol_step_pct: default_eol_step(),
            eol_max_percent: default_eol_max(),
            eol_cost_per_point_pct: default_eol_cost_per_point(),
            thresholds: FeasibilityThresholds::default(),
        }
    }
}

fn default_recycled_step() -> f64 {
    20.0
}

fn default_recycled_intensity_ratio() -> f64 {
    0.15
}

fn default_recycled_cost_per_point() -> f64 {
    -0.26
}

fn default_renewable_premium() -> f64 {
    12.5
}

fn default_transport_cut_fraction() -> f64 {
    0.30
}

fn default_transport_cost_per_point() -> f64 {
    -0.07
}

fn default_eol_step() -> f64 {
    15.0
}

fn default_eol_max() -> f64 {
    95.0
}

fn default_eol_cost_per_point() -> f64 {
    0.1
}

/// Input-change magnitude bounds for each feasibility class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityThresholds {
    #[serde(default = "default_high_max")]
    pub high_max_change_pct: f64,

    #[serde(default = "default_medium_max")]
    pub medium_max_change_pct: f64,
}

impl Default for FeasibilityThresholds {
    fn default() -> Self {
        Self {
            high_max_change_pct: default_high_max(),
            medium_max_change_pct: default_medium_max(),
        }
    }
}

fn default_high_max() -> f64 {
    35.0
}

fn default_medium_max() -> f64 {
    90.0
}

impl FeasibilityThresholds {
    /// Map an input-change magnitude to a feasibility class.
    ///
    /// Single descending comparison chain, so a larger change can never
    /// land in a higher class.
    pub fn classify(&self, change_magnitude_pct: f64) -> Feasibility {
        if change_magnitude_pct <= self.high_max_change_pct {
            Feasibility::High
        } else if change_magnitude_pct <= self.medium_max_change_pct {
            Feasibility::Medium
        } else {
            Feasibility::Low
        }
    }
}

/// Load configuration from a path, falling back to defaults when the
/// file is absent. Invalid weights fail the load.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: EngineConfig = if path.extension().map(|e| e == "toml").unwrap_or(false) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    config.weights.validate()?;

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Get the default config path for a working directory
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".metalcycle/config.yml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = EngineConfig::default();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if path.extension().map(|e| e == "toml").unwrap_or(false) {
        toml::to_string_pretty(&config)?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}
