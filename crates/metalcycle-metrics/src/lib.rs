// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! # Metalcycle Metrics
//!
//! Core data types for metals life-cycle assessment: typed quantities,
//! assessment inputs, emission factors, and derived results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};
use uuid::Uuid;

/// Metal covered by the assessment engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Aluminium,
    Copper,
    Steel,
    Lithium,
    Other,
}

impl Metal {
    pub const ALL: [Metal; 5] = [
        Metal::Aluminium,
        Metal::Copper,
        Metal::Steel,
        Metal::Lithium,
        Metal::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metal::Aluminium => "Aluminium",
            Metal::Copper => "Copper",
            Metal::Steel => "Steel",
            Metal::Lithium => "Lithium",
            Metal::Other => "Other",
        }
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Energy source powering the production route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergySource {
    Grid,
    Renewable,
    Coal,
    NaturalGas,
    Nuclear,
}

impl EnergySource {
    pub const ALL: [EnergySource; 5] = [
        EnergySource::Grid,
        EnergySource::Renewable,
        EnergySource::Coal,
        EnergySource::NaturalGas,
        EnergySource::Nuclear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EnergySource::Grid => "Grid Mix",
            EnergySource::Renewable => "Renewable",
            EnergySource::Coal => "Coal",
            EnergySource::NaturalGas => "Natural Gas",
            EnergySource::Nuclear => "Nuclear",
        }
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reporting stage of the life cycle, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    PrimaryProduction,
    Transport,
    Processing,
    EndOfLife,
}

impl LifecycleStage {
    /// Canonical reporting order; tie-breaks in hotspot ranking follow it
    pub const ALL: [LifecycleStage; 4] = [
        LifecycleStage::PrimaryProduction,
        LifecycleStage::Transport,
        LifecycleStage::Processing,
        LifecycleStage::EndOfLife,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LifecycleStage::PrimaryProduction => "Primary Smelting",
            LifecycleStage::Transport => "Transport",
            LifecycleStage::Processing => "Processing",
            LifecycleStage::EndOfLife => "End-of-Life",
        }
    }

    /// Position in canonical order
    pub fn canonical_index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Process stage keying the emission-factor table
///
/// The smelting stage splits into a primary and a secondary (recycled)
/// route; the reporting layer folds both into `PrimaryProduction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    PrimarySmelting,
    SecondarySmelting,
    Transport,
    Processing,
    EndOfLife,
}

impl ProcessStage {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessStage::PrimarySmelting => "Primary Smelting",
            ProcessStage::SecondarySmelting => "Secondary Smelting",
            ProcessStage::Transport => "Transport",
            ProcessStage::Processing => "Processing",
            ProcessStage::EndOfLife => "End-of-Life",
        }
    }
}

impl fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// CO2-equivalent emissions in tonnes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Co2Tonnes(pub f64);

impl Co2Tonnes {
    pub const ZERO: Self = Co2Tonnes(0.0);

    pub fn tonnes(t: f64) -> Self {
        Co2Tonnes(t)
    }

    pub fn kilograms(kg: f64) -> Self {
        Co2Tonnes(kg / 1000.0)
    }
}

impl Add for Co2Tonnes {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Co2Tonnes(self.0 + rhs.0)
    }
}

impl Mul<f64> for Co2Tonnes {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Co2Tonnes(self.0 * rhs)
    }
}

/// Energy use in kilowatt-hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EnergyKwh(pub f64);

impl EnergyKwh {
    pub const ZERO: Self = EnergyKwh(0.0);

    pub fn kwh(v: f64) -> Self {
        EnergyKwh(v)
    }

    pub fn mwh(v: f64) -> Self {
        EnergyKwh(v * 1000.0)
    }
}

impl Add for EnergyKwh {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        EnergyKwh(self.0 + rhs.0)
    }
}

impl Mul<f64> for EnergyKwh {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        EnergyKwh(self.0 * rhs)
    }
}

/// Water use in litres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct WaterLitres(pub f64);

impl WaterLitres {
    pub const ZERO: Self = WaterLitres(0.0);

    pub fn litres(v: f64) -> Self {
        WaterLitres(v)
    }

    pub fn cubic_metres(v: f64) -> Self {
        WaterLitres(v * 1000.0)
    }
}

impl Add for WaterLitres {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        WaterLitres(self.0 + rhs.0)
    }
}

impl Mul<f64> for WaterLitres {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        WaterLitres(self.0 * rhs)
    }
}

/// Combined environmental footprint per tonne of output
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImpactProfile {
    pub co2: Co2Tonnes,
    pub energy: EnergyKwh,
    pub water: WaterLitres,
}

impl ImpactProfile {
    pub fn zero() -> Self {
        ImpactProfile {
            co2: Co2Tonnes::ZERO,
            energy: EnergyKwh::ZERO,
            water: WaterLitres::ZERO,
        }
    }
}

impl Add for ImpactProfile {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        ImpactProfile {
            co2: self.co2 + rhs.co2,
            energy: self.energy + rhs.energy,
            water: self.water + rhs.water,
        }
    }
}

impl Mul<f64> for ImpactProfile {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        ImpactProfile {
            co2: self.co2 * rhs,
            energy: self.energy * rhs,
            water: self.water * rhs,
        }
    }
}

/// Emission factor for one (metal, process stage, energy source) key
///
/// Smelting, processing, and end-of-life rows are per tonne of metal;
/// transport rows are per tonne-kilometre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub co2_tonnes_per_tonne: f64,
    pub energy_kwh_per_tonne: f64,
    pub water_litres_per_tonne: f64,
    /// Data provenance, e.g. "IAI Global Industry"
    pub source: String,
}

impl EmissionFactor {
    pub fn profile(&self) -> ImpactProfile {
        ImpactProfile {
            co2: Co2Tonnes(self.co2_tonnes_per_tonne),
            energy: EnergyKwh(self.energy_kwh_per_tonne),
            water: WaterLitres(self.water_litres_per_tonne),
        }
    }
}

/// Scenario description driving a single assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentInput {
    /// Display name of the assessment
    pub name: String,
    pub metal: Metal,
    /// Share of primary (virgin) feedstock, percent
    pub primary_percent: f64,
    /// Share of recycled feedstock, percent; must total 100 with primary
    pub recycled_percent: f64,
    pub energy_source: EnergySource,
    pub transport_distance_km: f64,
    pub end_of_life_recovery_percent: f64,
    pub plant_capacity_tonnes_per_year: f64,
}

impl AssessmentInput {
    /// Check field-level invariants, returning every violation found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if (self.primary_percent + self.recycled_percent - 100.0).abs() > 1e-6 {
            issues.push(format!(
                "primary_percent + recycled_percent must equal 100 (got {})",
                self.primary_percent + self.recycled_percent
            ));
        }
        if !(0.0..=100.0).contains(&self.primary_percent) {
            issues.push(format!(
                "primary_percent must be within 0-100 (got {})",
                self.primary_percent
            ));
        }
        if !(0.0..=100.0).contains(&self.recycled_percent) {
            issues.push(format!(
                "recycled_percent must be within 0-100 (got {})",
                self.recycled_percent
            ));
        }
        if self.transport_distance_km < 0.0 {
            issues.push(format!(
                "transport_distance_km must be non-negative (got {})",
                self.transport_distance_km
            ));
        }
        if !(0.0..=100.0).contains(&self.end_of_life_recovery_percent) {
            issues.push(format!(
                "end_of_life_recovery_percent must be within 0-100 (got {})",
                self.end_of_life_recovery_percent
            ));
        }
        if self.plant_capacity_tonnes_per_year <= 0.0 {
            issues.push(format!(
                "plant_capacity_tonnes_per_year must be positive (got {})",
                self.plant_capacity_tonnes_per_year
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Absolute contribution of one reporting stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageImpact {
    pub stage: LifecycleStage,
    pub co2_tonnes: f64,
    /// Share of total CO2, percent, one decimal
    pub share_pct: f64,
}

/// Circularity score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CircularityScore(pub f64);

impl CircularityScore {
    pub fn new(score: f64) -> Self {
        CircularityScore(score.clamp(0.0, 100.0))
    }

    pub fn band(&self) -> CircularityBand {
        CircularityBand::from_score(self.0)
    }
}

/// Qualitative band for a circularity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircularityBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CircularityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            CircularityBand::Excellent
        } else if score >= 60.0 {
            CircularityBand::Good
        } else if score >= 40.0 {
            CircularityBand::Fair
        } else {
            CircularityBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CircularityBand::Excellent => "Excellent",
            CircularityBand::Good => "Good",
            CircularityBand::Fair => "Fair",
            CircularityBand::Poor => "Poor",
        }
    }
}

impl fmt::Display for CircularityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized sub-indicator values behind a circularity score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorBreakdown {
    pub recycled_content: f64,
    pub end_of_life_recovery: f64,
    pub resource_efficiency: f64,
    pub design_for_circularity: f64,
}

/// Feasibility of acting on a recommendation
///
/// Ordered so that `High > Medium > Low`, letting ranking compare
/// feasibility directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feasibility {
    Low,
    Medium,
    High,
}

impl Feasibility {
    pub fn label(&self) -> &'static str {
        match self {
            Feasibility::Low => "Low",
            Feasibility::Medium => "Medium",
            Feasibility::High => "High",
        }
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ranked improvement suggestion attached to a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Dense 1-based rank
    pub rank: u32,
    pub title: String,
    pub description: String,
    pub estimated_co2_reduction_tonnes: f64,
    /// Signed; negative means the change saves money
    pub estimated_cost_change_pct: f64,
    pub feasibility: Feasibility,
}

/// Complete outcome of one assessment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: Uuid,
    pub name: String,
    pub metal: Metal,
    pub computed_at: DateTime<Utc>,
    pub co2_tonnes_per_tonne: f64,
    pub energy_kwh_per_tonne: f64,
    pub water_litres_per_tonne: f64,
    /// Stage contributions, descending by share
    pub hotspots: Vec<StageImpact>,
    pub circularity_score: CircularityScore,
    pub circularity_breakdown: IndicatorBreakdown,
    pub recommendations: Vec<Recommendation>,
}

/// Metric compared between two scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMetric {
    Co2,
    Energy,
    Water,
    Circularity,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 4] = [
        ComparisonMetric::Co2,
        ComparisonMetric::Energy,
        ComparisonMetric::Water,
        ComparisonMetric::Circularity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComparisonMetric::Co2 => "CO2 (t/t)",
            ComparisonMetric::Energy => "Energy (kWh/t)",
            ComparisonMetric::Water => "Water (L/t)",
            ComparisonMetric::Circularity => "Circularity score",
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signed per-metric difference between two scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub metric: ComparisonMetric,
    pub value_a: f64,
    pub value_b: f64,
    /// Signed percent; positive always means B improves on A
    pub delta_pct: f64,
    pub improvement: bool,
}
