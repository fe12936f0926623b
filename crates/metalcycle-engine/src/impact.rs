// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Impact calculator: resolves emission factors for a scenario and sums
//! per-stage footprints into per-tonne totals and stage shares.

use crate::factors::FactorLookup;
use crate::{EngineError, Result};
use metalcycle_metrics::{
    AssessmentInput, EmissionFactor, EnergySource, ImpactProfile, LifecycleStage, Metal,
    ProcessStage, StageImpact,
};
use tracing::debug;

/// Per-stage footprints for a unit batch of one tonne, plus totals
#[derive(Debug, Clone)]
pub struct ImpactBreakdown {
    /// One entry per reporting stage, canonical order
    pub stages: Vec<(LifecycleStage, ImpactProfile)>,
    pub totals: ImpactProfile,
}

impl ImpactBreakdown {
    /// Footprint of one reporting stage
    pub fn stage(&self, stage: LifecycleStage) -> Option<&ImpactProfile> {
        self.stages.iter().find(|(s, _)| *s == stage).map(|(_, p)| p)
    }

    /// CO2 of one reporting stage, zero when absent
    pub fn stage_co2(&self, stage: LifecycleStage) -> f64 {
        self.stage(stage).map(|p| p.co2.0).unwrap_or(0.0)
    }
}

fn resolve<'a>(
    factors: &'a dyn FactorLookup,
    metal: Metal,
    stage: ProcessStage,
    energy_source: EnergySource,
) -> Result<&'a EmissionFactor> {
    factors
        .get(metal, stage, energy_source)
        .ok_or(EngineError::UnknownFactor {
            metal,
            stage,
            energy_source,
        })
}

/// Compute per-stage and total footprints for one tonne of output.
///
/// The smelting stage blends the primary and secondary routes by
/// feedstock share; transport scales a per-tonne-km factor by distance.
/// Any missing factor fails the whole computation.
pub fn compute_impact(
    input: &AssessmentInput,
    factors: &dyn FactorLookup,
) -> Result<ImpactBreakdown> {
    let metal = input.metal;
    let source = input.energy_source;

    let primary = resolve(factors, metal, ProcessStage::PrimarySmelting, source)?;
    let secondary = resolve(factors, metal, ProcessStage::SecondarySmelting, source)?;
    let transport = resolve(factors, metal, ProcessStage::Transport, source)?;
    let processing = resolve(factors, metal, ProcessStage::Processing, source)?;
    let end_of_life = resolve(factors, metal, ProcessStage::EndOfLife, source)?;

    let smelting = primary.profile() * (input.primary_percent / 100.0)
        + secondary.profile() * (input.recycled_percent / 100.0);
    let transport = transport.profile() * input.transport_distance_km;
    let processing = processing.profile();
    let end_of_life = end_of_life.profile();

    let stages = vec![
        (LifecycleStage::PrimaryProduction, smelting),
        (LifecycleStage::Transport, transport),
        (LifecycleStage::Processing, processing),
        (LifecycleStage::EndOfLife, end_of_life),
    ];

    let totals = stages
        .iter()
        .fold(ImpactProfile::zero(), |acc, (_, p)| acc + *p);

    debug!(
        %metal,
        co2 = totals.co2.0,
        energy = totals.energy.0,
        water = totals.water.0,
        "impact totals"
    );

    Ok(ImpactBreakdown { stages, totals })
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Derive stage impacts with one-decimal shares summing to 100.
///
/// Each share is rounded independently; the rounding remainder is
/// folded into the largest-share stage. A zero CO2 total yields zero
/// shares throughout.
pub fn stage_impacts(breakdown: &ImpactBreakdown) -> Vec<StageImpact> {
    let total = breakdown.totals.co2.0;

    let mut impacts: Vec<StageImpact> = breakdown
        .stages
        .iter()
        .map(|(stage, profile)| {
            let share = if total > 0.0 {
                round1(profile.co2.0 / total * 100.0)
            } else {
                0.0
            };
            StageImpact {
                stage: *stage,
                co2_tonnes: profile.co2.0,
                share_pct: share,
            }
        })
        .collect();

    if total > 0.0 {
        let sum: f64 = impacts.iter().map(|i| i.share_pct).sum();
        let remainder = 100.0 - sum;
        if remainder.abs() > 1e-9 {
            // first maximal share wins ties, keeping canonical order
            let mut largest = 0;
            for (idx, impact) in impacts.iter().enumerate() {
                if impact.share_pct > impacts[largest].share_pct {
                    largest = idx;
                }
            }
            impacts[largest].share_pct = round1(impacts[largest].share_pct + remainder);
        }
    }

    impacts
}
