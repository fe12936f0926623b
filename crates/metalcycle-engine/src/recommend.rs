// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Recommendation engine: a fixed catalogue of improvement archetypes,
//! each a pure estimate over the scenario and its stage breakdown.

use crate::config::{EngineConfig, RecommendationConfig};
use crate::factors::co2_scale;
use crate::impact::ImpactBreakdown;
use metalcycle_metrics::{
    AssessmentInput, EnergySource, Feasibility, LifecycleStage, Recommendation,
};

/// Unranked candidate produced by one archetype
#[derive(Debug, Clone)]
struct Candidate {
    title: String,
    description: String,
    co2_reduction_tonnes: f64,
    cost_change_pct: f64,
    /// Size of the input change, percent-of-input-changed units
    change_magnitude_pct: f64,
}

fn increase_recycled_content(
    input: &AssessmentInput,
    breakdown: &ImpactBreakdown,
    cfg: &RecommendationConfig,
) -> Option<Candidate> {
    let step = cfg.recycled_step_pct.min(100.0 - input.recycled_percent);
    if step <= 0.0 {
        return None;
    }

    let smelting = breakdown.stage_co2(LifecycleStage::PrimaryProduction);
    let ratio = cfg.recycled_intensity_ratio;
    let blend = input.primary_percent / 100.0 + ratio * input.recycled_percent / 100.0;
    if blend <= 0.0 {
        return None;
    }

    // implied primary-route intensity, backed out of the blended stage
    let primary_intensity = smelting / blend;
    let reduction = step / 100.0 * primary_intensity * (1.0 - ratio);
    if reduction <= 0.0 {
        return None;
    }

    Some(Candidate {
        title: "Increase recycled content".to_string(),
        description: format!(
            "Raise recycled feedstock from {:.0}% to {:.0}% to displace primary smelting",
            input.recycled_percent,
            input.recycled_percent + step
        ),
        co2_reduction_tonnes: reduction,
        cost_change_pct: cfg.recycled_cost_per_point_pct * step,
        change_magnitude_pct: step,
    })
}

fn switch_to_renewable(
    input: &AssessmentInput,
    breakdown: &ImpactBreakdown,
    cfg: &RecommendationConfig,
) -> Option<Candidate> {
    if input.energy_source == EnergySource::Renewable {
        return None;
    }

    let current = co2_scale(input.energy_source);
    let renewable = co2_scale(EnergySource::Renewable);
    let relative_cut = 1.0 - renewable / current;

    let affected = breakdown.stage_co2(LifecycleStage::PrimaryProduction)
        + breakdown.stage_co2(LifecycleStage::Processing);
    let reduction = affected * relative_cut;
    if reduction <= 0.0 {
        return None;
    }

    Some(Candidate {
        title: "Switch energy source to renewable".to_string(),
        description: format!(
            "Replace {} with renewable electricity for smelting and processing",
            input.energy_source
        ),
        co2_reduction_tonnes: reduction,
        cost_change_pct: cfg.renewable_premium_pct,
        change_magnitude_pct: relative_cut * 100.0,
    })
}

fn reduce_transport_distance(
    input: &AssessmentInput,
    breakdown: &ImpactBreakdown,
    cfg: &RecommendationConfig,
) -> Option<Candidate> {
    let transport = breakdown.stage_co2(LifecycleStage::Transport);
    let reduction = transport * cfg.transport_cut_fraction;
    if reduction <= 0.0 {
        return None;
    }

    let cut_pct = cfg.transport_cut_fraction * 100.0;
    Some(Candidate {
        title: "Reduce transport distance".to_string(),
        description: format!(
            "Source feedstock closer to the plant, cutting the {:.0} km route by {:.0}%",
            input.transport_distance_km, cut_pct
        ),
        co2_reduction_tonnes: reduction,
        cost_change_pct: cfg.transport_cost_per_point_pct * cut_pct,
        change_magnitude_pct: cut_pct,
    })
}

fn improve_end_of_life_recovery(
    input: &AssessmentInput,
    breakdown: &ImpactBreakdown,
    cfg: &RecommendationConfig,
) -> Option<Candidate> {
    let step = cfg
        .eol_step_pct
        .min(cfg.eol_max_percent - input.end_of_life_recovery_percent);
    if step <= 0.0 {
        return None;
    }

    let reduction = breakdown.stage_co2(LifecycleStage::EndOfLife) * step / 100.0;
    if reduction <= 0.0 {
        return None;
    }

    Some(Candidate {
        title: "Improve end-of-life recovery".to_string(),
        description: format!(
            "Lift recovery from {:.0}% to {:.0}% through take-back and sorting programmes",
            input.end_of_life_recovery_percent,
            input.end_of_life_recovery_percent + step
        ),
        co2_reduction_tonnes: reduction,
        cost_change_pct: cfg.eol_cost_per_point_pct * step,
        change_magnitude_pct: step,
    })
}

/// Generate ranked recommendations for one scenario.
///
/// Candidates with no positive reduction or no feasible input change
/// are dropped. Ranking is by CO2 reduction, then feasibility, then
/// catalogue order; ranks are dense and 1-based.
pub fn recommend(
    input: &AssessmentInput,
    breakdown: &ImpactBreakdown,
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let cfg = &config.recommendations;

    let candidates: Vec<Candidate> = [
        increase_recycled_content(input, breakdown, cfg),
        switch_to_renewable(input, breakdown, cfg),
        reduce_transport_distance(input, breakdown, cfg),
        improve_end_of_life_recovery(input, breakdown, cfg),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut scored: Vec<(Candidate, Feasibility)> = candidates
        .into_iter()
        .map(|c| {
            let feasibility = cfg.thresholds.classify(c.change_magnitude_pct);
            (c, feasibility)
        })
        .collect();

    // stable sort keeps catalogue order for full ties
    scored.sort_by(|(a, fa), (b, fb)| {
        b.co2_reduction_tonnes
            .total_cmp(&a.co2_reduction_tonnes)
            .then(fb.cmp(fa))
    });

    let mut recommendations = Vec::with_capacity(scored.len());
    let mut rank = 0u32;
    let mut last_key: Option<(f64, Feasibility)> = None;

    for (candidate, feasibility) in scored {
        let key = (candidate.co2_reduction_tonnes, feasibility);
        if last_key != Some(key) {
            rank += 1;
            last_key = Some(key);
        }
        recommendations.push(Recommendation {
            rank,
            title: candidate.title,
            description: candidate.description,
            estimated_co2_reduction_tonnes: candidate.co2_reduction_tonnes,
            estimated_cost_change_pct: candidate.cost_change_pct,
            feasibility,
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::starter_table;
    use crate::impact::compute_impact;
    use metalcycle_metrics::Metal;

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

    fn recommendations_for(input: &AssessmentInput) -> Vec<Recommendation> {
        let table = starter_table();
        let breakdown = compute_impact(input, &table).unwrap();
        recommend(input, &breakdown, &EngineConfig::default())
    }

    #[test]
    fn test_baseline_produces_all_four_archetypes() {
        let recs = recommendations_for(&baseline_input());
        assert_eq!(recs.len(), 4);

        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles[0], "Switch energy source to renewable");
        assert_eq!(titles[1], "Increase recycled content");
        assert_eq!(titles[2], "Reduce transport distance");
        assert_eq!(titles[3], "Improve end-of-life recovery");
    }

    #[test]
    fn test_ranks_are_dense_and_reductions_descend() {
        let recs = recommendations_for(&baseline_input());
        let ranks: Vec<u32> = recs.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        for pair in recs.windows(2) {
            assert!(
                pair[0].estimated_co2_reduction_tonnes >= pair[1].estimated_co2_reduction_tonnes
            );
        }
    }

    #[test]
    fn test_baseline_estimates() {
        let recs = recommendations_for(&baseline_input());

        let energy = &recs[0];
        // (2.731 + 0.42) * 0.85
        assert!((energy.estimated_co2_reduction_tonnes - 2.67835).abs() < 1e-4);
        assert_eq!(energy.estimated_cost_change_pct, 12.5);
        assert_eq!(energy.feasibility, Feasibility::Medium);

        let recycled = &recs[1];
        assert!((recycled.estimated_co2_reduction_tonnes - 0.6232).abs() < 1e-3);
        assert!((recycled.estimated_cost_change_pct - -5.2).abs() < 1e-9);
        assert_eq!(recycled.feasibility, Feasibility::High);

        let transport = &recs[2];
        assert!((transport.estimated_co2_reduction_tonnes - 0.252).abs() < 1e-9);
        assert!((transport.estimated_cost_change_pct - -2.1).abs() < 1e-9);
        assert_eq!(transport.feasibility, Feasibility::High);

        let eol = &recs[3];
        assert!((eol.estimated_co2_reduction_tonnes - 0.0315).abs() < 1e-9);
        assert!((eol.estimated_cost_change_pct - 1.5).abs() < 1e-9);
        assert_eq!(eol.feasibility, Feasibility::High);
    }

    #[test]
    fn test_renewable_plant_skips_energy_switch() {
        let mut input = baseline_input();
        input.energy_source = EnergySource::Renewable;
        let recs = recommendations_for(&input);
        assert!(recs.iter().all(|r| r.title != "Switch energy source to renewable"));
    }

    #[test]
    fn test_fully_recycled_skips_recycled_archetype() {
        let mut input = baseline_input();
        input.primary_percent = 0.0;
        input.recycled_percent = 100.0;
        let recs = recommendations_for(&input);
        assert!(recs.iter().all(|r| r.title != "Increase recycled content"));
    }

    #[test]
    fn test_zero_distance_skips_transport_archetype() {
        let mut input = baseline_input();
        input.transport_distance_km = 0.0;
        let recs = recommendations_for(&input);
        assert!(recs.iter().all(|r| r.title != "Reduce transport distance"));
    }

    #[test]
    fn test_recovery_at_practical_max_skips_eol_archetype() {
        let mut input = baseline_input();
        input.end_of_life_recovery_percent = 95.0;
        let recs = recommendations_for(&input);
        assert!(recs.iter().all(|r| r.title != "Improve end-of-life recovery"));
    }
}
