// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! Hotspot ranker: orders stage impacts by contribution share.

use metalcycle_metrics::StageImpact;

/// Sort stage impacts descending by share.
///
/// The sort is stable, so equal shares keep the canonical stage order
/// they arrive in. Pure and deterministic.
pub fn rank_hotspots(mut impacts: Vec<StageImpact>) -> Vec<StageImpact> {
    impacts.sort_by(|a, b| b.share_pct.total_cmp(&a.share_pct));
    impacts
}
