//! Ranking Metrics
//!
//! Per-pass summary of a catalog ranking: how much was scored, how long it
//! took, and how the returned items spread across trust tiers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::model::TrustTier;
use super::trust::ScoredContent;

/// Summary of one ranking pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingMetrics {
    pub candidates_considered: usize,
    pub items_returned: usize,
    pub avg_score: f64,
    pub tier_distribution: BTreeMap<TrustTier, usize>,
    pub elapsed_ms: u64,
}

impl RankingMetrics {
    /// Summarize a ranked result against the number of scored candidates
    pub fn from_ranked(
        candidates_considered: usize,
        ranked: &[ScoredContent],
        elapsed_ms: u64,
    ) -> Self {
        let mut tier_distribution = BTreeMap::new();
        for item in ranked {
            *tier_distribution.entry(item.tier).or_insert(0) += 1;
        }

        let avg_score = if ranked.is_empty() {
            0.0
        } else {
            ranked.iter().map(|item| item.score).sum::<f64>() / ranked.len() as f64
        };

        Self {
            candidates_considered,
            items_returned: ranked.len(),
            avg_score,
            tier_distribution,
            elapsed_ms,
        }
    }

    /// Whether the pass took longer than `threshold_ms`
    pub fn is_slow(&self, threshold_ms: u64) -> bool {
        self.elapsed_ms > threshold_ms
    }

    /// Debug summary, escalated to a warning when the pass was slow
    pub fn log(&self, slow_threshold_ms: u64) {
        if self.is_slow(slow_threshold_ms) {
            warn!(
                "Slow ranking: {} candidates took {}ms (threshold: {}ms)",
                self.candidates_considered, self.elapsed_ms, slow_threshold_ms
            );
        }
        debug!(
            "Ranked {} of {} items in {}ms (avg score {:.3}, tiers {:?})",
            self.items_returned,
            self.candidates_considered,
            self.elapsed_ms,
            self.avg_score,
            self.tier_distribution
        );
    }
}
