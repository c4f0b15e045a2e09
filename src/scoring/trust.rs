//! Trust Scorer
//!
//! Composite trust score for catalog items. The four factors are multiplied,
//! so one weak dimension caps the overall score:
//!
//! - Engagement (0-1): play time, like rate and report suppression
//! - Age fit (0.3-1): distance between the user's age and the item's band
//! - Safety (floor-1): penalties for ads, tracking and external links
//! - Freshness (0.7-1): step function of days since the last update

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::metrics::RankingMetrics;
use super::model::{AgeRange, ContentItem, ContentStats, SecurityFlags, TrustTier};
use super::policy::ScoringPolicy;

/// Shown instead of a number when an item has too few ratings
pub const NEW_CONTENT_LABEL: &str = "New content";

/// Rankings slower than this are logged at warn level
const SLOW_RANK_THRESHOLD_MS: u64 = 50;

/// Score of one item together with the factors that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustAssessment {
    pub score: f64,
    pub tier: TrustTier,
    pub engagement: f64,
    pub age_fit: f64,
    pub safety: f64,
    pub freshness: f64,
}

/// A ranked catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredContent {
    pub content_id: String,
    pub score: f64,
    pub tier: TrustTier,
}

/// Stateless trust scorer
#[derive(Debug, Clone, Default)]
pub struct TrustScorer {
    policy: ScoringPolicy,
}

impl TrustScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Trust score in [0, 1] evaluated against the current clock
    pub fn compute_trust_score(&self, item: &ContentItem, user_age: Option<u32>) -> f64 {
        self.assess_at(item, user_age, Utc::now()).score
    }

    /// Trust score in [0, 1] evaluated at `now`
    pub fn compute_trust_score_at(
        &self,
        item: &ContentItem,
        user_age: Option<u32>,
        now: DateTime<Utc>,
    ) -> f64 {
        self.assess_at(item, user_age, now).score
    }

    /// Full factor breakdown evaluated against the current clock
    pub fn assess(&self, item: &ContentItem, user_age: Option<u32>) -> TrustAssessment {
        self.assess_at(item, user_age, Utc::now())
    }

    pub fn assess_at(
        &self,
        item: &ContentItem,
        user_age: Option<u32>,
        now: DateTime<Utc>,
    ) -> TrustAssessment {
        let engagement = self.engagement_factor(&item.stats);
        let age_fit = self.age_fit_factor(user_age, &item.age_range);
        let safety = self.safety_factor(&item.flags);
        let freshness = self.freshness_factor(item.last_updated, now);

        let score = (engagement * age_fit * safety * freshness).clamp(0.0, 1.0);

        TrustAssessment {
            score,
            tier: self.classify_tier(score),
            engagement,
            age_fit,
            safety,
            freshness,
        }
    }

    // ---- Factors (pure functions) ----

    /// Weighted play time, like rate and report suppression.
    ///
    /// With no opens the like rate is 0 and the suppression term is 1. Rates
    /// are clamped to [0, 1] so inconsistent counters stay in range.
    pub fn engagement_factor(&self, stats: &ContentStats) -> f64 {
        let weights = &self.policy.engagement;

        let minutes = if stats.avg_play_time_minutes.is_nan() {
            0.0
        } else {
            stats.avg_play_time_minutes.max(0.0)
        };
        let play_time = (minutes / weights.play_time_cap_minutes).min(1.0);

        let (like_rate, suppression) = if stats.opens > 0 {
            let opens = stats.opens as f64;
            let like_rate = (stats.likes as f64 / opens).min(1.0);
            let report_rate = (stats.reports as f64 / opens).min(1.0);
            (like_rate, 1.0 - report_rate)
        } else {
            (0.0, 1.0)
        };

        (play_time * weights.play_time
            + like_rate * weights.like_rate
            + suppression * weights.report_suppression)
            .clamp(0.0, 1.0)
    }

    /// 1.0 when no user age is known, otherwise the shared age-fit banding
    pub fn age_fit_factor(&self, user_age: Option<u32>, range: &AgeRange) -> f64 {
        match user_age {
            Some(age) => self.policy.age_fit(age, range),
            None => 1.0,
        }
    }

    /// Multiplicative penalties, floored. Moderation does not move this factor.
    pub fn safety_factor(&self, flags: &SecurityFlags) -> f64 {
        let penalties = &self.policy.safety;
        let mut factor = 1.0;

        if flags.has_ads {
            factor *= penalties.ads;
        }
        if flags.has_tracking {
            factor *= penalties.tracking;
        }
        if flags.has_external_links {
            factor *= penalties.external_links;
        }

        factor.max(penalties.floor)
    }

    /// Step function of whole days since `last_updated` (absent means fresh)
    pub fn freshness_factor(&self, last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        let schedule = &self.policy.freshness;
        let days = last_updated
            .map(|updated| (now - updated).num_days().max(0))
            .unwrap_or(0);

        if days <= schedule.week_days {
            schedule.week
        } else if days <= schedule.month_days {
            schedule.month
        } else if days <= schedule.quarter_days {
            schedule.quarter
        } else {
            schedule.stale
        }
    }

    // ---- Classification ----

    /// Tier boundaries are inclusive below: exactly the hall threshold is `Hall`
    pub fn classify_tier(&self, score: f64) -> TrustTier {
        let tiers = &self.policy.tiers;
        if score >= tiers.hall {
            TrustTier::Hall
        } else if score >= tiers.featured {
            TrustTier::Featured
        } else {
            TrustTier::Verified
        }
    }

    /// Boolean safety gate, independent of the numeric safety factor.
    ///
    /// Unmoderated content is never safe; strict mode also rejects ads and
    /// tracking.
    pub fn is_safe(&self, flags: &SecurityFlags, strict: bool) -> bool {
        if !flags.content_moderated {
            return false;
        }
        if strict && (flags.has_ads || flags.has_tracking) {
            return false;
        }
        true
    }

    /// Parent rating text with precision matched to the sample size
    pub fn rating_display(&self, rating: f64, total_ratings: u64) -> String {
        let policy = &self.policy.rating;

        if total_ratings >= policy.exact_min_ratings {
            format!("{:.1} ({} ratings)", rating, total_ratings)
        } else if total_ratings >= policy.range_min_ratings {
            let low = (rating - policy.range_spread).clamp(0.0, policy.max_rating);
            let high = (rating + policy.range_spread).clamp(0.0, policy.max_rating);
            format!("{:.1}-{:.1}", low, high)
        } else {
            NEW_CONTENT_LABEL.to_string()
        }
    }

    // ---- Ranking ----

    /// Top `limit` items by descending trust score, no user age applied.
    ///
    /// The sort is stable: items with identical scores keep their input order.
    pub fn rank(&self, items: &[ContentItem], limit: usize) -> Vec<ScoredContent> {
        self.rank_at(items, limit, None, Utc::now())
    }

    /// Like [`rank`](Self::rank) with the age-fit factor for `user_age`
    pub fn rank_for_age(
        &self,
        items: &[ContentItem],
        limit: usize,
        user_age: Option<u32>,
    ) -> Vec<ScoredContent> {
        self.rank_at(items, limit, user_age, Utc::now())
    }

    pub fn rank_at(
        &self,
        items: &[ContentItem],
        limit: usize,
        user_age: Option<u32>,
        now: DateTime<Utc>,
    ) -> Vec<ScoredContent> {
        let started = Instant::now();

        // Indexed parallel collect keeps input order, which the stable sort relies on
        let mut scored: Vec<ScoredContent> = items
            .par_iter()
            .map(|item| {
                let assessment = self.assess_at(item, user_age, now);
                ScoredContent {
                    content_id: item.id.clone(),
                    score: assessment.score,
                    tier: assessment.tier,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        RankingMetrics::from_ranked(items.len(), &scored, elapsed_ms).log(SLOW_RANK_THRESHOLD_MS);

        scored
    }
}
