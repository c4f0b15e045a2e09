//! Scoring Policy
//!
//! Every weight and threshold used by the trust scorer and the age recommender
//! lives here, so both components read one source of truth. The age-fit
//! banding in particular is shared: [`ScoringPolicy::age_fit`] backs both the
//! trust score's age factor and the recommender's match score.

use serde::{Deserialize, Serialize};

use super::model::AgeRange;

/// Engagement factor weights (sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub play_time: f64,
    pub like_rate: f64,
    pub report_suppression: f64,
    /// Play time (minutes) that saturates the play-time term
    pub play_time_cap_minutes: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            play_time: 0.4,
            like_rate: 0.4,
            report_suppression: 0.2,
            play_time_cap_minutes: 60.0,
        }
    }
}

impl EngagementWeights {
    pub fn total(&self) -> f64 {
        self.play_time + self.like_rate + self.report_suppression
    }
}

/// Age-fit banding, checked tightest band first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeFitBands {
    pub exact: f64,
    pub within_one: f64,
    pub within_two: f64,
    pub outside: f64,
}

impl Default for AgeFitBands {
    fn default() -> Self {
        Self {
            exact: 1.0,
            within_one: 0.8,
            within_two: 0.6,
            outside: 0.3,
        }
    }
}

/// Multiplicative penalties for risky content traits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyPenalties {
    pub ads: f64,
    pub tracking: f64,
    pub external_links: f64,
    pub floor: f64,
}

impl Default for SafetyPenalties {
    fn default() -> Self {
        Self {
            ads: 0.7,
            tracking: 0.8,
            external_links: 0.9,
            floor: 0.5,
        }
    }
}

/// Freshness steps by days since last update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreshnessSchedule {
    pub week_days: i64,
    pub month_days: i64,
    pub quarter_days: i64,
    pub week: f64,
    pub month: f64,
    pub quarter: f64,
    pub stale: f64,
}

impl Default for FreshnessSchedule {
    fn default() -> Self {
        Self {
            week_days: 7,
            month_days: 30,
            quarter_days: 90,
            week: 1.0,
            month: 0.9,
            quarter: 0.8,
            stale: 0.7,
        }
    }
}

/// Lower bounds (inclusive) of the upper trust tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub hall: f64,
    pub featured: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            hall: 0.9,
            featured: 0.75,
        }
    }
}

/// How much precision the parent rating display is allowed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingDisplayPolicy {
    /// Minimum rating count for an exact score
    pub exact_min_ratings: u64,
    /// Minimum rating count for a range display
    pub range_min_ratings: u64,
    /// Half-width of the displayed range
    pub range_spread: f64,
    /// Top of the star scale
    pub max_rating: f64,
}

impl Default for RatingDisplayPolicy {
    fn default() -> Self {
        Self {
            exact_min_ratings: 156,
            range_min_ratings: 20,
            range_spread: 0.3,
            max_rating: 5.0,
        }
    }
}

/// Shared configuration for [`TrustScorer`](super::trust::TrustScorer) and
/// [`AgeRecommender`](super::age::AgeRecommender)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub engagement: EngagementWeights,
    pub age_fit: AgeFitBands,
    pub safety: SafetyPenalties,
    pub freshness: FreshnessSchedule,
    pub tiers: TierThresholds,
    pub rating: RatingDisplayPolicy,
    /// Interaction records kept per user, newest first
    pub history_capacity: usize,
    /// Band recommended when nothing is known about the user
    pub default_band: AgeRange,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            engagement: EngagementWeights::default(),
            age_fit: AgeFitBands::default(),
            safety: SafetyPenalties::default(),
            freshness: FreshnessSchedule::default(),
            tiers: TierThresholds::default(),
            rating: RatingDisplayPolicy::default(),
            history_capacity: 50,
            default_band: AgeRange::EARLY,
        }
    }
}

impl ScoringPolicy {
    /// Age-fit of `user_age` against `range`.
    ///
    /// Exact containment wins, then within one year of either bound, then
    /// within two. Used verbatim by both components.
    pub fn age_fit(&self, user_age: u32, range: &AgeRange) -> f64 {
        let bands = &self.age_fit;
        match range.distance(user_age) {
            0 => bands.exact,
            1 => bands.within_one,
            2 => bands.within_two,
            _ => bands.outside,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engagement_weights_sum_to_one() {
        let weights = EngagementWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_fit_bands() {
        let policy = ScoringPolicy::default();
        let range = AgeRange::new(6, 9);

        assert_eq!(policy.age_fit(6, &range), 1.0);
        assert_eq!(policy.age_fit(9, &range), 1.0);
        assert_eq!(policy.age_fit(5, &range), 0.8);
        assert_eq!(policy.age_fit(10, &range), 0.8);
        assert_eq!(policy.age_fit(4, &range), 0.6);
        assert_eq!(policy.age_fit(11, &range), 0.6);
        assert_eq!(policy.age_fit(3, &range), 0.3);
        assert_eq!(policy.age_fit(15, &range), 0.3);
    }

    #[test]
    fn test_age_fit_narrow_range_prefers_tighter_band() {
        // Age 5 is 1 year from min and 2 years from max of (6,7)
        let policy = ScoringPolicy::default();
        assert_eq!(policy.age_fit(5, &AgeRange::new(6, 7)), 0.8);
    }
}
