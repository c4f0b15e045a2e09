//! Scoring Module
//!
//! Trust scoring and age recommendation for the curated kids' catalog.
//!
//! ## Architecture
//!
//! 1. **Model** - Read-only snapshots: stats, safety flags, age bands, items
//! 2. **Policy** - One shared table of weights and thresholds
//! 3. **Trust** - Multiplicative trust score, tiers, safety gate, ranking
//! 4. **Age** - Age-band recommendation from history and age matching
//! 5. **History** - Bounded, newest-first interaction log snapshot
//!
//! Everything here is pure: the same inputs always give the same outputs, and
//! the scorer and recommender are plain values that can be shared across
//! threads without locking.
//!
//! ## Trust Score
//!
//! `score = engagement × age_fit × safety × freshness`
//! - Engagement: play time (40%), like rate (40%), report suppression (20%)
//! - Age fit: 1.0 / 0.8 / 0.6 / 0.3 by distance from the item's band
//! - Safety: ×0.7 ads, ×0.8 tracking, ×0.9 external links, floor 0.5
//! - Freshness: 1.0 / 0.9 / 0.8 / 0.7 by days since update (7 / 30 / 90)

pub mod age;
pub mod history;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod trust;

pub use age::{age_color, age_label, parse_age_key, recommend_by_age, AgeRecommender};
pub use history::{InteractionRecord, UserHistory};
pub use model::{AgeRange, ContentItem, ContentStats, SecurityFlags, TrustTier};
pub use policy::ScoringPolicy;
pub use trust::{ScoredContent, TrustAssessment, TrustScorer, NEW_CONTENT_LABEL};
