//! Age Recommender
//!
//! Derives a recommended age band from a user's recent plays and scores how
//! well a user's age matches an item's band.
//!
//! ## Recommendation order
//!
//! 1. An explicit `preferred_age` always wins
//! 2. Otherwise the most frequent band across `recent_games`
//! 3. With no history at all, the policy's default band (6-9)

use std::collections::HashMap;
use tracing::debug;

use super::history::UserHistory;
use super::model::{AgeRange, OPEN_ENDED_MAX_AGE};
use super::policy::ScoringPolicy;

/// Display labels and colors for the canonical band keys
const BAND_STYLES: &[(&str, &str, &str)] = &[
    ("3-6", "Ages 3-6", "#f472b6"),
    ("6-9", "Ages 6-9", "#60a5fa"),
    ("9-12", "Ages 9-12", "#34d399"),
    ("12+", "Ages 12+", "#a78bfa"),
];

/// Stateless age recommender
#[derive(Debug, Clone, Default)]
pub struct AgeRecommender {
    policy: ScoringPolicy,
}

impl AgeRecommender {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Recommended band for a user.
    ///
    /// Frequency ties go to the band that first reached the winning count
    /// while scanning `recent_games` newest first.
    pub fn recommend(&self, history: Option<&UserHistory>) -> AgeRange {
        let Some(history) = history else {
            return self.policy.default_band;
        };

        if let Some(preferred) = history.preferred_age {
            debug!("Using explicit age preference {}", preferred);
            return preferred;
        }

        let mut counts: HashMap<AgeRange, usize> = HashMap::new();
        let mut best: Option<(AgeRange, usize)> = None;
        let mut considered = 0;

        // Entries past the capacity would already have been evicted from the log
        for record in history.retained(&self.policy) {
            considered += 1;
            let count = counts.entry(record.age_range).or_insert(0);
            *count += 1;

            let leads = best.map_or(true, |(_, best_count)| *count > best_count);
            if leads {
                best = Some((record.age_range, *count));
            }
        }

        match best {
            Some((band, count)) => {
                debug!(
                    "Derived age band {} from {} of {} recent plays",
                    band, count, considered
                );
                band
            }
            None => self.policy.default_band,
        }
    }

    /// Match quality in [0.3, 1]; same banding as the trust score's age fit
    pub fn match_score(&self, user_age: u32, range: &AgeRange) -> f64 {
        self.policy.age_fit(user_age, range)
    }
}

/// Parse `"<min>-<max>"` or `"<n>+"` into a band.
///
/// Returns `None` for anything else, including `min > max`.
pub fn parse_age_key(key: &str) -> Option<AgeRange> {
    let key = key.trim();

    if let Some(min) = key.strip_suffix('+') {
        let min = parse_years(min)?;
        return AgeRange::checked(min, OPEN_ENDED_MAX_AGE);
    }

    let (min, max) = key.split_once('-')?;
    AgeRange::checked(parse_years(min)?, parse_years(max)?)
}

/// Digits only; `u32::from_str` alone would accept a leading `+`
fn parse_years(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Canonical band for a known age. Shared boundaries (6, 9, 12) fall into
/// the younger band; ages below 3 get the youngest band.
pub fn recommend_by_age(child_age: u32) -> AgeRange {
    match child_age {
        0..=6 => AgeRange::TODDLER,
        7..=9 => AgeRange::EARLY,
        10..=12 => AgeRange::MIDDLE,
        _ => AgeRange::TEEN,
    }
}

/// Display label for a canonical band key
pub fn age_label(key: &str) -> Option<&'static str> {
    BAND_STYLES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, label, _)| *label)
}

/// Display color for a canonical band key
pub fn age_color(key: &str) -> Option<&'static str> {
    BAND_STYLES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, _, color)| *color)
}
