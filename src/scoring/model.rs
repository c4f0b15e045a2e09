//! Catalog Data Model
//!
//! Read-only snapshots handed to the scoring core by the catalog, usage-stats
//! and moderation collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open-ended upper bound used for the "12+" band
pub const OPEN_ENDED_MAX_AGE: u32 = 99;

/// Per-item usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentStats {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub opens: u64,
    #[serde(default)]
    pub reports: u64,
    #[serde(default)]
    pub avg_play_time_minutes: f64,
}

/// Per-item safety flags supplied by moderation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFlags {
    #[serde(default)]
    pub has_ads: bool,
    #[serde(default)]
    pub has_tracking: bool,
    #[serde(default)]
    pub has_external_links: bool,
    #[serde(default)]
    pub content_moderated: bool,
}

/// Inclusive recommended age band
///
/// Serialized as `{ "min": 6, "max": 9 }`. The canonical string form used by
/// labels and lookups is produced by [`AgeRange::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub const TODDLER: AgeRange = AgeRange::new(3, 6);
    pub const EARLY: AgeRange = AgeRange::new(6, 9);
    pub const MIDDLE: AgeRange = AgeRange::new(9, 12);
    pub const TEEN: AgeRange = AgeRange::new(12, OPEN_ENDED_MAX_AGE);

    /// The four canonical catalog bands, youngest first
    pub const CANONICAL: [AgeRange; 4] = [Self::TODDLER, Self::EARLY, Self::MIDDLE, Self::TEEN];

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Build a range, rejecting `min > max`
    pub fn checked(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }

    /// Years between `age` and the nearest bound; 0 when contained
    pub fn distance(&self, age: u32) -> u32 {
        if age < self.min {
            self.min - age
        } else if age > self.max {
            age - self.max
        } else {
            0
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.max >= OPEN_ENDED_MAX_AGE
    }

    /// Canonical key: `"6-9"`, or `"12+"` for open-ended bands
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open_ended() {
            write!(f, "{}+", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Everything the scorer needs to know about one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub stats: ContentStats,
    #[serde(default)]
    pub flags: SecurityFlags,
    pub age_range: AgeRange,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Discrete trust tier, ordered `Verified < Featured < Hall`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustTier {
    Verified,
    Featured,
    Hall,
}

impl TrustTier {
    pub fn display_name(&self) -> &'static str {
        match self {
            TrustTier::Verified => "Verified",
            TrustTier::Featured => "Featured",
            TrustTier::Hall => "Hall of Fame",
        }
    }

    /// Badge color for the presentation layer
    pub fn badge_color(&self) -> &'static str {
        match self {
            TrustTier::Verified => "#22c55e", // green
            TrustTier::Featured => "#0ea5e9", // sky blue
            TrustTier::Hall => "#f59e0b",     // gold
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustTier::Verified => write!(f, "verified"),
            TrustTier::Featured => write!(f, "featured"),
            TrustTier::Hall => write!(f, "hall"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_range_keys() {
        assert_eq!(AgeRange::EARLY.key(), "6-9");
        assert_eq!(AgeRange::TEEN.key(), "12+");
        assert_eq!(AgeRange::new(4, 4).key(), "4-4");
    }

    #[test]
    fn test_age_range_distance() {
        let range = AgeRange::new(6, 9);
        assert_eq!(range.distance(7), 0);
        assert_eq!(range.distance(5), 1);
        assert_eq!(range.distance(11), 2);
        assert_eq!(range.distance(0), 6);
        assert!(AgeRange::checked(9, 6).is_none());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(TrustTier::Hall > TrustTier::Featured);
        assert!(TrustTier::Featured > TrustTier::Verified);
        assert_eq!(
            serde_json::to_string(&TrustTier::Hall).unwrap(),
            "\"hall\""
        );
    }

    #[test]
    fn test_content_item_defaults_missing_fields() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "id": "puzzle-1",
            "age_range": { "min": 6, "max": 9 }
        }))
        .unwrap();

        assert_eq!(item.stats, ContentStats::default());
        assert!(!item.flags.content_moderated);
        assert!(item.last_updated.is_none());
    }
}
