//! User Interaction History
//!
//! Snapshot of what a user played recently, newest first, plus an optional
//! explicit age preference. The history store owns the real log; this type is
//! what it hands to the recommender.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::AgeRange;
use super::policy::ScoringPolicy;

/// One play of one content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub content_id: String,
    pub age_range: AgeRange,
    pub played_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(content_id: impl Into<String>, age_range: AgeRange, played_at: DateTime<Utc>) -> Self {
        Self {
            content_id: content_id.into(),
            age_range,
            played_at,
        }
    }
}

/// Recent plays (newest first) and an optional explicit preference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    #[serde(default)]
    pub recent_games: Vec<InteractionRecord>,
    #[serde(default)]
    pub preferred_age: Option<AgeRange>,
}

impl UserHistory {
    pub fn with_preference(preferred_age: AgeRange) -> Self {
        Self {
            recent_games: Vec::new(),
            preferred_age: Some(preferred_age),
        }
    }

    /// Prepend `record` and evict the oldest entries beyond the policy's
    /// history capacity
    pub fn record(&mut self, record: InteractionRecord, policy: &ScoringPolicy) {
        self.recent_games.insert(0, record);
        self.recent_games.truncate(policy.history_capacity);
    }

    /// The newest plays that fit within the policy's history capacity
    pub fn retained<'a>(
        &'a self,
        policy: &ScoringPolicy,
    ) -> impl Iterator<Item = &'a InteractionRecord> + 'a {
        self.recent_games.iter().take(policy.history_capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.recent_games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_record_keeps_newest_first() {
        let now = Utc::now();
        let policy = ScoringPolicy::default();
        let mut history = UserHistory::default();
        history.record(InteractionRecord::new("a", AgeRange::EARLY, now), &policy);
        history.record(
            InteractionRecord::new("b", AgeRange::MIDDLE, now + Duration::minutes(1)),
            &policy,
        );

        assert_eq!(history.recent_games[0].content_id, "b");
        assert_eq!(history.recent_games[1].content_id, "a");
    }

    #[test]
    fn test_record_evicts_oldest_beyond_capacity() {
        let now = Utc::now();
        let policy = ScoringPolicy::default();
        let mut history = UserHistory::default();
        for i in 0..60 {
            history.record(
                InteractionRecord::new(format!("game-{}", i), AgeRange::EARLY, now),
                &policy,
            );
        }

        assert_eq!(history.recent_games.len(), 50);
        assert_eq!(history.recent_games[0].content_id, "game-59");
        assert_eq!(history.recent_games[49].content_id, "game-10");
    }

    #[test]
    fn test_record_honors_configured_capacity() {
        let now = Utc::now();
        let policy = ScoringPolicy {
            history_capacity: 3,
            ..Default::default()
        };
        let mut history = UserHistory::default();
        for i in 0..5 {
            history.record(
                InteractionRecord::new(format!("game-{}", i), AgeRange::MIDDLE, now),
                &policy,
            );
        }

        let ids: Vec<&str> = history
            .recent_games
            .iter()
            .map(|r| r.content_id.as_str())
            .collect();
        assert_eq!(ids, vec!["game-4", "game-3", "game-2"]);
    }

    #[test]
    fn test_retained_skips_entries_beyond_capacity() {
        let now = Utc::now();
        let history = UserHistory {
            recent_games: (0..52)
                .map(|i| InteractionRecord::new(format!("game-{}", i), AgeRange::EARLY, now))
                .collect(),
            preferred_age: None,
        };

        let policy = ScoringPolicy::default();
        assert_eq!(history.retained(&policy).count(), 50);
        assert_eq!(
            history.retained(&policy).last().map(|r| r.content_id.as_str()),
            Some("game-49")
        );
    }

    #[test]
    fn test_history_deserializes_without_preference() {
        let history: UserHistory = serde_json::from_value(serde_json::json!({
            "recent_games": [{
                "content_id": "paint",
                "age_range": { "min": 3, "max": 6 },
                "played_at": "2026-01-02T10:00:00Z"
            }]
        }))
        .unwrap();

        assert_eq!(history.recent_games.len(), 1);
        assert!(history.preferred_age.is_none());
    }
}
