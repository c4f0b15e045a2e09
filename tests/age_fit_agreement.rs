use chrono::Utc;

use playtrust::{
    AgeRange, AgeRecommender, ContentItem, ContentStats, ScoringPolicy, SecurityFlags, TrustScorer,
};

/// Item whose other three factors are exactly 1.0, so the score is the age fit
fn neutral_item(age_range: AgeRange) -> ContentItem {
    ContentItem {
        id: "neutral".to_string(),
        stats: ContentStats {
            likes: 10,
            opens: 10,
            reports: 0,
            avg_play_time_minutes: 60.0,
        },
        flags: SecurityFlags {
            content_moderated: true,
            ..Default::default()
        },
        age_range,
        last_updated: Some(Utc::now()),
    }
}

#[test]
fn match_score_agrees_with_trust_age_factor() {
    let policy = ScoringPolicy::default();
    let scorer = TrustScorer::new(policy.clone());
    let recommender = AgeRecommender::new(policy);
    let now = Utc::now();

    for range in AgeRange::CANONICAL.into_iter().chain([AgeRange::new(5, 5)]) {
        // exact (both bounds), ±1, ±2 and beyond
        let ages = [
            range.min,
            range.max,
            range.min.saturating_sub(1),
            range.max + 1,
            range.min.saturating_sub(2),
            range.max + 2,
            range.min.saturating_sub(5),
            range.max + 5,
        ];

        for age in ages {
            let matched = recommender.match_score(age, &range);
            let factor = scorer.age_fit_factor(Some(age), &range);
            assert_eq!(matched, factor, "age {} vs band {}", age, range);

            let assessment = scorer.assess_at(&neutral_item(range), Some(age), now);
            assert_eq!(assessment.age_fit, matched);
            assert!((assessment.score - matched).abs() < 1e-9);
        }
    }
}

#[test]
fn boundary_set_scores() {
    let recommender = AgeRecommender::default();
    let range = AgeRange::new(6, 9);

    assert_eq!(recommender.match_score(7, &range), 1.0);
    assert_eq!(recommender.match_score(5, &range), 0.8);
    assert_eq!(recommender.match_score(10, &range), 0.8);
    assert_eq!(recommender.match_score(4, &range), 0.6);
    assert_eq!(recommender.match_score(11, &range), 0.6);
    assert_eq!(recommender.match_score(3, &range), 0.3);
    assert_eq!(recommender.match_score(12, &range), 0.3);
}

#[test]
fn missing_user_age_is_neutral() {
    let scorer = TrustScorer::default();
    assert_eq!(scorer.age_fit_factor(None, &AgeRange::TEEN), 1.0);
}
