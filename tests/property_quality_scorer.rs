use proptest::prelude::*;
use source_registry::domain::models::{QualitySignals, SourceType};
use source_registry::services::quality_scorer::{score, should_auto_add};

fn source_type_strategy() -> impl Strategy<Value = SourceType> {
    prop_oneof![
        Just(SourceType::Reddit),
        Just(SourceType::Rss),
        Just(SourceType::HackerNews),
        Just(SourceType::Twitter),
    ]
}

prop_compose! {
    fn signals_strategy()(
        source_type in source_type_strategy(),
        discovery_count in 1u32..6,
        domain_age_years in prop::option::of(0.0f64..10.0),
        avg_posts_per_day in prop::option::of(0.0f64..20.0),
        posts_last_30_days in prop::option::of(0u32..40),
        list_reputation in prop::option::of(0u32..10_000),
    ) -> QualitySignals {
        QualitySignals {
            source_type,
            health_check_passed: true,
            discovery_count,
            domain_age_years,
            avg_posts_per_day,
            posts_last_30_days,
            list_reputation,
        }
    }
}

proptest! {
    /// Property: score stays within [0, 1]
    #[test]
    fn prop_score_in_unit_interval(signals in signals_strategy()) {
        let s = score(&signals);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    /// Property: a failed health check always scores zero
    #[test]
    fn prop_failed_health_scores_zero(mut signals in signals_strategy()) {
        signals.health_check_passed = false;
        prop_assert_eq!(score(&signals), 0.0);
        prop_assert!(!should_auto_add(score(&signals)));
    }

    /// Property: more discoveries never lower the score
    #[test]
    fn prop_monotonic_in_discovery_count(signals in signals_strategy(), extra in 0u32..5) {
        let mut more = signals.clone();
        more.discovery_count += extra;
        prop_assert!(score(&more) >= score(&signals));
    }

    /// Property: an older domain never lowers the score
    #[test]
    fn prop_monotonic_in_domain_age(signals in signals_strategy(), extra in 0.0f64..10.0) {
        let mut older = signals.clone();
        older.domain_age_years = Some(signals.domain_age_years.unwrap_or(0.0) + extra);
        prop_assert!(score(&older) >= score(&signals));
    }

    /// Property: more activity never lowers the score
    #[test]
    fn prop_monotonic_in_activity(signals in signals_strategy(), extra_posts in 0u32..20, extra_rate in 0.0f64..10.0) {
        let mut busier = signals.clone();
        busier.posts_last_30_days = Some(signals.posts_last_30_days.unwrap_or(0) + extra_posts);
        busier.avg_posts_per_day = Some(signals.avg_posts_per_day.unwrap_or(0.0) + extra_rate);
        prop_assert!(score(&busier) >= score(&signals));
    }
}

#[test]
fn test_promotion_threshold_is_strict() {
    assert!(!should_auto_add(0.8));
    assert!(should_auto_add(0.8001));
}

#[test]
fn test_score_caps_at_one() {
    let signals = QualitySignals {
        source_type: SourceType::Reddit,
        health_check_passed: true,
        discovery_count: 5,
        domain_age_years: Some(10.0),
        avg_posts_per_day: Some(12.0),
        posts_last_30_days: None,
        list_reputation: Some(5000),
    };
    assert_eq!(score(&signals), 1.0);
}
