//! Quality scoring and the auto-promotion predicate.
//!
//! Points are accumulated in tenths so that the promotion comparison is
//! exact: a candidate worth exactly 0.8 never promotes.

use crate::domain::models::{QualitySignals, SourceType};

/// Scores strictly above this promote to Tier1.
pub const PROMOTION_THRESHOLD: f64 = 0.8;

/// Minimum curated-list reputation counted as provenance.
pub const PROVENANCE_MIN_REPUTATION: u32 = 1000;

const BASE_TENTHS: u32 = 3;
const PER_EXTRA_DISCOVERY_TENTHS: u32 = 2;
const MAX_EXTRA_DISCOVERIES: u32 = 2;
const ACTIVITY_TENTHS: u32 = 2;
const PROVENANCE_TENTHS: u32 = 2;
const REDDIT_ACTIVE_POSTS_PER_DAY: f64 = 5.0;
const RSS_ACTIVE_POSTS_PER_MONTH: u32 = 10;

/// Score a candidate in `[0, 1]`. A failed health check scores 0.
pub fn score(signals: &QualitySignals) -> f64 {
    if !signals.health_check_passed {
        return 0.0;
    }

    let mut tenths = BASE_TENTHS;

    let extra_discoveries = signals.discovery_count.saturating_sub(1).min(MAX_EXTRA_DISCOVERIES);
    tenths += PER_EXTRA_DISCOVERY_TENTHS * extra_discoveries;

    if let Some(age) = signals.domain_age_years {
        if age > 1.0 {
            tenths += 1;
        }
        if age > 3.0 {
            tenths += 1;
        }
    }

    let active = match signals.source_type {
        SourceType::Reddit => signals
            .avg_posts_per_day
            .is_some_and(|posts| posts > REDDIT_ACTIVE_POSTS_PER_DAY),
        SourceType::Rss => signals
            .posts_last_30_days
            .is_some_and(|posts| posts > RSS_ACTIVE_POSTS_PER_MONTH),
        SourceType::HackerNews | SourceType::Twitter => false,
    };
    if active {
        tenths += ACTIVITY_TENTHS;
    }

    if signals
        .list_reputation
        .is_some_and(|reputation| reputation >= PROVENANCE_MIN_REPUTATION)
    {
        tenths += PROVENANCE_TENTHS;
    }

    f64::from(tenths.min(10)) / 10.0
}

/// Whether a score earns automatic Tier1 promotion.
pub fn should_auto_add(score: f64) -> bool {
    score > PROMOTION_THRESHOLD
}
