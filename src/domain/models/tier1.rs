//! Tier1 registry entries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::SourceIdentity;

/// Activity figures observed for a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub avg_posts_per_day: Option<f64>,
    pub posts_last_30_days: Option<u32>,
    pub domain_age_years: Option<f64>,
    pub articles_found: Option<u32>,
}

impl ActivityMetrics {
    /// Overwrite with every figure `other` knows.
    pub fn absorb(&mut self, other: &Self) {
        if other.avg_posts_per_day.is_some() {
            self.avg_posts_per_day = other.avg_posts_per_day;
        }
        if other.posts_last_30_days.is_some() {
            self.posts_last_30_days = other.posts_last_30_days;
        }
        if other.domain_age_years.is_some() {
            self.domain_age_years = other.domain_age_years;
        }
        if other.articles_found.is_some() {
            self.articles_found = other.articles_found;
        }
    }
}

/// A trusted source in the curated registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier1Entry {
    pub identity: SourceIdentity,
    pub url: Option<String>,
    pub description: Option<String>,
    /// Unioned on every promotion, never replaced
    pub interests: BTreeSet<String>,
    /// Quality score in `[0, 1]`
    pub quality_score: f64,
    pub discovered_at: DateTime<Utc>,
    /// Channels of the most recent promotion
    pub discovered_via: BTreeSet<String>,
    pub is_healthy: bool,
    pub last_check_at: Option<DateTime<Utc>>,
    pub activity: ActivityMetrics,
}

impl Tier1Entry {
    /// Whether this entry lists `interest`, ignoring case.
    pub fn covers(&self, interest: &str) -> bool {
        self.interests.iter().any(|i| i.eq_ignore_ascii_case(interest))
    }

    /// Whether this entry lists any of `interests`, ignoring case.
    pub fn covers_any<'a>(&self, mut interests: impl Iterator<Item = &'a String>) -> bool {
        interests.any(|i| self.covers(i))
    }
}

/// Input to a Tier1 upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct Tier1Promotion {
    pub identity: SourceIdentity,
    pub interests: BTreeSet<String>,
    pub quality_score: f64,
    pub discovered_via: BTreeSet<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub activity: ActivityMetrics,
}

impl Tier1Promotion {
    pub fn new(
        identity: SourceIdentity,
        interests: BTreeSet<String>,
        quality_score: f64,
        discovered_via: BTreeSet<String>,
    ) -> Self {
        Self {
            identity,
            interests,
            quality_score,
            discovered_via,
            url: None,
            description: None,
            activity: ActivityMetrics::default(),
        }
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn with_activity(mut self, activity: ActivityMetrics) -> Self {
        self.activity = activity;
        self
    }
}
