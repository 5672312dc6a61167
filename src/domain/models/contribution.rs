//! Per-run source yield.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::SourceIdentity;

/// What one source yielded for one newsletter run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceYield {
    pub identity: SourceIdentity,
    pub articles_collected: u32,
    pub articles_included: u32,
}

/// Persisted, append-only contribution row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub newsletter_id: i64,
    pub identity: SourceIdentity,
    pub articles_collected: u32,
    pub articles_included: u32,
    pub collected_at: DateTime<Utc>,
}

impl ContributionRecord {
    pub fn new(newsletter_id: i64, source_yield: SourceYield, collected_at: DateTime<Utc>) -> Self {
        Self {
            newsletter_id,
            identity: source_yield.identity,
            articles_collected: source_yield.articles_collected,
            articles_included: source_yield.articles_included,
            collected_at,
        }
    }
}
