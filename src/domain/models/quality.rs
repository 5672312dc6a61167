//! Inputs to the quality scorer.

use serde::{Deserialize, Serialize};

use super::source::SourceType;

/// Everything the scorer looks at for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySignals {
    pub source_type: SourceType,
    pub health_check_passed: bool,
    /// Distinct channels that found the source, at least 1
    pub discovery_count: u32,
    pub domain_age_years: Option<f64>,
    pub avg_posts_per_day: Option<f64>,
    pub posts_last_30_days: Option<u32>,
    /// Stars or subscribers of the curated list it came from
    pub list_reputation: Option<u32>,
}

impl QualitySignals {
    pub fn new(source_type: SourceType, health_check_passed: bool, discovery_count: u32) -> Self {
        Self {
            source_type,
            health_check_passed,
            discovery_count,
            domain_age_years: None,
            avg_posts_per_day: None,
            posts_last_30_days: None,
            list_reputation: None,
        }
    }
}
