//! Coverage reports and routing decisions.

use serde::{Deserialize, Serialize};

use super::tier1::Tier1Entry;

/// Which requested interests the registry can serve on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub covered: Vec<String>,
    pub missing: Vec<String>,
    /// `covered / requested * 100`; 100.0 for an empty request
    pub coverage_percentage: f64,
}

impl CoverageReport {
    /// Build a report from the partition of the requested interests.
    pub fn from_partition(covered: Vec<String>, missing: Vec<String>) -> Self {
        let total = covered.len() + missing.len();
        #[allow(clippy::cast_precision_loss)]
        let coverage_percentage = if total == 0 {
            100.0
        } else {
            covered.len() as f64 / total as f64 * 100.0
        };
        Self {
            covered,
            missing,
            coverage_percentage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Path indicator handed to the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePath {
    Fast,
    Hybrid,
}

impl RoutePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Outcome of routing one newsletter request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "lowercase")]
pub enum RoutingDecision {
    /// Tier1 alone serves the request; no on-demand discovery.
    Fast { sources: Vec<Tier1Entry> },
    /// Partial Tier1 set; downstream augments uncovered interests.
    Hybrid {
        tier1_sources: Vec<Tier1Entry>,
        requested_interests: Vec<String>,
    },
}

impl RoutingDecision {
    pub fn path(&self) -> RoutePath {
        match self {
            Self::Fast { .. } => RoutePath::Fast,
            Self::Hybrid { .. } => RoutePath::Hybrid,
        }
    }

    pub fn sources(&self) -> &[Tier1Entry] {
        match self {
            Self::Fast { sources } => sources,
            Self::Hybrid { tier1_sources, .. } => tier1_sources,
        }
    }
}
