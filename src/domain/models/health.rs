//! Probe results and the per-source health record.
//!
//! The record carries anti-flapping hysteresis: a source is only considered
//! unhealthy after [`UNHEALTHY_AFTER_FAILURES`] consecutive failed probes,
//! and healthy again on the first success.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::SourceIdentity;

/// Consecutive failures needed to flip a source unhealthy.
pub const UNHEALTHY_AFTER_FAILURES: u32 = 3;

/// Closed set of probe failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    NotFound,
    Forbidden,
    Redirect,
    Timeout,
    Unknown,
}

impl ProbeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Redirect => "redirect",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_found" => Some(Self::NotFound),
            "forbidden" => Some(Self::Forbidden),
            "redirect" => Some(Self::Redirect),
            "timeout" => Some(Self::Timeout),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Classify raw error text by case-insensitive substring match.
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("404") || lowered.contains("not found") {
            Self::NotFound
        } else if lowered.contains("403") || lowered.contains("forbidden") {
            Self::Forbidden
        } else if lowered.contains("redirect") {
            Self::Redirect
        } else if lowered.contains("timeout") || lowered.contains("timed out") {
            Self::Timeout
        } else {
            Self::Unknown
        }
    }
}

/// Outcome of one liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub identity: SourceIdentity,
    pub success: bool,
    pub articles_found: u32,
    pub response_time_ms: u64,
    pub error_kind: Option<ProbeErrorKind>,
}

impl ProbeResult {
    pub fn succeeded(identity: SourceIdentity, articles_found: u32, response_time_ms: u64) -> Self {
        Self {
            identity,
            success: true,
            articles_found,
            response_time_ms,
            error_kind: None,
        }
    }

    pub fn failed(identity: SourceIdentity, kind: ProbeErrorKind, response_time_ms: u64) -> Self {
        Self {
            identity,
            success: false,
            articles_found: 0,
            response_time_ms,
            error_kind: Some(kind),
        }
    }
}

/// Persisted liveness history of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub identity: SourceIdentity,
    pub last_check_at: DateTime<Utc>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub is_healthy: bool,
    pub failure_reason: Option<ProbeErrorKind>,
    pub response_time_ms: Option<u64>,
    pub articles_found: Option<u32>,
}

impl HealthRecord {
    /// Fresh record for a source that has never been probed.
    pub fn new(identity: SourceIdentity, now: DateTime<Utc>) -> Self {
        Self {
            identity,
            last_check_at: now,
            last_success_at: None,
            last_failure_at: None,
            consecutive_failures: 0,
            consecutive_successes: 0,
            is_healthy: true,
            failure_reason: None,
            response_time_ms: None,
            articles_found: None,
        }
    }

    /// Fold one probe result into the record.
    pub fn apply(&mut self, result: &ProbeResult, now: DateTime<Utc>) {
        self.last_check_at = now;
        self.response_time_ms = Some(result.response_time_ms);
        self.articles_found = Some(result.articles_found);

        if result.success {
            self.last_success_at = Some(now);
            self.consecutive_successes = self.consecutive_successes.saturating_add(1);
            self.consecutive_failures = 0;
            self.is_healthy = true;
            self.failure_reason = None;
        } else {
            self.last_failure_at = Some(now);
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            self.consecutive_successes = 0;
            self.failure_reason = Some(result.error_kind.unwrap_or(ProbeErrorKind::Unknown));
            if self.consecutive_failures >= UNHEALTHY_AFTER_FAILURES {
                self.is_healthy = false;
            }
        }
    }
}
