//! Blacklist entries.
//!
//! Presence in the blacklist overrides Tier1 membership for every consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::health::ProbeErrorKind;
use super::source::SourceIdentity;

/// Why a source was blacklisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistReason {
    NotFound,
    Forbidden,
    Timeout,
    Redirect,
    Other,
}

impl BlacklistReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Timeout => "timeout",
            Self::Redirect => "redirect",
            Self::Other => "other",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_found" => Some(Self::NotFound),
            "forbidden" => Some(Self::Forbidden),
            "timeout" => Some(Self::Timeout),
            "redirect" => Some(Self::Redirect),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl From<ProbeErrorKind> for BlacklistReason {
    fn from(kind: ProbeErrorKind) -> Self {
        match kind {
            ProbeErrorKind::NotFound => Self::NotFound,
            ProbeErrorKind::Forbidden => Self::Forbidden,
            ProbeErrorKind::Redirect => Self::Redirect,
            ProbeErrorKind::Timeout => Self::Timeout,
            ProbeErrorKind::Unknown => Self::Other,
        }
    }
}

/// Failure bookkeeping for a vetoed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub identity: SourceIdentity,
    pub url: Option<String>,
    pub blacklisted_at: DateTime<Utc>,
    /// Latest failure reason
    pub reason: BlacklistReason,
    /// Always at least 1
    pub failure_count: u32,
    pub last_failure_at: DateTime<Utc>,
    pub last_resurrection_attempt_at: Option<DateTime<Utc>>,
}

impl BlacklistEntry {
    /// First failure for a source.
    pub fn new(identity: SourceIdentity, reason: BlacklistReason, url: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            identity,
            url,
            blacklisted_at: now,
            reason,
            failure_count: 1,
            last_failure_at: now,
            last_resurrection_attempt_at: None,
        }
    }

    /// Repeat failure: bump the count and overwrite reason and timestamp.
    pub fn record_repeat_failure(&mut self, reason: BlacklistReason, now: DateTime<Utc>) {
        self.failure_count = self.failure_count.saturating_add(1);
        self.reason = reason;
        self.last_failure_at = now;
    }
}
