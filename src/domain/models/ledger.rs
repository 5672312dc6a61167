//! Discovery ledger: an audit trail of every candidate a run has seen.
//!
//! The ledger is never consulted for routing; Tier1 and the blacklist are
//! authoritative.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::SourceIdentity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryLedgerEntry {
    pub identity: SourceIdentity,
    pub url: Option<String>,
    /// First sighting
    pub discovered_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub discovered_via: BTreeSet<String>,
    /// Runs in which this source has been sighted
    pub discovery_count: u32,
    pub quality_score: Option<f64>,
    pub health_check_passed: Option<bool>,
    pub promoted: bool,
    pub interests: BTreeSet<String>,
}

/// One run's observation of a candidate, folded into the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSighting {
    pub identity: SourceIdentity,
    pub url: Option<String>,
    pub discovered_via: BTreeSet<String>,
    pub interests: BTreeSet<String>,
    pub quality_score: f64,
    pub health_check_passed: bool,
    pub promoted: bool,
}

impl DiscoveryLedgerEntry {
    /// Entry for a source sighted for the first time.
    pub fn first_sighting(sighting: LedgerSighting, now: DateTime<Utc>) -> Self {
        Self {
            identity: sighting.identity,
            url: sighting.url,
            discovered_at: now,
            last_seen_at: now,
            discovered_via: sighting.discovered_via,
            discovery_count: 1,
            quality_score: Some(sighting.quality_score),
            health_check_passed: Some(sighting.health_check_passed),
            promoted: sighting.promoted,
            interests: sighting.interests,
        }
    }

    /// Fold a repeat sighting: bump the count, union the sets, keep the
    /// latest score and health result. Promotion is sticky.
    pub fn record_sighting(&mut self, sighting: LedgerSighting, now: DateTime<Utc>) {
        self.discovery_count = self.discovery_count.saturating_add(1);
        self.last_seen_at = now;
        self.discovered_via.extend(sighting.discovered_via);
        self.interests.extend(sighting.interests);
        self.quality_score = Some(sighting.quality_score);
        self.health_check_passed = Some(sighting.health_check_passed);
        self.promoted = self.promoted || sighting.promoted;
        if sighting.url.is_some() {
            self.url = sighting.url;
        }
    }
}
