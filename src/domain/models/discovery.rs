//! Discovery run results.

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Something worth flagging about a run that still completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAnomaly {
    /// Every channel for every interest came back empty
    NoCandidates,
    /// The blacklist could not be read; the run stopped before probing
    StoreUnavailable,
}

/// Summary of one discovery run. Always produced, even when every channel
/// fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryStats {
    pub run_id: Uuid,
    /// Unique candidates after deduplication
    pub total_discovered: usize,
    pub healthy: usize,
    pub auto_promoted: usize,
    pub interests_processed: usize,
    pub channel_failures: usize,
    #[serde(serialize_with = "serialize_secs", deserialize_with = "deserialize_secs")]
    pub duration: Duration,
    pub anomaly: Option<RunAnomaly>,
}

impl DiscoveryStats {
    /// Zero-valued stats for a run that had nothing to do.
    pub fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            total_discovered: 0,
            healthy: 0,
            auto_promoted: 0,
            interests_processed: 0,
            channel_failures: 0,
            duration: Duration::ZERO,
            anomaly: None,
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

fn deserialize_secs<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

/// Summary of a Tier1 health sweep or resurrection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStats {
    pub checked: usize,
    pub healthy: usize,
    pub newly_unhealthy: usize,
    pub recovered: usize,
    pub blacklisted: usize,
    pub resurrected: usize,
    pub skipped: usize,
    pub store_errors: usize,
}
