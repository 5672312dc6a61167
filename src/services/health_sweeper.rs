//! Periodic Tier1 health sweeps and blacklist resurrection.
//!
//! Discovery runs only update health records. The sweeper is what acts on
//! them: it blacklists Tier1 sources whose record has gone unhealthy and
//! lifts the veto from blacklisted sources that probe healthy again.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{info, instrument, warn};

use super::{BlacklistStore, HealthProber, Tier1Registry};
use crate::domain::models::{BlacklistReason, ProbeErrorKind, SweepStats};

pub struct HealthSweeper {
    prober: Arc<HealthProber>,
    tier1: Arc<Tier1Registry>,
    blacklist: Arc<BlacklistStore>,
    cooldown: ChronoDuration,
}

impl HealthSweeper {
    pub fn new(
        prober: Arc<HealthProber>,
        tier1: Arc<Tier1Registry>,
        blacklist: Arc<BlacklistStore>,
        cooldown: ChronoDuration,
    ) -> Self {
        Self {
            prober,
            tier1,
            blacklist,
            cooldown,
        }
    }

    /// Probe every non-blacklisted Tier1 entry and act on its health record.
    #[instrument(skip_all)]
    pub async fn sweep_tier1(&self) -> SweepStats {
        let mut stats = SweepStats::default();

        let (blocked, entries) = match (self.blacklist.blacklisted_identities().await, self.tier1.list(false).await) {
            (Ok(blocked), Ok(entries)) => (blocked, entries),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "stores unavailable, skipping tier1 sweep");
                stats.store_errors += 1;
                return stats;
            }
        };

        let (entries, vetoed): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| !blocked.contains(&e.identity));
        stats.skipped = vetoed.len();

        let results = self
            .prober
            .check_targets(entries.iter().map(|e| (&e.identity, e.url.as_deref())))
            .await;

        for (entry, result) in entries.iter().zip(&results) {
            stats.checked += 1;
            let record = match self.prober.update_health_record(&entry.identity, result).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(identity = %entry.identity, error = %e, "failed to update health record");
                    stats.store_errors += 1;
                    continue;
                }
            };

            if result.success {
                stats.healthy += 1;
                if !entry.is_healthy {
                    match self.tier1.mark_healthy(&entry.identity).await {
                        Ok(_) => {
                            stats.recovered += 1;
                            info!(identity = %entry.identity, "tier1 source recovered");
                        }
                        Err(e) => {
                            warn!(identity = %entry.identity, error = %e, "failed to mark healthy");
                            stats.store_errors += 1;
                        }
                    }
                }
                continue;
            }

            if record.is_healthy {
                continue;
            }

            if entry.is_healthy {
                stats.newly_unhealthy += 1;
            }
            if let Err(e) = self.tier1.mark_unhealthy(&entry.identity).await {
                warn!(identity = %entry.identity, error = %e, "failed to mark unhealthy");
                stats.store_errors += 1;
            }

            let reason = BlacklistReason::from(record.failure_reason.unwrap_or(ProbeErrorKind::Unknown));
            match self.blacklist.record_failure(&entry.identity, reason, entry.url.as_deref()).await {
                Ok(_) => stats.blacklisted += 1,
                Err(e) => {
                    warn!(identity = %entry.identity, error = %e, "failed to blacklist source");
                    stats.store_errors += 1;
                }
            }
        }

        info!(
            checked = stats.checked,
            healthy = stats.healthy,
            newly_unhealthy = stats.newly_unhealthy,
            blacklisted = stats.blacklisted,
            "tier1 sweep finished"
        );
        stats
    }

    /// Re-probe blacklisted sources whose last attempt is older than the
    /// cooldown, resurrecting the ones that answer.
    #[instrument(skip_all)]
    pub async fn attempt_resurrections(&self) -> SweepStats {
        let mut stats = SweepStats::default();

        let entries = match self.blacklist.list().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "blacklist unavailable, skipping resurrection pass");
                stats.store_errors += 1;
                return stats;
            }
        };

        let now = Utc::now();
        let (due, cooling): (Vec<_>, Vec<_>) = entries.into_iter().partition(|entry| {
            entry
                .last_resurrection_attempt_at
                .is_none_or(|attempted| now - attempted >= self.cooldown)
        });
        stats.skipped = cooling.len();

        for entry in due {
            let identity = &entry.identity;
            if let Err(e) = self.blacklist.mark_resurrection_attempt(identity).await {
                warn!(identity = %identity, error = %e, "failed to record resurrection attempt");
                stats.store_errors += 1;
                continue;
            }

            let result = self.prober.check_one(identity, entry.url.as_deref()).await;
            stats.checked += 1;
            if let Err(e) = self.prober.update_health_record(identity, &result).await {
                warn!(identity = %identity, error = %e, "failed to update health record");
                stats.store_errors += 1;
            }

            if !result.success {
                let reason = BlacklistReason::from(result.error_kind.unwrap_or(ProbeErrorKind::Unknown));
                if let Err(e) = self.blacklist.record_failure(identity, reason, entry.url.as_deref()).await {
                    warn!(identity = %identity, error = %e, "failed to record repeat failure");
                    stats.store_errors += 1;
                }
                continue;
            }

            stats.healthy += 1;
            match self.blacklist.resurrect(identity).await {
                Ok(true) => stats.resurrected += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(identity = %identity, error = %e, "failed to resurrect source");
                    stats.store_errors += 1;
                    continue;
                }
            }

            match self.tier1.mark_healthy(identity).await {
                Ok(true) => stats.recovered += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(identity = %identity, error = %e, "failed to mark healthy");
                    stats.store_errors += 1;
                }
            }
        }

        info!(
            checked = stats.checked,
            resurrected = stats.resurrected,
            skipped = stats.skipped,
            "resurrection pass finished"
        );
        stats
    }
}
