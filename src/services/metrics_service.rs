//! Registry-wide counters for operators.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::BlacklistStore;
use crate::domain::errors::DomainResult;
use crate::domain::models::{BlacklistEntry, DiscoveryLedgerEntry, Tier1Entry};
use crate::domain::ports::{LedgerRepository, Tier1Repository};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tier1Metrics {
    pub total: usize,
    pub healthy: usize,
    pub by_type: BTreeMap<String, usize>,
    pub avg_quality_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlacklistMetrics {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_reason: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerMetrics {
    pub total: usize,
    pub promoted: usize,
    /// Percentage of ledger entries ever promoted
    pub promotion_rate: f64,
    /// Entries per discovery channel
    pub by_method: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistryMetrics {
    pub tier1: Tier1Metrics,
    pub blacklist: BlacklistMetrics,
    pub ledger: LedgerMetrics,
}

pub struct MetricsService {
    tier1: Arc<dyn Tier1Repository>,
    blacklist: Arc<BlacklistStore>,
    ledger: Arc<dyn LedgerRepository>,
}

impl MetricsService {
    pub fn new(
        tier1: Arc<dyn Tier1Repository>,
        blacklist: Arc<BlacklistStore>,
        ledger: Arc<dyn LedgerRepository>,
    ) -> Self {
        Self { tier1, blacklist, ledger }
    }

    pub async fn snapshot(&self) -> DomainResult<RegistryMetrics> {
        let (tier1, blacklist, ledger) =
            tokio::try_join!(self.tier1.list(false), self.blacklist.list(), self.ledger.list())?;

        Ok(RegistryMetrics {
            tier1: tier1_metrics(&tier1),
            blacklist: blacklist_metrics(&blacklist),
            ledger: ledger_metrics(&ledger),
        })
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn tier1_metrics(entries: &[Tier1Entry]) -> Tier1Metrics {
    let mut by_type = BTreeMap::new();
    for entry in entries {
        *by_type.entry(entry.identity.source_type.to_string()).or_insert(0) += 1;
    }

    let avg_quality_score = if entries.is_empty() {
        0.0
    } else {
        entries.iter().map(|e| e.quality_score).sum::<f64>() / entries.len() as f64
    };

    Tier1Metrics {
        total: entries.len(),
        healthy: entries.iter().filter(|e| e.is_healthy).count(),
        by_type,
        avg_quality_score,
    }
}

pub fn blacklist_metrics(entries: &[BlacklistEntry]) -> BlacklistMetrics {
    let mut metrics = BlacklistMetrics {
        total: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        *metrics.by_type.entry(entry.identity.source_type.to_string()).or_insert(0) += 1;
        *metrics.by_reason.entry(entry.reason.as_str().to_string()).or_insert(0) += 1;
    }
    metrics
}

#[allow(clippy::cast_precision_loss)]
pub fn ledger_metrics(entries: &[DiscoveryLedgerEntry]) -> LedgerMetrics {
    let promoted = entries.iter().filter(|e| e.promoted).count();
    let mut by_method = BTreeMap::new();
    for via in entries.iter().flat_map(|e| e.discovered_via.iter()) {
        *by_method.entry(via.clone()).or_insert(0) += 1;
    }

    LedgerMetrics {
        total: entries.len(),
        promoted,
        promotion_rate: if entries.is_empty() {
            0.0
        } else {
            promoted as f64 / entries.len() as f64 * 100.0
        },
        by_method,
    }
}
