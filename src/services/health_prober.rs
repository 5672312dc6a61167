//! Liveness probing and health-record bookkeeping.
//!
//! Probes never raise: every collector error and every timeout is
//! classified into a [`ProbeErrorKind`] and returned as a failed result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{CandidateSource, HealthRecord, ProbeErrorKind, ProbeResult, SourceIdentity};
use crate::domain::ports::{Collectors, HealthRepository};

pub struct HealthProber {
    collectors: Collectors,
    health_repository: Arc<dyn HealthRepository>,
    probe_timeout: Duration,
    max_concurrent: usize,
}

impl HealthProber {
    pub fn new(
        collectors: Collectors,
        health_repository: Arc<dyn HealthRepository>,
        probe_timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            collectors,
            health_repository,
            probe_timeout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Probe one source through the collector for its type.
    pub async fn check_one(&self, identity: &SourceIdentity, url: Option<&str>) -> ProbeResult {
        let collector = self.collectors.for_type(identity.source_type);
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.probe_timeout, collector.probe(identity, url)).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = match outcome {
            Ok(Ok(report)) => ProbeResult::succeeded(identity.clone(), report.articles_found, elapsed_ms),
            Ok(Err(e)) => ProbeResult::failed(identity.clone(), ProbeErrorKind::classify(&e.to_string()), elapsed_ms),
            Err(_) => ProbeResult::failed(identity.clone(), ProbeErrorKind::Timeout, elapsed_ms),
        };

        debug!(
            identity = %identity,
            success = result.success,
            articles_found = result.articles_found,
            response_time_ms = result.response_time_ms,
            error_kind = result.error_kind.map(|k| k.as_str()),
            "probe finished"
        );
        result
    }

    /// Probe every candidate with bounded concurrency. Output order matches input.
    pub async fn check_bulk(&self, candidates: &[CandidateSource]) -> Vec<ProbeResult> {
        self.check_targets(candidates.iter().map(|c| (&c.identity, c.url.as_deref())))
            .await
    }

    /// Probe `(identity, url)` pairs with bounded concurrency, keeping order.
    pub async fn check_targets<'a, I>(&self, targets: I) -> Vec<ProbeResult>
    where
        I: IntoIterator<Item = (&'a SourceIdentity, Option<&'a str>)>,
    {
        stream::iter(targets)
            .map(|(identity, url)| self.check_one(identity, url))
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// Fold a probe result into the stored record, creating it on first probe.
    pub async fn update_health_record(
        &self,
        identity: &SourceIdentity,
        result: &ProbeResult,
    ) -> DomainResult<HealthRecord> {
        let now = Utc::now();
        let mut record = self
            .health_repository
            .get(identity)
            .await?
            .unwrap_or_else(|| HealthRecord::new(identity.clone(), now));

        record.apply(result, now);
        self.health_repository.upsert(&record).await?;
        Ok(record)
    }

    pub async fn health_record(&self, identity: &SourceIdentity) -> DomainResult<Option<HealthRecord>> {
        self.health_repository.get(identity).await
    }
}
