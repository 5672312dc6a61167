//! Tier1 registry: the canonical store of trusted, interest-tagged sources.
//!
//! Every read used for consumption (interest queries, coverage) drops
//! blacklisted identities, so the blacklist is a hard veto over membership.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use super::blacklist_service::{retain_allowed, BlacklistStore};
use crate::domain::errors::DomainResult;
use crate::domain::models::{CoverageReport, SourceIdentity, Tier1Entry, Tier1Promotion};
use crate::domain::ports::Tier1Repository;

pub struct Tier1Registry {
    repository: Arc<dyn Tier1Repository>,
    blacklist: Arc<BlacklistStore>,
}

impl Tier1Registry {
    pub fn new(repository: Arc<dyn Tier1Repository>, blacklist: Arc<BlacklistStore>) -> Self {
        Self { repository, blacklist }
    }

    /// Insert a new entry or fold a promotion into the existing one.
    ///
    /// Interests are unioned, never replaced. Score and discovered_via are
    /// overwritten and the check timestamp refreshed. New entries start healthy.
    #[instrument(skip_all, fields(identity = %promotion.identity, score = promotion.quality_score))]
    pub async fn upsert(&self, promotion: Tier1Promotion) -> DomainResult<Tier1Entry> {
        let now = Utc::now();
        let entry = match self.repository.get(&promotion.identity).await? {
            Some(mut existing) => {
                existing.interests.extend(promotion.interests);
                existing.quality_score = promotion.quality_score;
                existing.discovered_via = promotion.discovered_via;
                existing.last_check_at = Some(now);
                if promotion.url.is_some() {
                    existing.url = promotion.url;
                }
                if promotion.description.is_some() {
                    existing.description = promotion.description;
                }
                existing.activity.absorb(&promotion.activity);
                existing
            }
            None => {
                info!("new tier1 source");
                Tier1Entry {
                    identity: promotion.identity,
                    url: promotion.url,
                    description: promotion.description,
                    interests: promotion.interests,
                    quality_score: promotion.quality_score,
                    discovered_at: now,
                    discovered_via: promotion.discovered_via,
                    is_healthy: true,
                    last_check_at: Some(now),
                    activity: promotion.activity,
                }
            }
        };

        self.repository.upsert(&entry).await?;
        Ok(entry)
    }

    pub async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<Tier1Entry>> {
        self.repository.get(identity).await
    }

    /// All entries, blacklisted ones included.
    pub async fn list(&self, healthy_only: bool) -> DomainResult<Vec<Tier1Entry>> {
        self.repository.list(healthy_only).await
    }

    /// Non-blacklisted entries listing any of `interests` (case-insensitive).
    pub async fn query_for_interests(&self, interests: &[String], healthy_only: bool) -> DomainResult<Vec<Tier1Entry>> {
        let blocked = self.blacklist.blacklisted_identities().await?;
        let entries = self.repository.list(healthy_only).await?;
        Ok(retain_allowed(entries, &blocked, |e| &e.identity)
            .into_iter()
            .filter(|entry| entry.covers_any(interests.iter()))
            .collect())
    }

    /// Which requested interests at least one healthy, non-blacklisted entry lists.
    pub async fn coverage(&self, interests: &[String]) -> DomainResult<CoverageReport> {
        let blocked = self.blacklist.blacklisted_identities().await?;
        let healthy = retain_allowed(self.repository.list(true).await?, &blocked, |e| &e.identity);
        Ok(coverage_of(&healthy, interests))
    }

    /// Explicit override, independent of probe hysteresis.
    pub async fn mark_unhealthy(&self, identity: &SourceIdentity) -> DomainResult<bool> {
        self.repository.set_health(identity, false, Utc::now()).await
    }

    /// Explicit override, independent of probe hysteresis.
    pub async fn mark_healthy(&self, identity: &SourceIdentity) -> DomainResult<bool> {
        self.repository.set_health(identity, true, Utc::now()).await
    }
}

/// Partition `interests` by whether any of `entries` lists them. Requested
/// interests are deduplicated case-insensitively, first spelling kept.
pub fn coverage_of(entries: &[Tier1Entry], interests: &[String]) -> CoverageReport {
    let mut seen = HashSet::new();
    let (covered, missing): (Vec<String>, Vec<String>) = interests
        .iter()
        .filter(|i| seen.insert(i.to_lowercase()))
        .cloned()
        .partition(|interest| entries.iter().any(|e| e.covers(interest)));

    CoverageReport::from_partition(covered, missing)
}
