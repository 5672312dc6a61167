//! Blacklist store: failure bookkeeping and the veto gate.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{BlacklistEntry, BlacklistReason, CandidateSource, SourceIdentity};
use crate::domain::ports::BlacklistRepository;

pub struct BlacklistStore {
    repository: Arc<dyn BlacklistRepository>,
}

impl BlacklistStore {
    pub fn new(repository: Arc<dyn BlacklistRepository>) -> Self {
        Self { repository }
    }

    /// Record a failure, creating the entry on first failure.
    #[instrument(skip_all, fields(identity = %identity, reason = reason.as_str()))]
    pub async fn record_failure(
        &self,
        identity: &SourceIdentity,
        reason: BlacklistReason,
        url: Option<&str>,
    ) -> DomainResult<BlacklistEntry> {
        let now = Utc::now();
        let entry = match self.repository.get(identity).await? {
            Some(mut existing) => {
                existing.record_repeat_failure(reason, now);
                if existing.url.is_none() {
                    existing.url = url.map(str::to_string);
                }
                existing
            }
            None => {
                warn!("blacklisting source");
                BlacklistEntry::new(identity.clone(), reason, url.map(str::to_string), now)
            }
        };

        self.repository.upsert(&entry).await?;
        Ok(entry)
    }

    pub async fn is_blacklisted(&self, identity: &SourceIdentity) -> DomainResult<bool> {
        Ok(self.repository.get(identity).await?.is_some())
    }

    pub async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<BlacklistEntry>> {
        self.repository.get(identity).await
    }

    /// Every blacklisted identity, loaded once.
    pub async fn blacklisted_identities(&self) -> DomainResult<HashSet<SourceIdentity>> {
        Ok(self
            .repository
            .list()
            .await?
            .into_iter()
            .map(|entry| entry.identity)
            .collect())
    }

    /// Drop blacklisted candidates, preserving order.
    pub async fn filter(&self, candidates: Vec<CandidateSource>) -> DomainResult<Vec<CandidateSource>> {
        let blocked = self.blacklisted_identities().await?;
        Ok(retain_allowed(candidates, &blocked, |c| &c.identity))
    }

    /// Note a resurrection attempt without lifting the veto. Returns false
    /// when the identity is not blacklisted.
    pub async fn mark_resurrection_attempt(&self, identity: &SourceIdentity) -> DomainResult<bool> {
        let Some(mut entry) = self.repository.get(identity).await? else {
            return Ok(false);
        };
        entry.last_resurrection_attempt_at = Some(Utc::now());
        self.repository.upsert(&entry).await?;
        Ok(true)
    }

    /// Lift the veto. Call only after a confirmed healthy probe.
    #[instrument(skip_all, fields(identity = %identity))]
    pub async fn resurrect(&self, identity: &SourceIdentity) -> DomainResult<bool> {
        let removed = self.repository.delete(identity).await?;
        if removed {
            info!("source resurrected");
        }
        Ok(removed)
    }

    pub async fn list(&self) -> DomainResult<Vec<BlacklistEntry>> {
        self.repository.list().await
    }
}

/// Keep the items whose identity is not in `blocked`, in input order.
pub fn retain_allowed<T>(
    items: Vec<T>,
    blocked: &HashSet<SourceIdentity>,
    identity_of: impl Fn(&T) -> &SourceIdentity,
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| !blocked.contains(identity_of(item)))
        .collect()
}
