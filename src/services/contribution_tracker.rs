//! Per-run source yield bookkeeping.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{ContributionRecord, SourceIdentity, SourceYield};
use crate::domain::ports::ContributionRepository;

pub struct ContributionTracker {
    repository: Arc<dyn ContributionRepository>,
}

impl ContributionTracker {
    pub fn new(repository: Arc<dyn ContributionRepository>) -> Self {
        Self { repository }
    }

    /// Append one record per yield, all stamped with the call time.
    ///
    /// Not idempotent: calling twice for the same newsletter stores the rows twice.
    #[instrument(skip_all, fields(newsletter_id = newsletter_id, sources = yields.len()))]
    pub async fn record(&self, newsletter_id: i64, yields: Vec<SourceYield>) -> DomainResult<Vec<ContributionRecord>> {
        let now = Utc::now();
        let records: Vec<_> = yields
            .into_iter()
            .map(|y| ContributionRecord::new(newsletter_id, y, now))
            .collect();

        self.repository.append(&records).await?;
        debug!(count = records.len(), "contributions recorded");
        Ok(records)
    }

    pub async fn for_newsletter(&self, newsletter_id: i64) -> DomainResult<Vec<ContributionRecord>> {
        self.repository.list_for_newsletter(newsletter_id).await
    }

    pub async fn for_source(&self, identity: &SourceIdentity) -> DomainResult<Vec<ContributionRecord>> {
        self.repository.list_for_source(identity).await
    }
}
