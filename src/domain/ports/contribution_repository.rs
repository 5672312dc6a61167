//! Contribution persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ContributionRecord, SourceIdentity};

/// Append-only store of per-run source yield.
#[async_trait]
pub trait ContributionRepository: Send + Sync {
    async fn append(&self, records: &[ContributionRecord]) -> DomainResult<()>;

    async fn list_for_newsletter(&self, newsletter_id: i64) -> DomainResult<Vec<ContributionRecord>>;

    async fn list_for_source(&self, identity: &SourceIdentity) -> DomainResult<Vec<ContributionRecord>>;

    /// Returns the number of rows removed.
    async fn delete_for_newsletter(&self, newsletter_id: i64) -> DomainResult<u64>;
}
