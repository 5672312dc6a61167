//! Tier1 registry persistence port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::{SourceIdentity, Tier1Entry};

/// Repository interface for Tier1 entries, keyed by identity.
#[async_trait]
pub trait Tier1Repository: Send + Sync {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<Tier1Entry>>;

    /// Insert or replace the row for `entry.identity`.
    async fn upsert(&self, entry: &Tier1Entry) -> DomainResult<()>;

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<()>;

    /// All entries, optionally only the healthy ones.
    async fn list(&self, healthy_only: bool) -> DomainResult<Vec<Tier1Entry>>;

    /// Set the health flag and check timestamp. Returns false when no such entry exists.
    async fn set_health(
        &self,
        identity: &SourceIdentity,
        is_healthy: bool,
        checked_at: DateTime<Utc>,
    ) -> DomainResult<bool>;
}
