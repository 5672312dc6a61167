//! Blacklist persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{BlacklistEntry, SourceIdentity};

#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<BlacklistEntry>>;

    async fn upsert(&self, entry: &BlacklistEntry) -> DomainResult<()>;

    /// Remove the entry. Returns whether a row was deleted.
    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<bool>;

    async fn list(&self) -> DomainResult<Vec<BlacklistEntry>>;
}
