//! Discovery ledger persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{DiscoveryLedgerEntry, SourceIdentity};

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<DiscoveryLedgerEntry>>;

    async fn upsert(&self, entry: &DiscoveryLedgerEntry) -> DomainResult<()>;

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<()>;

    async fn list(&self) -> DomainResult<Vec<DiscoveryLedgerEntry>>;
}
