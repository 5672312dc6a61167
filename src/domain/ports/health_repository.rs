//! Health record persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{HealthRecord, SourceIdentity};

#[async_trait]
pub trait HealthRepository: Send + Sync {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<HealthRecord>>;

    async fn upsert(&self, record: &HealthRecord) -> DomainResult<()>;

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<()>;
}
