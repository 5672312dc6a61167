//! Collectors that answer without network access.

use async_trait::async_trait;

use crate::domain::models::SourceIdentity;
use crate::domain::ports::{Collector, CollectorError, ProbeReport};

/// Always reports the source alive with a fixed article count.
pub struct StaticCollector {
    articles_found: u32,
}

impl StaticCollector {
    pub fn new(articles_found: u32) -> Self {
        Self { articles_found }
    }
}

#[async_trait]
impl Collector for StaticCollector {
    async fn probe(&self, _identity: &SourceIdentity, _url: Option<&str>) -> Result<ProbeReport, CollectorError> {
        Ok(ProbeReport {
            articles_found: self.articles_found,
        })
    }
}

/// For source types with no collector yet; every probe fails.
pub struct UnsupportedCollector;

#[async_trait]
impl Collector for UnsupportedCollector {
    async fn probe(&self, identity: &SourceIdentity, _url: Option<&str>) -> Result<ProbeReport, CollectorError> {
        Err(CollectorError::Unsupported(identity.source_type))
    }
}
