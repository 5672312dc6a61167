//! Per-type collector capability, used for liveness probes.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::models::{SourceIdentity, SourceType};

/// What a probe saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub articles_found: u32,
}

/// Errors raised by a collector. The prober classifies these by their text.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request timeout")]
    Timeout,

    #[error("redirected to {0}")]
    Redirect(String),

    #[error("unsupported source type: {0}")]
    Unsupported(SourceType),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Collector: Send + Sync {
    /// Fetch the source once and count what it currently publishes.
    async fn probe(&self, identity: &SourceIdentity, url: Option<&str>) -> Result<ProbeReport, CollectorError>;
}

/// One collector per source type.
#[derive(Clone)]
pub struct Collectors {
    pub reddit: Arc<dyn Collector>,
    pub rss: Arc<dyn Collector>,
    pub hacker_news: Arc<dyn Collector>,
    pub twitter: Arc<dyn Collector>,
}

impl Collectors {
    /// The same collector for every type.
    pub fn uniform(collector: Arc<dyn Collector>) -> Self {
        Self {
            reddit: collector.clone(),
            rss: collector.clone(),
            hacker_news: collector.clone(),
            twitter: collector,
        }
    }

    pub fn for_type(&self, source_type: SourceType) -> &Arc<dyn Collector> {
        match source_type {
            SourceType::Reddit => &self.reddit,
            SourceType::Rss => &self.rss,
            SourceType::HackerNews => &self.hacker_news,
            SourceType::Twitter => &self.twitter,
        }
    }
}
