//! LLM-backed source suggester capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw suggestion, before type normalisation and the confidence floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Free-form type as the model wrote it
    pub source_type: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Subreddit name, feed URL or handle
    pub key_or_url: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Error)]
pub enum SuggesterError {
    #[error("suggester request failed: {0}")]
    Request(String),

    #[error("suggester returned HTTP {0}")]
    Status(u16),

    #[error("suggester disabled")]
    Disabled,
}

#[async_trait]
pub trait SourceSuggester: Send + Sync {
    async fn suggest(&self, interest: &str) -> Result<Vec<Suggestion>, SuggesterError>;
}
