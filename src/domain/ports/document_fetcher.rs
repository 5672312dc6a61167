//! Fetches curated documents for the list miner.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Body of the document at `url` as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
