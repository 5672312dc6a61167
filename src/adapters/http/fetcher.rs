//! Curated document fetcher.

use async_trait::async_trait;
use std::time::Duration;

use super::build_client;
use crate::domain::ports::{DocumentFetcher, FetchError};

pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout, true)?,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/README.md")
            .with_status(200)
            .with_body("- [Blog](https://blog.example.com/feed.xml)")
            .create_async()
            .await;

        let fetcher = HttpDocumentFetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let body = fetcher.fetch(&format!("{}/README.md", server.url())).await.unwrap();

        assert!(body.contains("feed.xml"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/missing").with_status(404).create_async().await;

        let fetcher = HttpDocumentFetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;

        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }
}
