//! Probing collectors for feeds and subreddits.
//!
//! Redirects are not followed: a moved or vanished source usually answers
//! with a redirect to a landing page, which the prober treats as failure.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Response, StatusCode};
use std::sync::LazyLock;
use std::time::Duration;

use super::build_client;
use crate::domain::models::{SourceIdentity, SourceType};
use crate::domain::ports::{Collector, CollectorError, ProbeReport};

static FEED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:item|entry)[\s>]").expect("valid regex"));

fn classify_send_error(e: &reqwest::Error) -> CollectorError {
    if e.is_timeout() {
        CollectorError::Timeout
    } else {
        CollectorError::Other(e.to_string())
    }
}

async fn check_status(response: Response) -> Result<Response, CollectorError> {
    let status = response.status();
    if status.is_redirection() {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown location")
            .to_string();
        return Err(CollectorError::Redirect(location));
    }
    if !status.is_success() {
        let message = status.canonical_reason().unwrap_or("request failed").to_string();
        return Err(CollectorError::Http {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

/// Count `<item>` and `<entry>` elements in a feed body.
pub fn count_feed_items(body: &str) -> u32 {
    u32::try_from(FEED_ITEM.find_iter(body).count()).unwrap_or(u32::MAX)
}

/// RSS / Atom collector. Needs the feed URL.
pub struct RssCollector {
    client: reqwest::Client,
}

impl RssCollector {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout, false)?,
        })
    }
}

#[async_trait]
impl Collector for RssCollector {
    async fn probe(&self, identity: &SourceIdentity, url: Option<&str>) -> Result<ProbeReport, CollectorError> {
        let url = url.ok_or_else(|| CollectorError::Other(format!("no feed url known for {identity}")))?;
        let response = self.client.get(url).send().await.map_err(|e| classify_send_error(&e))?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| classify_send_error(&e))?;

        Ok(ProbeReport {
            articles_found: count_feed_items(&body),
        })
    }
}

/// Subreddit collector using the public listing endpoint.
pub struct RedditCollector {
    client: reqwest::Client,
    base_url: String,
}

impl RedditCollector {
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout, false)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Collector for RedditCollector {
    async fn probe(&self, identity: &SourceIdentity, _url: Option<&str>) -> Result<ProbeReport, CollectorError> {
        if identity.source_type != SourceType::Reddit {
            return Err(CollectorError::Unsupported(identity.source_type));
        }

        let url = format!("{}/r/{}/new.json?limit=50", self.base_url, identity.source_key);
        let response = self.client.get(&url).send().await.map_err(|e| classify_send_error(&e))?;
        let listing: serde_json::Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CollectorError::Other(format!("invalid listing: {e}")))?;

        // Private and banned subreddits answer 200 with an error object.
        if let Some(code) = listing.get("error").and_then(serde_json::Value::as_u64) {
            let status = StatusCode::from_u16(u16::try_from(code).unwrap_or(500))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Err(CollectorError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            });
        }

        let children = listing["data"]["children"].as_array().map_or(0, Vec::len);
        Ok(ProbeReport {
            articles_found: u32::try_from(children).unwrap_or(u32::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_count_feed_items() {
        let rss = "<rss><channel><item><title>a</title></item><item>b</item></channel></rss>";
        let atom = r#"<feed><entry xml:lang="en">x</entry></feed>"#;
        assert_eq!(count_feed_items(rss), 2);
        assert_eq!(count_feed_items(atom), 1);
        assert_eq!(count_feed_items("<items/>"), 0);
    }

    #[tokio::test]
    async fn test_reddit_probe_counts_children() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/r/rust/new\.json".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"children":[{"kind":"t3"},{"kind":"t3"},{"kind":"t3"}]}}"#)
            .create_async()
            .await;

        let collector = RedditCollector::new(server.url(), "test-agent", Duration::from_secs(5)).unwrap();
        let identity = SourceIdentity::new(SourceType::Reddit, "rust").unwrap();
        let report = collector.probe(&identity, None).await.unwrap();

        assert_eq!(report.articles_found, 3);
    }

    #[tokio::test]
    async fn test_reddit_probe_reports_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/r/gone/new\.json".to_string()))
            .with_status(404)
            .create_async()
            .await;

        let collector = RedditCollector::new(server.url(), "test-agent", Duration::from_secs(5)).unwrap();
        let identity = SourceIdentity::new(SourceType::Reddit, "gone").unwrap();
        let err = collector.probe(&identity, None).await.unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_rss_probe_redirect_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/feed.xml")
            .with_status(301)
            .with_header("location", "/landing")
            .create_async()
            .await;

        let collector = RssCollector::new("test-agent", Duration::from_secs(5)).unwrap();
        let identity = SourceIdentity::new(SourceType::Rss, "moved").unwrap();
        let err = collector
            .probe(&identity, Some(&format!("{}/feed.xml", server.url())))
            .await
            .unwrap_err();

        assert!(matches!(err, CollectorError::Redirect(_)));
        assert!(err.to_string().contains("redirect"));
    }
}
