//! HTTP adapters for the external capabilities.

pub mod collector;
pub mod fetcher;
pub mod static_collector;
pub mod suggester;

pub use collector::{RedditCollector, RssCollector};
pub use fetcher::HttpDocumentFetcher;
pub use static_collector::{StaticCollector, UnsupportedCollector};
pub use suggester::{parse_suggestions, HttpSuggester};

use std::time::Duration;

/// Shared client builder: fixed user agent and per-request timeout.
pub(crate) fn build_client(
    user_agent: &str,
    timeout: Duration,
    follow_redirects: bool,
) -> reqwest::Result<reqwest::Client> {
    let redirect = if follow_redirects {
        reqwest::redirect::Policy::limited(5)
    } else {
        reqwest::redirect::Policy::none()
    };

    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(redirect)
        .pool_max_idle_per_host(4)
        .build()
}
