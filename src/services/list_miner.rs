//! Candidate mining from curated documents.
//!
//! Awesome-lists contribute feed links and subreddit mentions; subreddit
//! wiki pages contribute subreddit mentions only.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use futures::future::join_all;
use regex::Regex;
use tracing::{debug, warn};

use super::deduplicator::deduplicate;
use crate::domain::models::{CandidateMetadata, CandidateSource, CuratedList, ListKind, SourceIdentity, SourceType};
use crate::domain::ports::DocumentFetcher;

/// Channel name for subreddit wiki pages.
pub const WIKI_CHANNEL: &str = "reddit-wiki";

static FEED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+\.(?:xml|rss|atom|feed))\)").expect("valid regex")
});

static SUBREDDIT_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\br/([A-Za-z0-9_]{2,21})\b").expect("valid regex"));

/// What mining one interest produced.
#[derive(Debug, Default)]
pub struct MinedCandidates {
    pub candidates: Vec<CandidateSource>,
    pub failed_documents: usize,
}

pub struct ListMiner {
    fetcher: Arc<dyn DocumentFetcher>,
    lists: BTreeMap<String, Vec<CuratedList>>,
}

impl ListMiner {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, lists: BTreeMap<String, Vec<CuratedList>>) -> Self {
        Self { fetcher, lists }
    }

    /// Curated lists known for `interest`, matched ignoring case.
    pub fn lists_for(&self, interest: &str) -> &[CuratedList] {
        self.lists
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(interest))
            .map(|(_, lists)| lists.as_slice())
            .unwrap_or(&[])
    }

    /// Fetch and scan every list for `interest`. A document that cannot be
    /// fetched contributes nothing.
    pub async fn mine(&self, interest: &str) -> MinedCandidates {
        let lists = self.lists_for(interest);
        if lists.is_empty() {
            return MinedCandidates::default();
        }

        let fetched = join_all(lists.iter().map(|list| async move {
            (list, self.fetcher.fetch(&list.url).await)
        }))
        .await;

        let mut mined = MinedCandidates::default();
        let mut found = Vec::new();
        for (list, body) in fetched {
            match body {
                Ok(text) => {
                    let candidates = extract_candidates(&text, interest, list);
                    debug!(interest, list = %list.url, count = candidates.len(), "mined curated list");
                    found.extend(candidates);
                }
                Err(e) => {
                    warn!(interest, list = %list.url, error = %e, "curated list unavailable");
                    mined.failed_documents += 1;
                }
            }
        }

        mined.candidates = deduplicate(found);
        mined
    }
}

/// Name used as `discovered_via` for a curated list.
pub fn channel_name(list: &CuratedList) -> String {
    match list.kind {
        ListKind::Github => list
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("curated-list")
            .to_string(),
        ListKind::RedditWiki => WIKI_CHANNEL.to_string(),
    }
}

/// Scan one document according to its kind.
pub fn extract_candidates(text: &str, interest: &str, list: &CuratedList) -> Vec<CandidateSource> {
    let via = channel_name(list);
    let provenance = CandidateMetadata {
        list_url: Some(list.url.clone()),
        list_reputation: Some(list.reputation),
        ..Default::default()
    };

    let mut candidates = Vec::new();

    if list.kind == ListKind::Github {
        for caps in FEED_LINK.captures_iter(text) {
            let (title, feed_url) = (&caps[1], &caps[2]);
            match SourceIdentity::from_feed_url(feed_url) {
                Ok(identity) => candidates.push(
                    CandidateSource::new(identity, interest, via.as_str())
                        .with_url(feed_url)
                        .with_metadata(CandidateMetadata {
                            title: Some(title.to_string()),
                            ..provenance.clone()
                        }),
                ),
                Err(e) => warn!(feed_url, error = %e, "dropping feed link"),
            }
        }
    }

    for caps in SUBREDDIT_MENTION.captures_iter(text) {
        if let Ok(identity) = SourceIdentity::new(SourceType::Reddit, &caps[1]) {
            candidates.push(CandidateSource::new(identity, interest, via.as_str()).with_metadata(provenance.clone()));
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FetchError;
    use async_trait::async_trait;

    const AWESOME: &str = r"
# Awesome Rust
* [This Week in Rust](https://this-week-in-rust.org/rss.xml) - weekly news
* [Blog](https://blog.rust-lang.org/feed.xml)
* [Homepage](https://www.rust-lang.org/) - not a feed
* Discuss on r/rust or https://reddit.com/r/learnrust, your/friend is not a sub.
";

    struct FakeFetcher;

    #[async_trait]
    impl DocumentFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.contains("awesome-rust") {
                Ok(AWESOME.to_string())
            } else if url.contains("wiki") {
                Ok("See /r/rust_gamedev and r/rust for more.".to_string())
            } else {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            }
        }
    }

    fn github_list() -> CuratedList {
        CuratedList::github("https://github.com/rust-unofficial/awesome-rust", 5000)
    }

    #[test]
    fn test_extract_from_awesome_list() {
        let found = extract_candidates(AWESOME, "Rust", &github_list());

        let keys: Vec<_> = found.iter().map(|c| c.identity.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "rss:this_week_in_rust_org_rss_xml",
                "rss:blog_rust_lang_org_feed_xml",
                "reddit:rust",
                "reddit:learnrust",
            ]
        );
        assert_eq!(found[0].metadata.title.as_deref(), Some("This Week in Rust"));
        assert_eq!(found[0].url.as_deref(), Some("https://this-week-in-rust.org/rss.xml"));
        assert!(found.iter().all(|c| c.discovered_via.contains("awesome-rust")));
        assert!(found.iter().all(|c| c.metadata.list_reputation == Some(5000)));
    }

    #[test]
    fn test_wiki_ignores_feed_links() {
        let wiki = CuratedList::reddit_wiki("https://www.reddit.com/r/rust/wiki/index", 1000);
        let found = extract_candidates(AWESOME, "Rust", &wiki);
        assert!(found.iter().all(|c| c.identity.source_type == SourceType::Reddit));
        assert!(found.iter().all(|c| c.discovered_via.contains(WIKI_CHANNEL)));
    }

    #[tokio::test]
    async fn test_mine_merges_lists_and_counts_failures() {
        let lists = BTreeMap::from([(
            "Rust".to_string(),
            vec![
                github_list(),
                CuratedList::reddit_wiki("https://www.reddit.com/r/rust/wiki/index", 1000),
                CuratedList::github("https://github.com/nobody/missing", 5000),
            ],
        )]);
        let miner = ListMiner::new(Arc::new(FakeFetcher), lists);

        let mined = miner.mine("rust").await;

        assert_eq!(mined.failed_documents, 1);
        let rust = mined
            .candidates
            .iter()
            .find(|c| c.identity.to_string() == "reddit:rust")
            .unwrap();
        assert_eq!(rust.discovery_count(), 2);
        assert!(mined.candidates.iter().any(|c| c.identity.source_key == "rust_gamedev"));
    }

    #[tokio::test]
    async fn test_unknown_interest_yields_nothing() {
        let miner = ListMiner::new(Arc::new(FakeFetcher), BTreeMap::new());
        let mined = miner.mine("Knitting").await;
        assert!(mined.candidates.is_empty());
        assert_eq!(mined.failed_documents, 0);
    }
}
