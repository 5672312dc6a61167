//! Source identity and discovery candidates.
//!
//! A source is named by its [`SourceIdentity`], the join key shared by every
//! store. Candidates only live for the duration of one discovery run.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Kind of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Community forum (subreddit)
    Reddit,
    /// Syndication feed (RSS / Atom)
    Rss,
    /// Hacker News front page
    HackerNews,
    /// Social account
    Twitter,
}

impl SourceType {
    pub const ALL: [Self; 4] = [Self::Reddit, Self::Rss, Self::HackerNews, Self::Twitter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::Rss => "rss",
            Self::HackerNews => "hackernews",
            Self::Twitter => "twitter",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reddit" => Some(Self::Reddit),
            "rss" => Some(Self::Rss),
            "hackernews" => Some(Self::HackerNews),
            "twitter" => Some(Self::Twitter),
            _ => None,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable `(source_type, source_key)` pair naming a source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceIdentity {
    pub source_type: SourceType,
    pub source_key: String,
}

impl SourceIdentity {
    /// Build a normalized identity.
    ///
    /// Reddit keys lose any `r/` prefix and are lowercased; all keys are
    /// trimmed. An empty key is rejected.
    pub fn new(source_type: SourceType, source_key: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = source_key.as_ref().trim();
        let key = match source_type {
            SourceType::Reddit => trimmed
                .trim_start_matches('/')
                .trim_start_matches("r/")
                .trim_end_matches('/')
                .to_lowercase(),
            SourceType::Rss | SourceType::HackerNews | SourceType::Twitter => trimmed.to_string(),
        };

        if key.is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "empty source key for {source_type} source"
            )));
        }

        Ok(Self {
            source_type,
            source_key: key,
        })
    }

    /// Identity for a feed URL, shared by every discovery channel so that
    /// the same feed found twice merges into one candidate.
    pub fn from_feed_url(feed_url: &str) -> DomainResult<Self> {
        Self::new(SourceType::Rss, feed_key(feed_url)?)
    }

    /// Parse the `type:key` form used on the command line.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let (kind, key) = s
            .split_once(':')
            .ok_or_else(|| DomainError::ValidationFailed(format!("expected type:key, got '{s}'")))?;
        let source_type = SourceType::from_str(kind)
            .ok_or_else(|| DomainError::ValidationFailed(format!("unknown source type '{kind}'")))?;
        Self::new(source_type, key)
    }
}

impl fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_type, self.source_key)
    }
}

/// Host without `www.` plus the first path segment, with every
/// non-alphanumeric character folded to `_`.
pub fn feed_key(feed_url: &str) -> DomainResult<String> {
    let parsed = url::Url::parse(feed_url)
        .map_err(|e| DomainError::ValidationFailed(format!("invalid feed url '{feed_url}': {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| DomainError::ValidationFailed(format!("feed url has no host: {feed_url}")))?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    let first_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()));

    let raw = match first_segment {
        Some(segment) => format!("{host}_{segment}"),
        None => host.to_string(),
    };

    Ok(raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect())
}

/// Extra facts a channel learned about a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Curated document the candidate was mined from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_url: Option<String>,
    /// Reputation (stars, subscribers) of that curated document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_reputation: Option<u32>,
    /// Suggester confidence in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl CandidateMetadata {
    /// Fill gaps from another channel's view of the same source.
    ///
    /// Existing values win, except reputation and confidence which keep the
    /// strongest signal seen.
    pub fn merge(&mut self, other: Self) {
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.list_url.is_none() {
            self.list_url = other.list_url;
        }
        if self.reasoning.is_none() {
            self.reasoning = other.reasoning;
        }
        self.list_reputation = match (self.list_reputation, other.list_reputation) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.confidence = match (self.confidence, other.confidence) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
}

/// A source proposed by a discovery channel during one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSource {
    pub identity: SourceIdentity,
    pub url: Option<String>,
    pub interests: BTreeSet<String>,
    /// Channels that proposed this source
    pub discovered_via: BTreeSet<String>,
    pub metadata: CandidateMetadata,
}

impl CandidateSource {
    pub fn new(identity: SourceIdentity, interest: impl Into<String>, via: impl Into<String>) -> Self {
        Self {
            identity,
            url: None,
            interests: BTreeSet::from([interest.into()]),
            discovered_via: BTreeSet::from([via.into()]),
            metadata: CandidateMetadata::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, metadata: CandidateMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Number of distinct channels that found this source.
    pub fn discovery_count(&self) -> u32 {
        u32::try_from(self.discovered_via.len()).unwrap_or(u32::MAX)
    }

    /// Whether a curated list contributed this source.
    pub fn from_curated_list(&self) -> bool {
        self.metadata.list_url.is_some() || self.metadata.list_reputation.is_some()
    }
}
