//! Turns LLM suggestions into discovery candidates.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CandidateMetadata, CandidateSource, SourceIdentity, SourceType};
use crate::domain::ports::{SourceSuggester, Suggestion, SuggesterError};

/// Suggestions below this confidence are discarded.
pub const CONFIDENCE_FLOOR: f64 = 0.6;

/// Channel name recorded in `discovered_via`.
pub const SEARCH_CHANNEL: &str = "llm-search";

static SUBREDDIT_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/r/([A-Za-z0-9_]+)").expect("valid regex"));

pub struct SearchSuggester {
    suggester: Arc<dyn SourceSuggester>,
}

impl SearchSuggester {
    pub fn new(suggester: Arc<dyn SourceSuggester>) -> Self {
        Self { suggester }
    }

    /// Ask the suggester about `interest` and keep the confident, well-formed answers.
    pub async fn suggest(&self, interest: &str) -> Result<Vec<CandidateSource>, SuggesterError> {
        let suggestions = self.suggester.suggest(interest).await?;
        let total = suggestions.len();

        let candidates: Vec<_> = suggestions
            .into_iter()
            .filter(|s| s.confidence >= CONFIDENCE_FLOOR)
            .filter_map(|s| match to_candidate(s, interest) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    warn!(interest, error = %e, "dropping invalid suggestion");
                    None
                }
            })
            .collect();

        debug!(interest, total, kept = candidates.len(), "suggestions converted");
        Ok(candidates)
    }
}

/// Map the model's free-form type onto a source type. Unknown types are
/// assumed to be feeds.
pub fn normalize_type(raw: &str) -> SourceType {
    match raw.trim().to_lowercase().as_str() {
        "reddit" | "subreddit" => SourceType::Reddit,
        "twitter" | "x" => SourceType::Twitter,
        "hackernews" | "hn" => SourceType::HackerNews,
        _ => SourceType::Rss,
    }
}

fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Build a candidate from one suggestion.
pub fn to_candidate(suggestion: Suggestion, interest: &str) -> DomainResult<CandidateSource> {
    let source_type = normalize_type(&suggestion.source_type);
    let raw = suggestion.key_or_url.trim();

    let (identity, url) = match source_type {
        SourceType::Reddit => {
            let key = SUBREDDIT_IN_URL
                .captures(raw)
                .map_or(raw, |caps| caps.get(1).map_or(raw, |m| m.as_str()));
            (SourceIdentity::new(SourceType::Reddit, key)?, None)
        }
        SourceType::Rss => {
            if !looks_like_url(raw) {
                return Err(DomainError::ValidationFailed(format!(
                    "feed suggestion without url: '{raw}'"
                )));
            }
            (SourceIdentity::from_feed_url(raw)?, Some(raw.to_string()))
        }
        SourceType::Twitter => {
            let handle = if looks_like_url(raw) {
                raw.trim_end_matches('/').rsplit('/').next().unwrap_or(raw)
            } else {
                raw
            };
            (SourceIdentity::new(SourceType::Twitter, handle.trim_start_matches('@'))?, None)
        }
        SourceType::HackerNews => (SourceIdentity::new(SourceType::HackerNews, raw)?, None),
    };

    let mut candidate = CandidateSource::new(identity, interest, SEARCH_CHANNEL).with_metadata(CandidateMetadata {
        title: suggestion.name,
        confidence: Some(suggestion.confidence),
        reasoning: suggestion.reasoning,
        ..Default::default()
    });
    candidate.url = url;
    Ok(candidate)
}
