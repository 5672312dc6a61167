//! OpenAI-compatible chat-completions suggester.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::build_client;
use crate::domain::models::SuggesterConfig;
use crate::domain::ports::{SourceSuggester, Suggestion, SuggesterError};

const SYSTEM_PROMPT: &str = "You are an expert source discovery assistant. \
You MUST respond ONLY with valid JSON. No other text, no explanations.";

fn build_prompt(interest: &str) -> String {
    format!(
        r#"Find the best sources (Reddit communities, RSS feeds, news sites) for the topic: {interest}

Return a JSON object with a "sources" array. Each source has:
- type: "reddit", "rss" or "website"
- name: human-readable name
- subreddit: for reddit, the bare name without r/
- url: for rss, the full feed URL
- confidence: 0.0-1.0, how sure you are the source is relevant and active
- reasoning: why the source is relevant

Only include high-quality, active sources. Return ONLY the JSON object.

Topic: {interest}"#
    )
}

pub struct HttpSuggester {
    client: reqwest::Client,
    config: SuggesterConfig,
}

impl HttpSuggester {
    pub fn new(config: SuggesterConfig) -> reqwest::Result<Self> {
        let client = build_client(
            concat!("source-registry/", env!("CARGO_PKG_VERSION")),
            Duration::from_secs(config.timeout_secs),
            true,
        )?;
        Ok(Self { client, config })
    }

    async fn complete(&self, interest: &str) -> Result<String, SuggesterError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(interest) }
            ]
        });

        let url = format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SuggesterError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SuggesterError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SuggesterError::Request(format!("invalid response body: {e}")))?;

        Ok(body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

#[async_trait]
impl SourceSuggester for HttpSuggester {
    async fn suggest(&self, interest: &str) -> Result<Vec<Suggestion>, SuggesterError> {
        if !self.config.enabled {
            return Err(SuggesterError::Disabled);
        }

        let text = self.complete(interest).await?;
        let suggestions = parse_suggestions(&text);
        tracing::debug!(interest, count = suggestions.len(), "suggester answered");
        Ok(suggestions)
    }
}

#[derive(Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    sources: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawSuggestion {
    #[serde(rename = "type", default)]
    source_type: String,
    name: Option<String>,
    subreddit: Option<String>,
    url: Option<String>,
    #[serde(default)]
    confidence: f64,
    reasoning: Option<String>,
}

impl RawSuggestion {
    fn into_suggestion(self) -> Option<Suggestion> {
        let key_or_url = self
            .url
            .filter(|s| !s.trim().is_empty())
            .or(self.subreddit.filter(|s| !s.trim().is_empty()))
            .or_else(|| self.name.clone())?;
        Some(Suggestion {
            source_type: self.source_type,
            name: self.name,
            key_or_url,
            confidence: self.confidence.clamp(0.0, 1.0),
            reasoning: self.reasoning,
        })
    }
}

/// Pull the `{"sources": [...]}` object out of a model reply, tolerating
/// code fences and surrounding prose. Anything unparsable yields nothing;
/// a malformed item is skipped without losing its siblings.
pub fn parse_suggestions(text: &str) -> Vec<Suggestion> {
    let Some(json) = extract_json_object(text) else {
        return Vec::new();
    };

    let payload: SuggestionPayload = match serde_json::from_str(json) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "unparsable suggester payload");
            return Vec::new();
        }
    };

    payload
        .sources
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawSuggestion>(item) {
            Ok(raw) => raw.into_suggestion(),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed suggestion");
                None
            }
        })
        .collect()
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const REPLY: &str = r#"{"sources":[
        {"type":"reddit","name":"r/rust","subreddit":"rust","confidence":0.95,"reasoning":"main community"},
        {"type":"rss","name":"This Week in Rust","url":"https://this-week-in-rust.org/rss.xml","confidence":0.8}
    ]}"#;

    #[test]
    fn test_parse_plain_json() {
        let suggestions = parse_suggestions(REPLY);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].key_or_url, "rust");
        assert_eq!(suggestions[1].key_or_url, "https://this-week-in-rust.org/rss.xml");
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let text = format!("Here you go:\n```json\n{REPLY}\n```\nEnjoy!");
        assert_eq!(parse_suggestions(&text).len(), 2);
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert!(parse_suggestions("no json here").is_empty());
        assert!(parse_suggestions("{ not valid }").is_empty());
    }

    #[test]
    fn test_malformed_item_keeps_siblings() {
        let text = r#"{"sources":[
            {"type":"reddit","subreddit":"rust","confidence":0.95},
            {"type":"rss","url":"https://blog.rust-lang.org/feed.xml","confidence":"high"},
            {"type":null,"subreddit":"golang","confidence":0.9},
            {"type":"reddit","name":42,"confidence":0.9}
        ]}"#;

        let suggestions = parse_suggestions(text);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].key_or_url, "rust");
        assert_eq!(suggestions[0].source_type, "reddit");
    }

    #[test]
    fn test_confidence_is_clamped() {
        let text = r#"{"sources":[
            {"type":"reddit","subreddit":"rust","confidence":5.0},
            {"type":"reddit","subreddit":"golang","confidence":-0.3}
        ]}"#;

        let suggestions = parse_suggestions(text);
        assert_eq!(suggestions.len(), 2);
        assert!((suggestions[0].confidence - 1.0).abs() < f64::EPSILON);
        assert!(suggestions[1].confidence.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_suggest_against_chat_endpoint() {
        let mut server = Server::new_async().await;
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": REPLY } }]
        });
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let suggester = HttpSuggester::new(SuggesterConfig {
            enabled: true,
            api_url: format!("{}/v1", server.url()),
            api_key: Some("secret".to_string()),
            ..Default::default()
        })
        .unwrap();

        let suggestions = suggester.suggest("Rust").await.unwrap();
        assert_eq!(suggestions.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_disabled_suggester_errors() {
        let suggester = HttpSuggester::new(SuggesterConfig::default()).unwrap();
        assert!(matches!(suggester.suggest("Rust").await, Err(SuggesterError::Disabled)));
    }
}
