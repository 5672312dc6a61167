//! Shared fakes and fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use source_registry::adapters::sqlite::create_migrated_test_pool;
use source_registry::domain::models::{Config, CuratedList, SourceIdentity};
use source_registry::domain::ports::{
    Collector, CollectorError, Collectors, DocumentFetcher, FetchError, ProbeReport, SourceSuggester, Suggestion,
    SuggesterError,
};
use source_registry::{Capabilities, RegistryRuntime};

/// Setup test logging
///
/// Call at the start of a test to see service logs with `--nocapture`.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Collects the fields each new span was opened with, keyed by span name.
#[derive(Clone, Default)]
pub struct SpanFields(Arc<Mutex<Vec<(String, String, String)>>>);

impl SpanFields {
    /// Value recorded for `field` on the first span called `span`.
    pub fn get(&self, span: &str, field: &str) -> Option<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|(s, f, _)| s == span && f == field)
            .map(|(_, _, v)| v.clone())
    }
}

struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanFields {
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut fields = Vec::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        let name = attrs.metadata().name().to_string();
        self.0
            .lock()
            .unwrap()
            .extend(fields.into_iter().map(|(f, v)| (name.clone(), f, v)));
    }
}

/// Serves canned documents; unknown URLs answer 404.
#[derive(Default)]
pub struct FakeFetcher {
    documents: HashMap<String, String>,
}

impl FakeFetcher {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl DocumentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.documents.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Probe outcome keyed by source key; unknown keys report `default_articles`.
pub struct ScriptedCollector {
    default_articles: u32,
    articles: Mutex<HashMap<String, u32>>,
    failures: Mutex<HashMap<String, u16>>,
}

impl ScriptedCollector {
    pub fn new(default_articles: u32) -> Self {
        Self {
            default_articles,
            articles: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn articles(&self, key: &str, count: u32) {
        self.articles.lock().unwrap().insert(key.to_string(), count);
    }

    pub fn fail(&self, key: &str, status: u16) {
        self.failures.lock().unwrap().insert(key.to_string(), status);
    }

    pub fn recover(&self, key: &str) {
        self.failures.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl Collector for ScriptedCollector {
    async fn probe(&self, identity: &SourceIdentity, _url: Option<&str>) -> Result<ProbeReport, CollectorError> {
        if let Some(status) = self.failures.lock().unwrap().get(&identity.source_key) {
            return Err(CollectorError::Http {
                status: *status,
                message: "scripted failure".to_string(),
            });
        }
        let articles_found = self
            .articles
            .lock()
            .unwrap()
            .get(&identity.source_key)
            .copied()
            .unwrap_or(self.default_articles);
        Ok(ProbeReport { articles_found })
    }
}

/// Returns fixed suggestions and counts calls.
#[derive(Default)]
pub struct CountingSuggester {
    pub suggestions: Vec<Suggestion>,
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingSuggester {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceSuggester for CountingSuggester {
    async fn suggest(&self, _interest: &str) -> Result<Vec<Suggestion>, SuggesterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SuggesterError::Status(503));
        }
        Ok(self.suggestions.clone())
    }
}

/// Never answers within any reasonable timeout.
pub struct StalledSuggester;

#[async_trait]
impl SourceSuggester for StalledSuggester {
    async fn suggest(&self, _interest: &str) -> Result<Vec<Suggestion>, SuggesterError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

pub fn suggestion(source_type: &str, key_or_url: &str, confidence: f64) -> Suggestion {
    Suggestion {
        source_type: source_type.to_string(),
        name: None,
        key_or_url: key_or_url.to_string(),
        confidence,
        reasoning: Some("on topic".to_string()),
    }
}

pub const AWESOME_RUST: &str = "https://github.com/acme/awesome-rust";
pub const RUST_WIKI: &str = "https://www.reddit.com/r/rust/wiki/index";

/// Config whose only curated lists are the given ones for "Rust".
pub fn config_with_rust_lists(lists: Vec<CuratedList>) -> Config {
    let mut config = Config::default();
    config.discovery.curated_lists = BTreeMap::from([("Rust".to_string(), lists)]);
    config.discovery.probe_timeout_secs = 1;
    config.discovery.channel_timeout_secs = 1;
    config
}

/// Runtime over an in-memory database and the given fakes.
pub async fn runtime_with(
    fetcher: FakeFetcher,
    collector: Arc<ScriptedCollector>,
    suggester: Option<Arc<dyn SourceSuggester>>,
    config: &Config,
) -> RegistryRuntime {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let capabilities = Capabilities {
        collectors: Collectors::uniform(collector),
        fetcher: Arc::new(fetcher),
        suggester,
    };
    RegistryRuntime::assemble(pool, capabilities, config)
}
