use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for the source registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Discovery run configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// LLM-backed source suggester
    #[serde(default)]
    pub suggester: SuggesterConfig,

    /// Per-type collectors used for probing
    #[serde(default)]
    pub collectors: CollectorsConfig,

    /// Blacklist resurrection policy
    #[serde(default)]
    pub resurrection: ResurrectionConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".source-registry/registry.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Number of days to retain logs
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_retention_days() -> u32 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_stdout: true,
            rotation: default_rotation(),
            retention_days: default_retention_days(),
        }
    }
}

/// Kind of curated document a list miner reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Markdown awesome-list
    Github,
    /// Subreddit wiki page
    RedditWiki,
}

/// A curated document mined for candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedList {
    pub url: String,
    pub kind: ListKind,
    /// Stars or subscribers, used as provenance signal
    #[serde(default)]
    pub reputation: u32,
}

impl CuratedList {
    pub fn github(url: impl Into<String>, reputation: u32) -> Self {
        Self {
            url: url.into(),
            kind: ListKind::Github,
            reputation,
        }
    }

    pub fn reddit_wiki(url: impl Into<String>, reputation: u32) -> Self {
        Self {
            url: url.into(),
            kind: ListKind::RedditWiki,
            reputation,
        }
    }
}

/// Discovery run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DiscoveryConfig {
    /// Overall timeout for one miner or suggester call
    #[serde(default = "default_channel_timeout_secs")]
    pub channel_timeout_secs: u64,

    /// Timeout for a single liveness probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,

    /// Interests chosen by users, merged with the built-in catalog
    #[serde(default)]
    pub user_interests: Vec<String>,

    /// Per-interest lists; an entry replaces the built-in lists for that interest
    #[serde(default)]
    pub curated_lists: BTreeMap<String, Vec<CuratedList>>,
}

const fn default_channel_timeout_secs() -> u64 {
    60
}

const fn default_probe_timeout_secs() -> u64 {
    15
}

const fn default_max_concurrent_probes() -> usize {
    16
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            channel_timeout_secs: default_channel_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            max_concurrent_probes: default_max_concurrent_probes(),
            user_interests: Vec::new(),
            curated_lists: BTreeMap::new(),
        }
    }
}

/// LLM suggester configuration (OpenAI-compatible chat endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SuggesterConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_suggester_api_url")]
    pub api_url: String,

    #[serde(default = "default_suggester_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_suggester_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token, usually supplied through the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_suggester_api_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_suggester_model() -> String {
    "llama3.1".to_string()
}

const fn default_temperature() -> f64 {
    0.3
}

const fn default_max_tokens() -> u32 {
    1500
}

const fn default_suggester_timeout_secs() -> u64 {
    45
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_suggester_api_url(),
            model: default_suggester_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_suggester_timeout_secs(),
            api_key: None,
        }
    }
}

/// HTTP collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CollectorsConfig {
    #[serde(default = "default_reddit_base_url")]
    pub reddit_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_reddit_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_user_agent() -> String {
    concat!("source-registry/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            reddit_base_url: default_reddit_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Resurrection policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResurrectionConfig {
    /// Minimum hours between two resurrection attempts for one source
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u64,
}

const fn default_cooldown_hours() -> u64 {
    24
}

impl Default for ResurrectionConfig {
    fn default() -> Self {
        Self {
            cooldown_hours: default_cooldown_hours(),
        }
    }
}
