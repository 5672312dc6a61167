use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid timeout for {0}: must be at least 1 second")]
    ZeroTimeout(&'static str),

    #[error("Invalid max_concurrent_probes: must be at least 1")]
    ZeroProbeConcurrency,

    #[error("Invalid suggester temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f64),

    #[error("Curated list for interest '{0}' has an empty url")]
    EmptyCuratedListUrl(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .source-registry/config.yaml
    /// 3. .source-registry/local.yaml (optional local overrides)
    /// 4. Environment variables (SOURCE_REGISTRY_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".source-registry/config.yaml"))
            .merge(Yaml::file(".source-registry/local.yaml"))
            .merge(Env::prefixed("SOURCE_REGISTRY_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring the environment
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("SOURCE_REGISTRY_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let timeouts = [
            ("discovery.channel_timeout_secs", config.discovery.channel_timeout_secs),
            ("discovery.probe_timeout_secs", config.discovery.probe_timeout_secs),
            ("suggester.timeout_secs", config.suggester.timeout_secs),
            ("collectors.request_timeout_secs", config.collectors.request_timeout_secs),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::ZeroTimeout(*name));
        }

        if config.discovery.max_concurrent_probes == 0 {
            return Err(ConfigError::ZeroProbeConcurrency);
        }

        if !(0.0..=2.0).contains(&config.suggester.temperature) {
            return Err(ConfigError::InvalidTemperature(config.suggester.temperature));
        }

        for (interest, lists) in &config.discovery.curated_lists {
            if lists.iter().any(|list| list.url.trim().is_empty()) {
                return Err(ConfigError::EmptyCuratedListUrl(interest.clone()));
            }
        }

        Ok(())
    }
}
