//! Composition root.
//!
//! Builds exactly one instance of every repository and service per process
//! and wires them together. Tests call [`RegistryRuntime::assemble`] with
//! fake capabilities and an in-memory pool.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::adapters::http::{
    HttpDocumentFetcher, HttpSuggester, RedditCollector, RssCollector, StaticCollector, UnsupportedCollector,
};
use crate::adapters::sqlite::{
    database_url, initialize_database, SqliteBlacklistRepository, SqliteContributionRepository,
    SqliteHealthRepository, SqliteLedgerRepository, SqliteTier1Repository,
};
use crate::domain::models::Config;
use crate::domain::ports::{Collectors, DocumentFetcher, LedgerRepository, SourceSuggester, Tier1Repository};
use crate::services::interest_catalog::{curated_lists_with_overrides, predefined_interests};
use crate::services::{
    BlacklistStore, ContributionTracker, CoverageRouter, DiscoveryOrchestrator, DiscoveryOrchestratorConfig,
    HealthProber, HealthSweeper, ListMiner, MetricsService, SearchSuggester, Tier1Registry,
};

/// Articles the static Hacker News collector reports.
const HACKER_NEWS_FRONT_PAGE: u32 = 30;

/// External capabilities the services depend on.
#[derive(Clone)]
pub struct Capabilities {
    pub collectors: Collectors,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub suggester: Option<Arc<dyn SourceSuggester>>,
}

impl Capabilities {
    /// HTTP-backed capabilities built from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let collectors_config = &config.collectors;
        let timeout = Duration::from_secs(collectors_config.request_timeout_secs);
        let user_agent = collectors_config.user_agent.as_str();

        let collectors = Collectors {
            reddit: Arc::new(
                RedditCollector::new(collectors_config.reddit_base_url.clone(), user_agent, timeout)
                    .context("Failed to build reddit collector")?,
            ),
            rss: Arc::new(RssCollector::new(user_agent, timeout).context("Failed to build feed collector")?),
            hacker_news: Arc::new(StaticCollector::new(HACKER_NEWS_FRONT_PAGE)),
            twitter: Arc::new(UnsupportedCollector),
        };

        let fetcher: Arc<dyn DocumentFetcher> = Arc::new(
            HttpDocumentFetcher::new(user_agent, timeout).context("Failed to build document fetcher")?,
        );

        let suggester: Option<Arc<dyn SourceSuggester>> = if config.suggester.enabled {
            Some(Arc::new(
                HttpSuggester::new(config.suggester.clone()).context("Failed to build suggester client")?,
            ))
        } else {
            None
        };

        Ok(Self {
            collectors,
            fetcher,
            suggester,
        })
    }
}

/// Every service, shared process-wide.
pub struct RegistryRuntime {
    pub pool: SqlitePool,
    pub blacklist: Arc<BlacklistStore>,
    pub tier1: Arc<Tier1Registry>,
    pub prober: Arc<HealthProber>,
    pub orchestrator: Arc<DiscoveryOrchestrator>,
    pub router: Arc<CoverageRouter>,
    pub contributions: Arc<ContributionTracker>,
    pub sweeper: Arc<HealthSweeper>,
    pub metrics: Arc<MetricsService>,
    pub user_interests: Vec<String>,
}

impl RegistryRuntime {
    /// Open the configured database and build HTTP-backed services.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let url = database_url(&config.database.path);
        let pool = initialize_database(&url, config.database.max_connections)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;
        let capabilities = Capabilities::from_config(config)?;

        info!(database = %config.database.path, suggester = config.suggester.enabled, "runtime ready");
        Ok(Self::assemble(pool, capabilities, config))
    }

    /// Wire services over an already migrated pool.
    pub fn assemble(pool: SqlitePool, capabilities: Capabilities, config: &Config) -> Self {
        let tier1_repository: Arc<dyn Tier1Repository> = Arc::new(SqliteTier1Repository::new(pool.clone()));
        let ledger_repository: Arc<dyn LedgerRepository> = Arc::new(SqliteLedgerRepository::new(pool.clone()));

        let blacklist = Arc::new(BlacklistStore::new(Arc::new(SqliteBlacklistRepository::new(pool.clone()))));
        let tier1 = Arc::new(Tier1Registry::new(tier1_repository.clone(), blacklist.clone()));
        let prober = Arc::new(HealthProber::new(
            capabilities.collectors,
            Arc::new(SqliteHealthRepository::new(pool.clone())),
            Duration::from_secs(config.discovery.probe_timeout_secs),
            config.discovery.max_concurrent_probes,
        ));

        let miner = Arc::new(ListMiner::new(
            capabilities.fetcher,
            curated_lists_with_overrides(&config.discovery.curated_lists),
        ));
        let suggester = capabilities.suggester.map(|s| Arc::new(SearchSuggester::new(s)));

        let orchestrator = Arc::new(DiscoveryOrchestrator::new(
            miner,
            suggester,
            blacklist.clone(),
            prober.clone(),
            tier1.clone(),
            ledger_repository.clone(),
            DiscoveryOrchestratorConfig {
                channel_timeout: Duration::from_secs(config.discovery.channel_timeout_secs),
                catalog: predefined_interests(),
            },
        ));

        let cooldown_hours = i64::try_from(config.resurrection.cooldown_hours).unwrap_or(i64::MAX);
        let sweeper = Arc::new(HealthSweeper::new(
            prober.clone(),
            tier1.clone(),
            blacklist.clone(),
            chrono::Duration::try_hours(cooldown_hours).unwrap_or(chrono::Duration::MAX),
        ));

        Self {
            router: Arc::new(CoverageRouter::new(tier1.clone())),
            contributions: Arc::new(ContributionTracker::new(Arc::new(SqliteContributionRepository::new(
                pool.clone(),
            )))),
            metrics: Arc::new(MetricsService::new(tier1_repository, blacklist.clone(), ledger_repository)),
            pool,
            blacklist,
            tier1,
            prober,
            orchestrator,
            sweeper,
            user_interests: config.discovery.user_interests.clone(),
        }
    }
}
