//! Service layer: discovery, scoring, registry and routing logic built on the
//! domain ports.

pub mod blacklist_service;
pub mod contribution_tracker;
pub mod coverage_router;
pub mod deduplicator;
pub mod discovery_orchestrator;
pub mod health_prober;
pub mod health_sweeper;
pub mod interest_catalog;
pub mod list_miner;
pub mod metrics_service;
pub mod quality_scorer;
pub mod search_suggester;
pub mod tier1_registry;

pub use blacklist_service::BlacklistStore;
pub use contribution_tracker::ContributionTracker;
pub use coverage_router::{CoverageRouter, COVERAGE_THRESHOLD};
pub use deduplicator::deduplicate;
pub use discovery_orchestrator::{DiscoveryOrchestrator, DiscoveryOrchestratorConfig};
pub use health_prober::HealthProber;
pub use health_sweeper::HealthSweeper;
pub use list_miner::{ListMiner, MinedCandidates};
pub use metrics_service::{MetricsService, RegistryMetrics};
pub use quality_scorer::{score, should_auto_add, PROMOTION_THRESHOLD};
pub use search_suggester::{SearchSuggester, CONFIDENCE_FLOOR};
pub use tier1_registry::Tier1Registry;
