pub mod blacklist;
pub mod config;
pub mod contribution;
pub mod coverage;
pub mod discovery;
pub mod health;
pub mod ledger;
pub mod quality;
pub mod source;
pub mod tier1;

pub use blacklist::{BlacklistEntry, BlacklistReason};
pub use config::{
    CollectorsConfig, Config, CuratedList, DatabaseConfig, DiscoveryConfig, ListKind,
    LoggingConfig, ResurrectionConfig, SuggesterConfig,
};
pub use contribution::{ContributionRecord, SourceYield};
pub use coverage::{CoverageReport, RoutePath, RoutingDecision};
pub use discovery::{DiscoveryStats, RunAnomaly, SweepStats};
pub use health::{HealthRecord, ProbeErrorKind, ProbeResult, UNHEALTHY_AFTER_FAILURES};
pub use ledger::{DiscoveryLedgerEntry, LedgerSighting};
pub use quality::QualitySignals;
pub use source::{feed_key, CandidateMetadata, CandidateSource, SourceIdentity, SourceType};
pub use tier1::{ActivityMetrics, Tier1Entry, Tier1Promotion};
