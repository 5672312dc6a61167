//! Port trait definitions
//!
//! Async interfaces the services depend on:
//! - Five independently keyed stores: Tier1, Blacklist, Health, Ledger, Contribution
//! - External capabilities: per-type Collector, SourceSuggester, DocumentFetcher
//!
//! Adapters in `crate::adapters` implement these; tests substitute fakes.

pub mod blacklist_repository;
pub mod collector;
pub mod contribution_repository;
pub mod document_fetcher;
pub mod health_repository;
pub mod ledger_repository;
pub mod suggester;
pub mod tier1_repository;

pub use blacklist_repository::BlacklistRepository;
pub use collector::{Collector, CollectorError, Collectors, ProbeReport};
pub use contribution_repository::ContributionRepository;
pub use document_fetcher::{DocumentFetcher, FetchError};
pub use health_repository::HealthRepository;
pub use ledger_repository::LedgerRepository;
pub use suggester::{SourceSuggester, Suggestion, SuggesterError};
pub use tier1_repository::Tier1Repository;
