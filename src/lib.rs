//! Source Registry - self-updating, quality-graded registry of content sources
//!
//! Discovers candidate sources per interest through curated lists and an
//! LLM suggester, probes their liveness with hysteresis, scores them, and
//! promotes the best into a Tier1 registry that routes newsletter requests.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, state transitions and port traits
//! - **Adapters** (`adapters`): SQLite stores and HTTP capabilities
//! - **Service Layer** (`services`): discovery, scoring, registry and routing
//! - **Application Layer** (`application`): process-wide composition root
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use application::{Capabilities, RegistryRuntime};
pub use domain::models::{
    BlacklistEntry, BlacklistReason, CandidateSource, Config, CoverageReport, DiscoveryStats, HealthRecord,
    RoutingDecision, SourceIdentity, SourceType, Tier1Entry,
};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CoverageRouter, DiscoveryOrchestrator, Tier1Registry};
