//! CLI command implementations.

pub mod blacklist;
pub mod discover;
pub mod health;
pub mod metrics;
pub mod route;
pub mod tier1;
