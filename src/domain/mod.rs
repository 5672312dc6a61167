//! Domain layer for the source registry
//!
//! Pure data types, state transitions, and the port traits that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
