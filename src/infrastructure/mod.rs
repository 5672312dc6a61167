//! Infrastructure layer module
//!
//! Ambient concerns shared by the binary and the composition root:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
