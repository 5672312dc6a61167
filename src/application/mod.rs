//! Application layer: process-wide wiring of services.

pub mod runtime;

pub use runtime::{Capabilities, RegistryRuntime};
