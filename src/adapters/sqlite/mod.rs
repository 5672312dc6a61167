//! SQLite adapters for the five source registry stores.

pub mod blacklist_repository;
pub mod connection;
pub mod contribution_repository;
pub mod health_repository;
pub mod ledger_repository;
pub mod migrations;
pub mod tier1_repository;

pub use blacklist_repository::SqliteBlacklistRepository;
pub use connection::{create_pool, create_test_pool, database_url, ConnectionError, PoolConfig};
pub use contribution_repository::SqliteContributionRepository;
pub use health_repository::SqliteHealthRepository;
pub use ledger_repository::SqliteLedgerRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use tier1_repository::SqliteTier1Repository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{SourceIdentity, SourceType};

/// Rebuild an identity from its two key columns.
pub fn parse_identity(source_type: &str, source_key: String) -> DomainResult<SourceIdentity> {
    let source_type = SourceType::from_str(source_type)
        .ok_or_else(|| DomainError::SerializationError(format!("Invalid source type: {source_type}")))?;
    Ok(SourceIdentity {
        source_type,
        source_key,
    })
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an optional RFC3339 datetime string from a SQLite row field.
pub fn parse_optional_datetime(s: Option<String>) -> DomainResult<Option<DateTime<Utc>>> {
    s.map(|s| chrono::DateTime::parse_from_rfc3339(&s).map(|d| d.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse a JSON string from a SQLite row field, falling back to the type's default.
pub fn parse_json_or_default<T: serde::de::DeserializeOwned + Default>(s: Option<String>) -> DomainResult<T> {
    s.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|opt| opt.unwrap_or_default())
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Open (creating if needed) and migrate the database at `database_url`.
pub async fn initialize_database(database_url: &str, max_connections: u32) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, Some(PoolConfig::with_max_connections(max_connections))).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
