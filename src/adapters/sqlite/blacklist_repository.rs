//! SQLite implementation of the BlacklistRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_datetime, parse_identity, parse_optional_datetime};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BlacklistEntry, BlacklistReason, SourceIdentity};
use crate::domain::ports::BlacklistRepository;

const BLACKLIST_COLUMNS: &str = "source_type, source_key, url, blacklisted_at, reason, failure_count, last_failure_at, last_resurrection_attempt_at";

#[derive(Clone)]
pub struct SqliteBlacklistRepository {
    pool: SqlitePool,
}

impl SqliteBlacklistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistRepository for SqliteBlacklistRepository {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<BlacklistEntry>> {
        let row: Option<BlacklistRow> = sqlx::query_as(&format!(
            "SELECT {BLACKLIST_COLUMNS} FROM source_blacklist WHERE source_type = ? AND source_key = ?"
        ))
        .bind(identity.source_type.as_str())
        .bind(&identity.source_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, entry: &BlacklistEntry) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO source_blacklist (source_type, source_key, url, blacklisted_at, reason, failure_count, last_failure_at, last_resurrection_attempt_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(source_type, source_key) DO UPDATE SET
                   url = excluded.url,
                   blacklisted_at = excluded.blacklisted_at,
                   reason = excluded.reason,
                   failure_count = excluded.failure_count,
                   last_failure_at = excluded.last_failure_at,
                   last_resurrection_attempt_at = excluded.last_resurrection_attempt_at"#,
        )
        .bind(entry.identity.source_type.as_str())
        .bind(&entry.identity.source_key)
        .bind(&entry.url)
        .bind(entry.blacklisted_at.to_rfc3339())
        .bind(entry.reason.as_str())
        .bind(i64::from(entry.failure_count))
        .bind(entry.last_failure_at.to_rfc3339())
        .bind(entry.last_resurrection_attempt_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM source_blacklist WHERE source_type = ? AND source_key = ?")
            .bind(identity.source_type.as_str())
            .bind(&identity.source_key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> DomainResult<Vec<BlacklistEntry>> {
        let rows: Vec<BlacklistRow> = sqlx::query_as(&format!(
            "SELECT {BLACKLIST_COLUMNS} FROM source_blacklist ORDER BY last_failure_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct BlacklistRow {
    source_type: String,
    source_key: String,
    url: Option<String>,
    blacklisted_at: String,
    reason: String,
    failure_count: i64,
    last_failure_at: String,
    last_resurrection_attempt_at: Option<String>,
}

impl TryFrom<BlacklistRow> for BlacklistEntry {
    type Error = DomainError;

    fn try_from(row: BlacklistRow) -> Result<Self, Self::Error> {
        let reason = BlacklistReason::from_str(&row.reason)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid blacklist reason: {}", row.reason)))?;
        let failure_count = u32::try_from(row.failure_count)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        Ok(BlacklistEntry {
            identity: parse_identity(&row.source_type, row.source_key)?,
            url: row.url,
            blacklisted_at: parse_datetime(&row.blacklisted_at)?,
            reason,
            failure_count,
            last_failure_at: parse_datetime(&row.last_failure_at)?,
            last_resurrection_attempt_at: parse_optional_datetime(row.last_resurrection_attempt_at)?,
        })
    }
}
