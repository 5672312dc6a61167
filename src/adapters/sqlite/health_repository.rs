//! SQLite implementation of the HealthRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_datetime, parse_identity, parse_optional_datetime};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{HealthRecord, ProbeErrorKind, SourceIdentity};
use crate::domain::ports::HealthRepository;

#[derive(Clone)]
pub struct SqliteHealthRepository {
    pool: SqlitePool,
}

impl SqliteHealthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthRepository for SqliteHealthRepository {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<HealthRecord>> {
        let row: Option<HealthRow> = sqlx::query_as(
            r#"SELECT source_type, source_key, last_check_at, last_success_at, last_failure_at,
                      consecutive_failures, consecutive_successes, is_healthy, failure_reason,
                      response_time_ms, articles_found
               FROM source_health WHERE source_type = ? AND source_key = ?"#,
        )
        .bind(identity.source_type.as_str())
        .bind(&identity.source_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, record: &HealthRecord) -> DomainResult<()> {
        let response_time_ms = record
            .response_time_ms
            .map(i64::try_from)
            .transpose()
            .map_err(|e| DomainError::ValidationFailed(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO source_health (source_type, source_key, last_check_at, last_success_at, last_failure_at,
                   consecutive_failures, consecutive_successes, is_healthy, failure_reason, response_time_ms, articles_found)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(source_type, source_key) DO UPDATE SET
                   last_check_at = excluded.last_check_at,
                   last_success_at = excluded.last_success_at,
                   last_failure_at = excluded.last_failure_at,
                   consecutive_failures = excluded.consecutive_failures,
                   consecutive_successes = excluded.consecutive_successes,
                   is_healthy = excluded.is_healthy,
                   failure_reason = excluded.failure_reason,
                   response_time_ms = excluded.response_time_ms,
                   articles_found = excluded.articles_found"#,
        )
        .bind(record.identity.source_type.as_str())
        .bind(&record.identity.source_key)
        .bind(record.last_check_at.to_rfc3339())
        .bind(record.last_success_at.map(|t| t.to_rfc3339()))
        .bind(record.last_failure_at.map(|t| t.to_rfc3339()))
        .bind(i64::from(record.consecutive_failures))
        .bind(i64::from(record.consecutive_successes))
        .bind(record.is_healthy)
        .bind(record.failure_reason.map(|k| k.as_str()))
        .bind(response_time_ms)
        .bind(record.articles_found.map(i64::from))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<()> {
        sqlx::query("DELETE FROM source_health WHERE source_type = ? AND source_key = ?")
            .bind(identity.source_type.as_str())
            .bind(&identity.source_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct HealthRow {
    source_type: String,
    source_key: String,
    last_check_at: String,
    last_success_at: Option<String>,
    last_failure_at: Option<String>,
    consecutive_failures: i64,
    consecutive_successes: i64,
    is_healthy: bool,
    failure_reason: Option<String>,
    response_time_ms: Option<i64>,
    articles_found: Option<i64>,
}

fn to_u32(value: i64) -> DomainResult<u32> {
    u32::try_from(value).map_err(|e| DomainError::SerializationError(e.to_string()))
}

impl TryFrom<HealthRow> for HealthRecord {
    type Error = DomainError;

    fn try_from(row: HealthRow) -> Result<Self, Self::Error> {
        let failure_reason = row
            .failure_reason
            .map(|s| {
                ProbeErrorKind::from_str(&s)
                    .ok_or_else(|| DomainError::SerializationError(format!("Invalid failure reason: {s}")))
            })
            .transpose()?;

        Ok(HealthRecord {
            identity: parse_identity(&row.source_type, row.source_key)?,
            last_check_at: parse_datetime(&row.last_check_at)?,
            last_success_at: parse_optional_datetime(row.last_success_at)?,
            last_failure_at: parse_optional_datetime(row.last_failure_at)?,
            consecutive_failures: to_u32(row.consecutive_failures)?,
            consecutive_successes: to_u32(row.consecutive_successes)?,
            is_healthy: row.is_healthy,
            failure_reason,
            response_time_ms: row
                .response_time_ms
                .map(u64::try_from)
                .transpose()
                .map_err(|e| DomainError::SerializationError(e.to_string()))?,
            articles_found: row.articles_found.map(to_u32).transpose()?,
        })
    }
}
