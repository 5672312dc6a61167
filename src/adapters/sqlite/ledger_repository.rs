//! SQLite implementation of the LedgerRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_datetime, parse_identity, parse_json_or_default};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DiscoveryLedgerEntry, SourceIdentity};
use crate::domain::ports::LedgerRepository;

const LEDGER_COLUMNS: &str = "source_type, source_key, url, discovered_at, last_seen_at, discovered_via, discovery_count, quality_score, health_check_passed, promoted, interests";

#[derive(Clone)]
pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<DiscoveryLedgerEntry>> {
        let row: Option<LedgerRow> = sqlx::query_as(&format!(
            "SELECT {LEDGER_COLUMNS} FROM discovered_sources WHERE source_type = ? AND source_key = ?"
        ))
        .bind(identity.source_type.as_str())
        .bind(&identity.source_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, entry: &DiscoveryLedgerEntry) -> DomainResult<()> {
        let via_json = serde_json::to_string(&entry.discovered_via)?;
        let interests_json = serde_json::to_string(&entry.interests)?;

        sqlx::query(
            r#"INSERT INTO discovered_sources (source_type, source_key, url, discovered_at, last_seen_at, discovered_via, discovery_count, quality_score, health_check_passed, promoted, interests)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(source_type, source_key) DO UPDATE SET
                   url = excluded.url,
                   last_seen_at = excluded.last_seen_at,
                   discovered_via = excluded.discovered_via,
                   discovery_count = excluded.discovery_count,
                   quality_score = excluded.quality_score,
                   health_check_passed = excluded.health_check_passed,
                   promoted = excluded.promoted,
                   interests = excluded.interests"#,
        )
        .bind(entry.identity.source_type.as_str())
        .bind(&entry.identity.source_key)
        .bind(&entry.url)
        .bind(entry.discovered_at.to_rfc3339())
        .bind(entry.last_seen_at.to_rfc3339())
        .bind(&via_json)
        .bind(i64::from(entry.discovery_count))
        .bind(entry.quality_score)
        .bind(entry.health_check_passed)
        .bind(entry.promoted)
        .bind(&interests_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<()> {
        sqlx::query("DELETE FROM discovered_sources WHERE source_type = ? AND source_key = ?")
            .bind(identity.source_type.as_str())
            .bind(&identity.source_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> DomainResult<Vec<DiscoveryLedgerEntry>> {
        let rows: Vec<LedgerRow> = sqlx::query_as(&format!(
            "SELECT {LEDGER_COLUMNS} FROM discovered_sources ORDER BY last_seen_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct LedgerRow {
    source_type: String,
    source_key: String,
    url: Option<String>,
    discovered_at: String,
    last_seen_at: String,
    discovered_via: Option<String>,
    discovery_count: i64,
    quality_score: Option<f64>,
    health_check_passed: Option<bool>,
    promoted: bool,
    interests: Option<String>,
}

impl TryFrom<LedgerRow> for DiscoveryLedgerEntry {
    type Error = DomainError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        Ok(DiscoveryLedgerEntry {
            identity: parse_identity(&row.source_type, row.source_key)?,
            url: row.url,
            discovered_at: parse_datetime(&row.discovered_at)?,
            last_seen_at: parse_datetime(&row.last_seen_at)?,
            discovered_via: parse_json_or_default(row.discovered_via)?,
            discovery_count: u32::try_from(row.discovery_count)
                .map_err(|e| DomainError::SerializationError(e.to_string()))?,
            quality_score: row.quality_score,
            health_check_passed: row.health_check_passed,
            promoted: row.promoted,
            interests: parse_json_or_default(row.interests)?,
        })
    }
}
