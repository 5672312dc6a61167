//! SQLite implementation of the ContributionRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_datetime, parse_identity};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ContributionRecord, SourceIdentity};
use crate::domain::ports::ContributionRepository;

#[derive(Clone)]
pub struct SqliteContributionRepository {
    pool: SqlitePool,
}

impl SqliteContributionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContributionRepository for SqliteContributionRepository {
    async fn append(&self, records: &[ContributionRecord]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"INSERT INTO source_contributions (newsletter_id, source_type, source_key, articles_collected, articles_included, collected_at)
                   VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(record.newsletter_id)
            .bind(record.identity.source_type.as_str())
            .bind(&record.identity.source_key)
            .bind(i64::from(record.articles_collected))
            .bind(i64::from(record.articles_included))
            .bind(record.collected_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_for_newsletter(&self, newsletter_id: i64) -> DomainResult<Vec<ContributionRecord>> {
        let rows: Vec<ContributionRow> = sqlx::query_as(
            r#"SELECT newsletter_id, source_type, source_key, articles_collected, articles_included, collected_at
               FROM source_contributions WHERE newsletter_id = ? ORDER BY id"#,
        )
        .bind(newsletter_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_for_source(&self, identity: &SourceIdentity) -> DomainResult<Vec<ContributionRecord>> {
        let rows: Vec<ContributionRow> = sqlx::query_as(
            r#"SELECT newsletter_id, source_type, source_key, articles_collected, articles_included, collected_at
               FROM source_contributions WHERE source_type = ? AND source_key = ? ORDER BY id"#,
        )
        .bind(identity.source_type.as_str())
        .bind(&identity.source_key)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_for_newsletter(&self, newsletter_id: i64) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM source_contributions WHERE newsletter_id = ?")
            .bind(newsletter_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct ContributionRow {
    newsletter_id: i64,
    source_type: String,
    source_key: String,
    articles_collected: i64,
    articles_included: i64,
    collected_at: String,
}

impl TryFrom<ContributionRow> for ContributionRecord {
    type Error = DomainError;

    fn try_from(row: ContributionRow) -> Result<Self, Self::Error> {
        let count = |v: i64| u32::try_from(v).map_err(|e| DomainError::SerializationError(e.to_string()));

        Ok(ContributionRecord {
            newsletter_id: row.newsletter_id,
            identity: parse_identity(&row.source_type, row.source_key)?,
            articles_collected: count(row.articles_collected)?,
            articles_included: count(row.articles_included)?,
            collected_at: parse_datetime(&row.collected_at)?,
        })
    }
}
