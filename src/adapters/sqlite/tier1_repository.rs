//! SQLite implementation of the Tier1Repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::{parse_datetime, parse_identity, parse_json_or_default, parse_optional_datetime};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{SourceIdentity, Tier1Entry};
use crate::domain::ports::Tier1Repository;

const TIER1_COLUMNS: &str = "source_type, source_key, url, description, interests, quality_score, discovered_at, discovered_via, is_healthy, last_check_at, activity";

#[derive(Clone)]
pub struct SqliteTier1Repository {
    pool: SqlitePool,
}

impl SqliteTier1Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Tier1Repository for SqliteTier1Repository {
    async fn get(&self, identity: &SourceIdentity) -> DomainResult<Option<Tier1Entry>> {
        let row: Option<Tier1Row> = sqlx::query_as(&format!(
            "SELECT {TIER1_COLUMNS} FROM tier1_sources WHERE source_type = ? AND source_key = ?"
        ))
        .bind(identity.source_type.as_str())
        .bind(&identity.source_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, entry: &Tier1Entry) -> DomainResult<()> {
        let interests_json = serde_json::to_string(&entry.interests)?;
        let via_json = serde_json::to_string(&entry.discovered_via)?;
        let activity_json = serde_json::to_string(&entry.activity)?;

        sqlx::query(
            r#"INSERT INTO tier1_sources (source_type, source_key, url, description, interests, quality_score, discovered_at, discovered_via, is_healthy, last_check_at, activity)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(source_type, source_key) DO UPDATE SET
                   url = excluded.url,
                   description = excluded.description,
                   interests = excluded.interests,
                   quality_score = excluded.quality_score,
                   discovered_at = excluded.discovered_at,
                   discovered_via = excluded.discovered_via,
                   is_healthy = excluded.is_healthy,
                   last_check_at = excluded.last_check_at,
                   activity = excluded.activity"#,
        )
        .bind(entry.identity.source_type.as_str())
        .bind(&entry.identity.source_key)
        .bind(&entry.url)
        .bind(&entry.description)
        .bind(&interests_json)
        .bind(entry.quality_score)
        .bind(entry.discovered_at.to_rfc3339())
        .bind(&via_json)
        .bind(entry.is_healthy)
        .bind(entry.last_check_at.map(|t| t.to_rfc3339()))
        .bind(&activity_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, identity: &SourceIdentity) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM tier1_sources WHERE source_type = ? AND source_key = ?")
            .bind(identity.source_type.as_str())
            .bind(&identity.source_key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SourceNotFound(identity.to_string()));
        }

        Ok(())
    }

    async fn list(&self, healthy_only: bool) -> DomainResult<Vec<Tier1Entry>> {
        let mut query = format!("SELECT {TIER1_COLUMNS} FROM tier1_sources");
        if healthy_only {
            query.push_str(" WHERE is_healthy = 1");
        }
        query.push_str(" ORDER BY quality_score DESC, source_type, source_key");

        let rows: Vec<Tier1Row> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_health(
        &self,
        identity: &SourceIdentity,
        is_healthy: bool,
        checked_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE tier1_sources SET is_healthy = ?, last_check_at = ? WHERE source_type = ? AND source_key = ?",
        )
        .bind(is_healthy)
        .bind(checked_at.to_rfc3339())
        .bind(identity.source_type.as_str())
        .bind(&identity.source_key)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct Tier1Row {
    source_type: String,
    source_key: String,
    url: Option<String>,
    description: Option<String>,
    interests: Option<String>,
    quality_score: f64,
    discovered_at: String,
    discovered_via: Option<String>,
    is_healthy: bool,
    last_check_at: Option<String>,
    activity: Option<String>,
}

impl TryFrom<Tier1Row> for Tier1Entry {
    type Error = DomainError;

    fn try_from(row: Tier1Row) -> Result<Self, Self::Error> {
        Ok(Tier1Entry {
            identity: parse_identity(&row.source_type, row.source_key)?,
            url: row.url,
            description: row.description,
            interests: parse_json_or_default(row.interests)?,
            quality_score: row.quality_score,
            discovered_at: parse_datetime(&row.discovered_at)?,
            discovered_via: parse_json_or_default(row.discovered_via)?,
            is_healthy: row.is_healthy,
            last_check_at: parse_optional_datetime(row.last_check_at)?,
            activity: parse_json_or_default(row.activity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::{ActivityMetrics, SourceType};
    use std::collections::BTreeSet;

    async fn setup_test_repo() -> SqliteTier1Repository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteTier1Repository::new(pool)
    }

    fn entry(key: &str, interests: &[&str], healthy: bool) -> Tier1Entry {
        Tier1Entry {
            identity: SourceIdentity::new(SourceType::Reddit, key).unwrap(),
            url: None,
            description: None,
            interests: interests.iter().map(|s| (*s).to_string()).collect(),
            quality_score: 0.9,
            discovered_at: Utc::now(),
            discovered_via: BTreeSet::from(["awesome-rust".to_string()]),
            is_healthy: healthy,
            last_check_at: None,
            activity: ActivityMetrics {
                avg_posts_per_day: Some(10.0),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = setup_test_repo().await;
        let e = entry("rust", &["Rust"], true);
        repo.upsert(&e).await.unwrap();

        let fetched = repo.get(&e.identity).await.unwrap().unwrap();
        assert_eq!(fetched.interests, e.interests);
        assert_eq!(fetched.activity.avg_posts_per_day, Some(10.0));
        assert!(fetched.is_healthy);
    }

    #[tokio::test]
    async fn test_list_healthy_only() {
        let repo = setup_test_repo().await;
        repo.upsert(&entry("rust", &["Rust"], true)).await.unwrap();
        repo.upsert(&entry("golang", &["Go"], false)).await.unwrap();

        assert_eq!(repo.list(false).await.unwrap().len(), 2);
        let healthy = repo.list(true).await.unwrap();
        assert_eq!(healthy.len(), 1);
        assert_eq!(healthy[0].identity.source_key, "rust");
    }

    #[tokio::test]
    async fn test_set_health_and_delete() {
        let repo = setup_test_repo().await;
        let e = entry("rust", &["Rust"], true);
        repo.upsert(&e).await.unwrap();

        assert!(repo.set_health(&e.identity, false, Utc::now()).await.unwrap());
        let fetched = repo.get(&e.identity).await.unwrap().unwrap();
        assert!(!fetched.is_healthy);
        assert!(fetched.last_check_at.is_some());

        repo.delete(&e.identity).await.unwrap();
        assert!(repo.get(&e.identity).await.unwrap().is_none());
        assert!(!repo.set_health(&e.identity, true, Utc::now()).await.unwrap());
        assert!(matches!(repo.delete(&e.identity).await, Err(DomainError::SourceNotFound(_))));
    }
}
