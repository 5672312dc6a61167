//! Generation-time routing between the fast and hybrid paths.

use std::sync::Arc;

use tracing::{info, instrument};

use super::Tier1Registry;
use crate::domain::errors::DomainResult;
use crate::domain::models::RoutingDecision;

/// Coverage percentage at or above which Tier1 alone serves a request.
pub const COVERAGE_THRESHOLD: f64 = 90.0;

pub struct CoverageRouter {
    tier1: Arc<Tier1Registry>,
}

impl CoverageRouter {
    pub fn new(tier1: Arc<Tier1Registry>) -> Self {
        Self { tier1 }
    }

    /// Decide how a newsletter request for `interests` is sourced.
    ///
    /// Blacklisted identities never appear in either path.
    #[instrument(skip_all, fields(newsletter_id = newsletter_id, interests = interests.len()))]
    pub async fn route(&self, interests: &[String], newsletter_id: i64) -> DomainResult<RoutingDecision> {
        let coverage = self.tier1.coverage(interests).await?;
        let sources = self.tier1.query_for_interests(interests, true).await?;

        let decision = if coverage.coverage_percentage >= COVERAGE_THRESHOLD {
            RoutingDecision::Fast { sources }
        } else {
            RoutingDecision::Hybrid {
                tier1_sources: sources,
                requested_interests: interests.to_vec(),
            }
        };

        info!(
            path = decision.path().as_str(),
            coverage = coverage.coverage_percentage,
            missing = ?coverage.missing,
            sources = decision.sources().len(),
            "request routed"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteBlacklistRepository, SqliteTier1Repository};
    use crate::domain::models::{BlacklistReason, RoutePath, SourceIdentity, SourceType, Tier1Promotion};
    use crate::services::BlacklistStore;
    use std::collections::BTreeSet;

    async fn setup() -> (CoverageRouter, Arc<Tier1Registry>, Arc<BlacklistStore>) {
        let pool = create_migrated_test_pool().await.unwrap();
        let blacklist = Arc::new(BlacklistStore::new(Arc::new(SqliteBlacklistRepository::new(pool.clone()))));
        let tier1 = Arc::new(Tier1Registry::new(Arc::new(SqliteTier1Repository::new(pool)), blacklist.clone()));
        (CoverageRouter::new(tier1.clone()), tier1, blacklist)
    }

    fn promotion(key: &str, interest: &str) -> Tier1Promotion {
        Tier1Promotion::new(
            SourceIdentity::new(SourceType::Reddit, key).unwrap(),
            BTreeSet::from([interest.to_string()]),
            0.9,
            BTreeSet::from(["awesome-rust".to_string()]),
        )
    }

    #[tokio::test]
    async fn test_blacklisted_source_forces_hybrid() {
        let (router, tier1, blacklist) = setup().await;
        tier1.upsert(promotion("rust", "Rust")).await.unwrap();

        let interests = vec!["Rust".to_string()];
        let decision = router.route(&interests, 7).await.unwrap();
        assert_eq!(decision.path(), RoutePath::Fast);

        let id = SourceIdentity::new(SourceType::Reddit, "rust").unwrap();
        blacklist.record_failure(&id, BlacklistReason::NotFound, None).await.unwrap();

        let decision = router.route(&interests, 7).await.unwrap();
        assert_eq!(decision.path(), RoutePath::Hybrid);
        assert!(decision.sources().is_empty());
    }

    #[tokio::test]
    async fn test_unhealthy_source_does_not_count() {
        let (router, tier1, _) = setup().await;
        tier1.upsert(promotion("rust", "Rust")).await.unwrap();
        tier1
            .mark_unhealthy(&SourceIdentity::new(SourceType::Reddit, "rust").unwrap())
            .await
            .unwrap();

        let decision = router.route(&["Rust".to_string()], 1).await.unwrap();
        assert_eq!(decision.path(), RoutePath::Hybrid);
    }
}
