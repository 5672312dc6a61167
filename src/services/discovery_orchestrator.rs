//! Discovery orchestrator.
//!
//! Drives one unattended discovery run: per-interest channel fan-out,
//! cross-channel deduplication, the blacklist gate, concurrent probing,
//! scoring, ledger bookkeeping and Tier1 promotion. A run always yields
//! [`DiscoveryStats`]; failures are logged and counted, never returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::deduplicator::deduplicate;
use super::interest_catalog::merge_interests;
use super::list_miner::ListMiner;
use super::quality_scorer::{score, should_auto_add};
use super::search_suggester::SearchSuggester;
use super::{BlacklistStore, HealthProber, Tier1Registry};
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ActivityMetrics, CandidateSource, DiscoveryLedgerEntry, DiscoveryStats, LedgerSighting, ProbeResult,
    QualitySignals, RunAnomaly, SourceType, Tier1Promotion,
};
use crate::domain::ports::{LedgerRepository, SuggesterError};

/// Domain age assumed for sources vouched for by a curated list or an
/// established feed.
const ESTABLISHED_DOMAIN_AGE_YEARS: f64 = 5.0;

/// Configuration for the discovery orchestrator.
#[derive(Debug, Clone)]
pub struct DiscoveryOrchestratorConfig {
    /// Upper bound on each miner or suggester call.
    pub channel_timeout: Duration,
    /// Interests always included in a scheduled run.
    pub catalog: Vec<String>,
}

impl Default for DiscoveryOrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_timeout: Duration::from_secs(60),
            catalog: Vec::new(),
        }
    }
}

/// Candidates one interest produced, with the number of channels that failed.
#[derive(Debug, Default)]
struct Harvest {
    candidates: Vec<CandidateSource>,
    channel_failures: usize,
}

pub struct DiscoveryOrchestrator {
    miner: Arc<ListMiner>,
    suggester: Option<Arc<SearchSuggester>>,
    blacklist: Arc<BlacklistStore>,
    prober: Arc<HealthProber>,
    tier1: Arc<Tier1Registry>,
    ledger: Arc<dyn LedgerRepository>,
    config: DiscoveryOrchestratorConfig,
}

impl DiscoveryOrchestrator {
    pub fn new(
        miner: Arc<ListMiner>,
        suggester: Option<Arc<SearchSuggester>>,
        blacklist: Arc<BlacklistStore>,
        prober: Arc<HealthProber>,
        tier1: Arc<Tier1Registry>,
        ledger: Arc<dyn LedgerRepository>,
        config: DiscoveryOrchestratorConfig,
    ) -> Self {
        Self {
            miner,
            suggester,
            blacklist,
            prober,
            tier1,
            ledger,
            config,
        }
    }

    /// Scheduled entry point: the catalog plus every user interest.
    pub async fn run_scheduled<I, S>(&self, user_interests: I) -> DiscoveryStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let interests = merge_interests(&self.config.catalog, user_interests);
        self.run_discovery(&interests).await
    }

    /// Run discovery for exactly `interests` (deduplicated ignoring case).
    #[instrument(skip_all, fields(interests = interests.len()))]
    pub async fn run_discovery(&self, interests: &[String]) -> DiscoveryStats {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        let interests = merge_interests(&[], interests);
        let mut stats = DiscoveryStats::empty(run_id);

        if interests.is_empty() {
            debug!(%run_id, "no interests, nothing to discover");
            return stats;
        }
        stats.interests_processed = interests.len();
        info!(%run_id, interests = interests.len(), "discovery run started");

        let harvests = join_all(interests.iter().map(|interest| self.harvest(interest))).await;
        let mut found = Vec::new();
        for harvest in harvests {
            stats.channel_failures += harvest.channel_failures;
            found.extend(harvest.candidates);
        }

        let candidates = deduplicate(found);
        stats.total_discovered = candidates.len();
        if candidates.is_empty() {
            warn!(%run_id, channel_failures = stats.channel_failures, "discovery produced no candidates");
            stats.anomaly = Some(RunAnomaly::NoCandidates);
            stats.duration = started.elapsed();
            return stats;
        }

        let candidates = match self.blacklist.filter(candidates).await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!(%run_id, error = %e, "blacklist unavailable, stopping run before probing");
                stats.anomaly = Some(RunAnomaly::StoreUnavailable);
                stats.duration = started.elapsed();
                return stats;
            }
        };

        let results = self.prober.check_bulk(&candidates).await;
        for (candidate, result) in candidates.iter().zip(&results) {
            if result.success {
                stats.healthy += 1;
            }
            if let Err(e) = self.prober.update_health_record(&candidate.identity, result).await {
                warn!(identity = %candidate.identity, error = %e, "failed to update health record");
            }

            let signals = derive_signals(candidate, result);
            let quality = score(&signals);
            let promote = should_auto_add(quality);
            debug!(identity = %candidate.identity, score = quality, promote, "candidate scored");

            if let Err(e) = self.record_sighting(candidate, result, quality, promote).await {
                warn!(identity = %candidate.identity, error = %e, "failed to update discovery ledger");
            }

            if promote {
                match self.tier1.upsert(promotion_for(candidate, result, quality)).await {
                    Ok(_) => {
                        stats.auto_promoted += 1;
                        info!(identity = %candidate.identity, score = quality, "auto-promoted to tier1");
                    }
                    Err(e) => warn!(identity = %candidate.identity, error = %e, "tier1 promotion failed"),
                }
            }
        }

        stats.duration = started.elapsed();
        info!(
            %run_id,
            total_discovered = stats.total_discovered,
            healthy = stats.healthy,
            auto_promoted = stats.auto_promoted,
            channel_failures = stats.channel_failures,
            duration_secs = stats.duration.as_secs_f64(),
            "discovery run finished"
        );
        stats
    }

    /// Run both channels for one interest. A failed or timed-out channel
    /// contributes nothing.
    async fn harvest(&self, interest: &str) -> Harvest {
        let timeout = self.config.channel_timeout;
        let mined = tokio::time::timeout(timeout, self.miner.mine(interest));
        let suggested = async {
            match &self.suggester {
                Some(suggester) => Some(tokio::time::timeout(timeout, suggester.suggest(interest)).await),
                None => None,
            }
        };
        let (mined, suggested) = tokio::join!(mined, suggested);

        let mut harvest = Harvest::default();
        match mined {
            Ok(mined) => {
                harvest.channel_failures += mined.failed_documents;
                harvest.candidates.extend(mined.candidates);
            }
            Err(_) => {
                warn!(interest, "list mining timed out");
                harvest.channel_failures += 1;
            }
        }

        match suggested {
            None | Some(Ok(Err(SuggesterError::Disabled))) => {}
            Some(Ok(Ok(candidates))) => harvest.candidates.extend(candidates),
            Some(Ok(Err(e))) => {
                warn!(interest, error = %e, "search suggester failed");
                harvest.channel_failures += 1;
            }
            Some(Err(_)) => {
                warn!(interest, "search suggester timed out");
                harvest.channel_failures += 1;
            }
        }

        debug!(interest, candidates = harvest.candidates.len(), "interest harvested");
        harvest
    }

    async fn record_sighting(
        &self,
        candidate: &CandidateSource,
        result: &ProbeResult,
        quality_score: f64,
        promoted: bool,
    ) -> DomainResult<()> {
        let sighting = LedgerSighting {
            identity: candidate.identity.clone(),
            url: candidate.url.clone(),
            discovered_via: candidate.discovered_via.clone(),
            interests: candidate.interests.clone(),
            quality_score,
            health_check_passed: result.success,
            promoted,
        };

        let now = Utc::now();
        let entry = match self.ledger.get(&candidate.identity).await? {
            Some(mut existing) => {
                existing.record_sighting(sighting, now);
                existing
            }
            None => DiscoveryLedgerEntry::first_sighting(sighting, now),
        };
        self.ledger.upsert(&entry).await
    }
}

/// Turn a probed candidate into scorer input.
pub fn derive_signals(candidate: &CandidateSource, result: &ProbeResult) -> QualitySignals {
    let mut signals = QualitySignals::new(
        candidate.identity.source_type,
        result.success,
        candidate.discovery_count(),
    );

    if candidate.from_curated_list() {
        signals.list_reputation = candidate.metadata.list_reputation;
        signals.domain_age_years = Some(ESTABLISHED_DOMAIN_AGE_YEARS);
    }

    match candidate.identity.source_type {
        SourceType::Reddit if result.articles_found >= 20 => {
            signals.avg_posts_per_day = Some(10.0);
        }
        SourceType::Rss => {
            if result.articles_found >= 10 {
                signals.posts_last_30_days = Some(15);
            }
            if result.articles_found >= 5 {
                signals.domain_age_years = Some(ESTABLISHED_DOMAIN_AGE_YEARS);
            }
        }
        _ => {}
    }

    signals
}

fn promotion_for(candidate: &CandidateSource, result: &ProbeResult, quality_score: f64) -> Tier1Promotion {
    let signals = derive_signals(candidate, result);
    let mut promotion = Tier1Promotion::new(
        candidate.identity.clone(),
        candidate.interests.clone(),
        quality_score,
        candidate.discovered_via.clone(),
    )
    .with_url(candidate.url.clone())
    .with_activity(ActivityMetrics {
        avg_posts_per_day: signals.avg_posts_per_day,
        posts_last_30_days: signals.posts_last_30_days,
        domain_age_years: signals.domain_age_years,
        articles_found: Some(result.articles_found),
    });
    promotion.description = candidate.metadata.title.clone();
    promotion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CandidateMetadata, SourceIdentity};

    fn curated_candidate(channels: &[&str]) -> CandidateSource {
        let identity = SourceIdentity::new(SourceType::Reddit, "rust").unwrap();
        let mut candidate = CandidateSource::new(identity, "Rust", channels[0]).with_metadata(CandidateMetadata {
            list_url: Some("https://github.com/rust-unofficial/awesome-rust".into()),
            list_reputation: Some(5000),
            ..Default::default()
        });
        candidate.discovered_via.extend(channels.iter().map(|c| c.to_string()));
        candidate
    }

    #[test]
    fn test_derive_signals_from_curated_list() {
        let candidate = curated_candidate(&["awesome-rust"]);
        let result = ProbeResult::succeeded(candidate.identity.clone(), 4, 50);
        let signals = derive_signals(&candidate, &result);

        assert_eq!(signals.discovery_count, 1);
        assert_eq!(signals.list_reputation, Some(5000));
        assert_eq!(signals.domain_age_years, Some(5.0));
        assert_eq!(signals.avg_posts_per_day, None);
        assert!((score(&signals) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_second_channel_pushes_over_threshold() {
        let candidate = curated_candidate(&["awesome-rust", "llm-search"]);
        let result = ProbeResult::succeeded(candidate.identity.clone(), 4, 50);
        let quality = score(&derive_signals(&candidate, &result));

        assert!((quality - 0.9).abs() < 1e-9);
        assert!(should_auto_add(quality));
    }

    #[test]
    fn test_busy_feed_signals() {
        let identity = SourceIdentity::from_feed_url("https://example.com/feed.xml").unwrap();
        let candidate = CandidateSource::new(identity, "Rust", "llm-search");
        let result = ProbeResult::succeeded(candidate.identity.clone(), 12, 50);
        let signals = derive_signals(&candidate, &result);

        assert_eq!(signals.posts_last_30_days, Some(15));
        assert_eq!(signals.domain_age_years, Some(5.0));
        assert_eq!(signals.list_reputation, None);
    }
}
