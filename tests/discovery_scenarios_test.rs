//! End-to-end discovery runs against fakes and an in-memory database.

mod common;

use std::sync::Arc;

use common::*;
use source_registry::domain::models::{BlacklistReason, CuratedList, RunAnomaly, SourceIdentity, SourceType};
use source_registry::domain::ports::{LedgerRepository, SourceSuggester};
use source_registry::adapters::sqlite::SqliteLedgerRepository;

fn rust_subreddit() -> SourceIdentity {
    SourceIdentity::new(SourceType::Reddit, "rust").unwrap()
}

fn interests(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_single_channel_candidate_is_not_promoted() {
    setup_test_logging();
    let config = config_with_rust_lists(vec![CuratedList::github(AWESOME_RUST, 5000)]);
    let fetcher = FakeFetcher::default().with(AWESOME_RUST, "Join the community at r/rust for news.");
    let runtime = runtime_with(fetcher, Arc::new(ScriptedCollector::new(4)), None, &config).await;

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;

    assert_eq!(stats.interests_processed, 1);
    assert_eq!(stats.total_discovered, 1);
    assert_eq!(stats.healthy, 1);
    assert_eq!(stats.auto_promoted, 0);
    assert_eq!(stats.anomaly, None);
    assert!(runtime.tier1.get(&rust_subreddit()).await.unwrap().is_none());

    let ledger = SqliteLedgerRepository::new(runtime.pool.clone());
    let entry = ledger.get(&rust_subreddit()).await.unwrap().unwrap();
    assert_eq!(entry.quality_score, Some(0.7));
    assert!(!entry.promoted);
}

#[tokio::test]
async fn test_two_channel_candidate_is_promoted() {
    let config = config_with_rust_lists(vec![
        CuratedList::github(AWESOME_RUST, 5000),
        CuratedList::reddit_wiki(RUST_WIKI, 1000),
    ]);
    let fetcher = FakeFetcher::default()
        .with(AWESOME_RUST, "Community: r/rust")
        .with(RUST_WIKI, "See also r/rust and r/learnrust");
    let runtime = runtime_with(fetcher, Arc::new(ScriptedCollector::new(4)), None, &config).await;

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;

    assert_eq!(stats.total_discovered, 2);
    assert_eq!(stats.auto_promoted, 1);

    let entry = runtime.tier1.get(&rust_subreddit()).await.unwrap().unwrap();
    assert!((entry.quality_score - 0.9).abs() < 1e-9);
    assert!(entry.is_healthy);
    assert!(entry.covers("rust"));
    assert_eq!(entry.discovered_via.len(), 2);
    assert!(entry.discovered_via.contains("awesome-rust"));
    assert!(entry.discovered_via.contains("reddit-wiki"));

    let learnrust = SourceIdentity::new(SourceType::Reddit, "learnrust").unwrap();
    assert!(runtime.tier1.get(&learnrust).await.unwrap().is_none());
}

#[tokio::test]
async fn test_miner_and_suggester_agree_on_feed_identity() {
    let config = config_with_rust_lists(vec![CuratedList::github(AWESOME_RUST, 5000)]);
    let fetcher =
        FakeFetcher::default().with(AWESOME_RUST, "- [This Week in Rust](https://this-week-in-rust.org/rss.xml)");
    let suggester: Arc<dyn SourceSuggester> = Arc::new(CountingSuggester {
        suggestions: vec![suggestion("feed", "https://this-week-in-rust.org/rss.xml", 0.9)],
        ..Default::default()
    });
    let runtime = runtime_with(fetcher, Arc::new(ScriptedCollector::new(4)), Some(suggester), &config).await;

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;

    assert_eq!(stats.total_discovered, 1);
    assert_eq!(stats.auto_promoted, 1);
    let feed = SourceIdentity::from_feed_url("https://this-week-in-rust.org/rss.xml").unwrap();
    let entry = runtime.tier1.get(&feed).await.unwrap().unwrap();
    assert_eq!(entry.url.as_deref(), Some("https://this-week-in-rust.org/rss.xml"));
    assert_eq!(entry.description.as_deref(), Some("This Week in Rust"));
}

#[tokio::test]
async fn test_empty_interests_yield_zero_stats() {
    let config = config_with_rust_lists(vec![]);
    let runtime = runtime_with(FakeFetcher::default(), Arc::new(ScriptedCollector::new(4)), None, &config).await;

    let stats = runtime.orchestrator.run_discovery(&[]).await;

    assert_eq!(stats.interests_processed, 0);
    assert_eq!(stats.total_discovered, 0);
    assert_eq!(stats.anomaly, None);
}

#[tokio::test]
async fn test_every_channel_failing_is_an_anomaly_not_an_error() {
    let config = config_with_rust_lists(vec![
        CuratedList::github(AWESOME_RUST, 5000),
        CuratedList::reddit_wiki(RUST_WIKI, 1000),
    ]);
    let suggester: Arc<dyn SourceSuggester> = Arc::new(CountingSuggester {
        fail: true,
        ..Default::default()
    });
    let runtime = runtime_with(FakeFetcher::default(), Arc::new(ScriptedCollector::new(4)), Some(suggester), &config).await;

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust", "rust"])).await;

    assert_eq!(stats.interests_processed, 1);
    assert_eq!(stats.total_discovered, 0);
    assert_eq!(stats.channel_failures, 3);
    assert_eq!(stats.anomaly, Some(RunAnomaly::NoCandidates));
}

#[tokio::test]
async fn test_stalled_suggester_times_out_without_failing_the_run() {
    let config = config_with_rust_lists(vec![CuratedList::github(AWESOME_RUST, 5000)]);
    let fetcher = FakeFetcher::default().with(AWESOME_RUST, "r/rust");
    let suggester: Arc<dyn SourceSuggester> = Arc::new(StalledSuggester);
    let runtime = runtime_with(fetcher, Arc::new(ScriptedCollector::new(4)), Some(suggester), &config).await;

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;

    assert_eq!(stats.channel_failures, 1);
    assert_eq!(stats.total_discovered, 1);
}

#[tokio::test]
async fn test_blacklisted_candidates_are_never_probed_or_promoted() {
    let config = config_with_rust_lists(vec![
        CuratedList::github(AWESOME_RUST, 5000),
        CuratedList::reddit_wiki(RUST_WIKI, 1000),
    ]);
    let fetcher = FakeFetcher::default().with(AWESOME_RUST, "r/rust").with(RUST_WIKI, "r/rust");
    let runtime = runtime_with(fetcher, Arc::new(ScriptedCollector::new(4)), None, &config).await;
    runtime
        .blacklist
        .record_failure(&rust_subreddit(), BlacklistReason::NotFound, None)
        .await
        .unwrap();

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;

    assert_eq!(stats.total_discovered, 1);
    assert_eq!(stats.healthy, 0);
    assert_eq!(stats.auto_promoted, 0);
    assert!(runtime.prober.health_record(&rust_subreddit()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_probe_scores_zero_and_is_logged() {
    let config = config_with_rust_lists(vec![
        CuratedList::github(AWESOME_RUST, 5000),
        CuratedList::reddit_wiki(RUST_WIKI, 1000),
    ]);
    let fetcher = FakeFetcher::default().with(AWESOME_RUST, "r/rust").with(RUST_WIKI, "r/rust");
    let collector = Arc::new(ScriptedCollector::new(4));
    collector.fail("rust", 404);
    let runtime = runtime_with(fetcher, collector, None, &config).await;

    let stats = runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;

    assert_eq!(stats.healthy, 0);
    assert_eq!(stats.auto_promoted, 0);
    let ledger = SqliteLedgerRepository::new(runtime.pool.clone());
    let entry = ledger.get(&rust_subreddit()).await.unwrap().unwrap();
    assert_eq!(entry.quality_score, Some(0.0));
    assert_eq!(entry.health_check_passed, Some(false));

    let record = runtime.prober.health_record(&rust_subreddit()).await.unwrap().unwrap();
    assert_eq!(record.consecutive_failures, 1);
    assert!(record.is_healthy);
    assert!(!runtime.blacklist.is_blacklisted(&rust_subreddit()).await.unwrap());
}

#[tokio::test]
async fn test_repeat_runs_increment_ledger_and_union_interests() {
    let mut config = config_with_rust_lists(vec![
        CuratedList::github(AWESOME_RUST, 5000),
        CuratedList::reddit_wiki(RUST_WIKI, 1000),
    ]);
    config
        .discovery
        .curated_lists
        .insert("Systems".to_string(), vec![CuratedList::github(AWESOME_RUST, 5000), CuratedList::reddit_wiki(RUST_WIKI, 1000)]);
    let fetcher = FakeFetcher::default().with(AWESOME_RUST, "r/rust").with(RUST_WIKI, "r/rust");
    let runtime = runtime_with(fetcher, Arc::new(ScriptedCollector::new(4)), None, &config).await;

    runtime.orchestrator.run_discovery(&interests(&["Rust"])).await;
    runtime.orchestrator.run_discovery(&interests(&["Systems"])).await;

    let ledger = SqliteLedgerRepository::new(runtime.pool.clone());
    let entry = ledger.get(&rust_subreddit()).await.unwrap().unwrap();
    assert_eq!(entry.discovery_count, 2);
    assert!(entry.promoted);

    let tier1 = runtime.tier1.get(&rust_subreddit()).await.unwrap().unwrap();
    assert!(tier1.covers("Rust"));
    assert!(tier1.covers("Systems"));
}
