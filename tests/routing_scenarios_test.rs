//! Coverage routing and contribution tracking as the generation pipeline sees them.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::*;
use source_registry::domain::models::{
    BlacklistReason, RoutePath, RoutingDecision, SourceIdentity, SourceType, SourceYield, Tier1Promotion,
};
use source_registry::domain::ports::SourceSuggester;
use source_registry::RegistryRuntime;

fn promotion(key: &str, interests: &[&str]) -> Tier1Promotion {
    Tier1Promotion::new(
        SourceIdentity::new(SourceType::Reddit, key).unwrap(),
        interests.iter().map(|s| s.to_string()).collect(),
        0.9,
        BTreeSet::from(["awesome-rust".to_string()]),
    )
}

fn requested(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

async fn runtime_counting(suggester: Arc<CountingSuggester>) -> RegistryRuntime {
    let config = config_with_rust_lists(vec![]);
    let suggester: Arc<dyn SourceSuggester> = suggester;
    runtime_with(FakeFetcher::default(), Arc::new(ScriptedCollector::new(4)), Some(suggester), &config).await
}

#[tokio::test]
async fn test_partial_coverage_takes_hybrid_path() {
    let runtime = runtime_counting(Arc::new(CountingSuggester::default())).await;
    runtime.tier1.upsert(promotion("rust", &["Rust"])).await.unwrap();

    let wanted = requested(&["Rust", "Go", "Python"]);
    let report = runtime.tier1.coverage(&wanted).await.unwrap();
    assert!((report.coverage_percentage - 33.333_333).abs() < 0.001);
    assert_eq!(report.missing, vec!["Go", "Python"]);

    let decision = runtime.router.route(&wanted, 1).await.unwrap();
    assert_eq!(decision.path(), RoutePath::Hybrid);
    match decision {
        RoutingDecision::Hybrid {
            tier1_sources,
            requested_interests,
        } => {
            assert_eq!(tier1_sources.len(), 1);
            assert_eq!(requested_interests, wanted);
        }
        RoutingDecision::Fast { .. } => panic!("expected hybrid path"),
    }
}

#[tokio::test]
async fn test_full_coverage_takes_fast_path_without_suggester() {
    let suggester = Arc::new(CountingSuggester::default());
    let runtime = runtime_counting(suggester.clone()).await;
    runtime.tier1.upsert(promotion("rust", &["Rust"])).await.unwrap();

    let decision = runtime.router.route(&requested(&["Rust"]), 2).await.unwrap();

    assert_eq!(decision.path(), RoutePath::Fast);
    assert_eq!(decision.sources().len(), 1);
    assert_eq!(suggester.calls(), 0);
}

#[tokio::test]
async fn test_threshold_is_inclusive_at_ninety_percent() {
    let runtime = runtime_counting(Arc::new(CountingSuggester::default())).await;
    let covered: Vec<String> = (0..9).map(|i| format!("Topic {i}")).collect();
    for (i, interest) in covered.iter().enumerate() {
        runtime
            .tier1
            .upsert(promotion(&format!("topic{i}"), &[interest.as_str()]))
            .await
            .unwrap();
    }

    let mut wanted = covered.clone();
    wanted.push("Uncovered".to_string());
    let decision = runtime.router.route(&wanted, 3).await.unwrap();
    assert_eq!(decision.path(), RoutePath::Fast);
    assert_eq!(decision.sources().len(), 9);
}

#[tokio::test]
async fn test_blacklist_overrides_tier1_for_routing() {
    let runtime = runtime_counting(Arc::new(CountingSuggester::default())).await;
    runtime.tier1.upsert(promotion("rust", &["Rust"])).await.unwrap();
    runtime.tier1.upsert(promotion("learnrust", &["Rust"])).await.unwrap();
    runtime
        .blacklist
        .record_failure(&SourceIdentity::new(SourceType::Reddit, "rust").unwrap(), BlacklistReason::Forbidden, None)
        .await
        .unwrap();

    let decision = runtime.router.route(&requested(&["Rust"]), 4).await.unwrap();

    assert_eq!(decision.path(), RoutePath::Fast);
    let keys: Vec<_> = decision.sources().iter().map(|e| e.identity.source_key.as_str()).collect();
    assert_eq!(keys, vec!["learnrust"]);
}

#[tokio::test]
async fn test_contributions_are_appended_per_call() {
    let runtime = runtime_counting(Arc::new(CountingSuggester::default())).await;
    let rust = SourceIdentity::new(SourceType::Reddit, "rust").unwrap();
    let yields = vec![SourceYield {
        identity: rust.clone(),
        articles_collected: 12,
        articles_included: 4,
    }];

    runtime.contributions.record(99, yields.clone()).await.unwrap();
    runtime.contributions.record(99, yields).await.unwrap();

    let rows = runtime.contributions.for_newsletter(99).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.identity == rust && r.articles_included == 4));
}

#[test]
fn test_newsletter_id_is_recorded_on_spans() {
    use tracing_subscriber::layer::SubscriberExt;

    let fields = SpanFields::default();
    let subscriber = tracing_subscriber::registry().with(fields.clone());
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

    tracing::subscriber::with_default(subscriber, || {
        rt.block_on(async {
            let runtime = runtime_counting(Arc::new(CountingSuggester::default())).await;
            runtime.router.route(&requested(&["Rust"]), 17).await.unwrap();
            runtime
                .contributions
                .record(
                    18,
                    vec![SourceYield {
                        identity: SourceIdentity::new(SourceType::Reddit, "rust").unwrap(),
                        articles_collected: 3,
                        articles_included: 1,
                    }],
                )
                .await
                .unwrap();
        });
    });

    assert_eq!(fields.get("route", "newsletter_id").as_deref(), Some("17"));
    assert_eq!(fields.get("record", "newsletter_id").as_deref(), Some("18"));
}
