//! Registry lifecycle against a swappable source and the paused tokio clock.

use actgate_runtime::config::GateConfig;
use actgate_runtime::registry::{RegistryDocument, RegistryError, TrustRegistry};
use actgate_runtime::testing::SharedSource;
use actgate_types::{TrustDomain, TrustLevel};
use std::sync::Arc;
use std::time::Duration;

fn doc(level: TrustLevel) -> RegistryDocument {
    RegistryDocument::default().with(TrustDomain::Actions, "dial.to", level)
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn scheduled_refresh_follows_configured_interval() {
    let mut config = GateConfig::default();
    config.registry.refresh_interval_secs = 60;

    let source = SharedSource::new(doc(TrustLevel::Trusted));
    let registry = Arc::new(TrustRegistry::new(Arc::clone(&source)));
    let handle = registry.start(config.registry.refresh_interval());

    settle().await;
    assert_eq!(source.fetches(), 1);
    assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Trusted);

    source.set(doc(TrustLevel::Malicious));
    tokio::time::advance(Duration::from_secs(61)).await;
    settle().await;
    assert_eq!(source.fetches(), 2);
    assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Malicious);

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn failed_scheduled_refresh_keeps_snapshot() {
    let source = SharedSource::new(doc(TrustLevel::Trusted));
    let registry = Arc::new(TrustRegistry::new(Arc::clone(&source)));
    let handle = registry.start(Duration::from_secs(600));
    settle().await;

    source.fail(RegistryError::Status { status: 503 });
    tokio::time::advance(Duration::from_secs(601)).await;
    settle().await;

    assert_eq!(source.fetches(), 2);
    assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Trusted);
    assert_eq!(registry.snapshot_len(), 1);

    source.set(RegistryDocument::default());
    tokio::time::advance(Duration::from_secs(601)).await;
    settle().await;
    assert_eq!(registry.snapshot_len(), 0);

    handle.stop();
}

#[tokio::test]
async fn init_failure_answers_unknown_then_recovers() {
    let source = SharedSource::new(doc(TrustLevel::Trusted));
    source.fail(RegistryError::Fetch("connection refused".into()));
    let registry = TrustRegistry::new(Arc::clone(&source));

    registry.init().await;
    registry.init().await;
    assert_eq!(source.fetches(), 1);
    assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Unknown);

    source.set(doc(TrustLevel::Trusted));
    assert!(registry.refresh().await);
    assert_eq!(registry.action_state("https://dial.to/x"), TrustLevel::Trusted);
}

#[test]
fn config_builds_http_source() {
    let mut config = GateConfig::default();
    config.registry.url = "https://registry.internal/all".into();
    let source = config.registry.source();
    assert_eq!(source.url(), "https://registry.internal/all");
}
