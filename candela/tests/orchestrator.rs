use std::sync::Arc;
use std::time::Duration as StdDuration;

use candela::{Candela, CandelaConfig, ThrottleConfig};
use candela_core::types::{CandelaError, Entry};
use candela_mock::{InstrumentedStore, MockConnector};
use candela_store::MemoryStore;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio_test::assert_ok;

fn ts(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(minutes * 60, 0).expect("valid timestamp")
}

fn config() -> CandelaConfig {
    CandelaConfig {
        grid_interval: StdDuration::from_secs(5 * 60),
        chunk_span: StdDuration::from_secs(20 * 60),
        channel_capacity: 2,
    }
}

#[test]
fn build_requires_a_store() {
    let err = Candela::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .expect_err("no store");
    assert!(matches!(err, CandelaError::InvalidArg(_)));
}

#[test]
fn build_rejects_invalid_configuration() {
    let err = Candela::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_config(CandelaConfig {
            grid_interval: StdDuration::ZERO,
            ..CandelaConfig::default()
        })
        .build()
        .expect_err("zero interval");
    assert!(matches!(err, CandelaError::InvalidArg(_)));
}

#[test]
fn exchanges_lists_registered_connectors() {
    let candela = Candela::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_connector(Arc::new(MockConnector::named("kraken")))
        .with_throttled_connector(
            Arc::new(MockConnector::named("binance")),
            ThrottleConfig::default(),
        )
        .build()
        .expect("build");
    assert_eq!(candela.exchanges(), vec!["binance", "kraken"]);
}

#[tokio::test]
async fn availability_routes_through_the_registry() {
    let candela = Candela::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .expect("build");

    assert!(tokio_test::assert_ok!(
        candela.check_availability("candela-mock", "BTC").await
    ));
    assert!(!candela
        .check_availability("candela-mock", "DELISTED")
        .await
        .expect("probe"));
    assert!(matches!(
        candela.check_availability("hyperliquid", "BTC").await,
        Err(CandelaError::UnknownExchange { .. })
    ));
}

#[tokio::test]
async fn get_history_reconciles_the_whole_range_in_order() {
    let store = Arc::new(InstrumentedStore::new());
    let connector = Arc::new(MockConnector::new());
    let candela = Candela::builder()
        .with_store(Arc::clone(&store) as Arc<dyn candela_core::RawDataStore>)
        .with_connector(Arc::clone(&connector) as Arc<dyn candela_core::ExchangeConnector>)
        .with_config(config())
        .build()
        .expect("build");

    let result = candela
        .get_history("candela-mock", "BTC", ts(0), ts(60))
        .await
        .expect("history");

    assert_eq!(result.entries.len(), 12);
    assert!(result.is_complete());
    let times: Vec<_> = result.entries.iter().map(|e| e.ts).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
    // One fetch per chunk-sized gap, one write-back each.
    assert_eq!(connector.fetch_calls(), 3);
    assert_eq!(store.write_calls(), 3);

    // A second pass is served from storage.
    let again = candela
        .get_history("candela-mock", "BTC", ts(0), ts(60))
        .await
        .expect("history");
    assert_eq!(again.entries, result.entries);
    assert_eq!(connector.fetch_calls(), 3);
}

#[tokio::test]
async fn get_history_rejects_unknown_exchanges() {
    let candela = Candela::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .expect("build");
    assert!(matches!(
        candela.get_history("hyperliquid", "BTC", ts(0), ts(60)).await,
        Err(CandelaError::UnknownExchange { .. })
    ));
}

#[tokio::test]
async fn latest_entry_returns_the_newest_point() {
    let store = Arc::new(MemoryStore::new());
    let candela = Candela::builder()
        .with_store(Arc::clone(&store) as Arc<dyn candela_core::RawDataStore>)
        .with_connector(Arc::new(MockConnector::new()))
        .with_config(config())
        .build()
        .expect("build");

    assert_eq!(
        candela.latest_entry("candela-mock", "BTC").await.expect("probe"),
        None
    );
    assert!(!candela.has_data("candela-mock", "BTC").await.expect("probe"));

    use candela_core::RawDataStore;
    store
        .save_bulk(
            "candela-mock",
            "BTC",
            &[
                Entry::new("candela-mock", "BTC", ts(0), json!({ "tag": "old" })),
                Entry::new("candela-mock", "BTC", ts(25), json!({ "tag": "newest" })),
            ],
        )
        .await
        .expect("seed");

    let latest = candela
        .latest_entry("candela-mock", "BTC")
        .await
        .expect("probe")
        .expect("entry exists");
    assert_eq!(latest.ts, ts(25));
    assert_eq!(latest.payload["tag"], "newest");
    assert!(candela.has_data("candela-mock", "BTC").await.expect("probe"));
}

#[tokio::test]
async fn channel_capacity_follows_the_configuration() {
    let candela = Candela::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_connector(Arc::new(MockConnector::new()))
        .with_config(config())
        .build()
        .expect("build");

    let (tx, _rx) = candela.channel();
    assert_eq!(tx.max_capacity(), 2);
}

#[tokio::test]
async fn service_operates_with_logging_initialized() {
    // Smoke check that the service works under an installed subscriber the
    // way deployments run it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("candela=debug"))
        .with_test_writer()
        .try_init();

    let candela = Candela::builder()
        .with_store(Arc::new(MemoryStore::new()))
        .with_connector(Arc::new(MockConnector::new()))
        .with_config(config())
        .build()
        .expect("build");
    let result = candela
        .get_history("candela-mock", "BTC", ts(0), ts(20))
        .await
        .expect("history");
    assert_eq!(result.entries.len(), 4);
}
