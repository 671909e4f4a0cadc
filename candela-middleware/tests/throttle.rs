use std::sync::Arc;
use std::time::{Duration, Instant};

use candela_core::Middleware;
use candela_core::connector::{ExchangeConnector, HistoryProvider};
use candela_core::types::ThrottleConfig;
use candela_middleware::{Throttle, ThrottledConnector};
use candela_mock::MockConnector;
use chrono::DateTime;

fn ts(minutes: i64) -> chrono::DateTime<chrono::Utc> {
    DateTime::from_timestamp(minutes * 60, 0).expect("valid timestamp")
}

#[tokio::test(flavor = "multi_thread")]
async fn calls_beyond_the_budget_wait_for_the_window() {
    let mock = Arc::new(MockConnector::new());
    let throttled = ThrottledConnector::new(
        mock.clone(),
        &ThrottleConfig {
            max_calls: 2,
            window: Duration::from_millis(50),
        },
    );

    let started = Instant::now();
    for _ in 0..5 {
        throttled
            .check_availability("BTC")
            .await
            .expect("availability");
    }
    // 5 calls at 2 per 50ms need at least one full extra window.
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(mock.availability_calls(), 5);
}

#[tokio::test]
async fn wrapper_is_transparent_for_identity_and_capability() {
    let mock = Arc::new(MockConnector::named("kraken"));
    let wrapped = Box::new(Throttle::new(ThrottleConfig::default())).apply(mock);

    assert_eq!(wrapped.name(), "kraken");
    assert!(wrapped.as_history_provider().is_some());
}

#[tokio::test]
async fn fetches_pass_through_with_data_intact() {
    let mock = Arc::new(MockConnector::new());
    let throttled = ThrottledConnector::new(mock.clone(), &ThrottleConfig::default());

    let provider = throttled.as_history_provider().expect("capability");
    let entries = provider
        .fetch_range("BTC", ts(0), ts(15), chrono::Duration::minutes(5))
        .await
        .expect("fetch");
    assert_eq!(entries.len(), 3);
    assert_eq!(mock.fetch_calls(), 1);
}

#[tokio::test]
async fn middleware_reports_its_configuration() {
    let throttle = Throttle::new(ThrottleConfig {
        max_calls: 7,
        window: Duration::from_secs(2),
    });
    assert_eq!(throttle.name(), "ThrottledConnector");
    let cfg = throttle.config_json();
    assert_eq!(cfg["max_calls"], 7);
    assert_eq!(cfg["window_ms"], 2_000);
}
