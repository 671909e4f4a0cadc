use std::path::PathBuf;
use std::time::Duration;

use candela_types::{CandelaConfig, StorageBackend, StorageConfig, ThrottleConfig};

#[test]
fn candela_config_round_trips_through_json() {
    let cfg = CandelaConfig {
        grid_interval: Duration::from_secs(60),
        chunk_span: Duration::from_secs(3600),
        channel_capacity: 4,
    };
    let json = serde_json::to_string(&cfg).expect("serialize");
    let back: CandelaConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, cfg);
}

#[test]
fn default_config_validates() {
    assert!(CandelaConfig::default().validate().is_ok());
}

#[test]
fn zero_interval_is_rejected() {
    let cfg = CandelaConfig {
        grid_interval: Duration::ZERO,
        ..CandelaConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn chunk_span_shorter_than_interval_is_rejected() {
    let cfg = CandelaConfig {
        grid_interval: Duration::from_secs(300),
        chunk_span: Duration::from_secs(60),
        ..CandelaConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_capacity_is_rejected() {
    let cfg = CandelaConfig {
        channel_capacity: 0,
        ..CandelaConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn storage_config_round_trips_through_json() {
    let cfg = StorageConfig {
        backend: StorageBackend::LocalFile {
            root: PathBuf::from("/var/lib/candela"),
        },
    };
    let json = serde_json::to_string(&cfg).expect("serialize");
    let back: StorageConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, cfg);
}

#[test]
fn throttle_config_defaults_are_sane() {
    let cfg = ThrottleConfig::default();
    assert!(cfg.max_calls > 0);
    assert!(!cfg.window.is_zero());
}
