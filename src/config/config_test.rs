use std::time::Duration;

use super::{Config, ConfigTrait};

#[test]
fn test_empty_sections_fall_back_to_defaults() {
    let cfg = Config::from_yaml("matdispatch:\n  env: prod\n").unwrap();

    assert!(cfg.is_prod());
    assert_eq!(cfg.coordinator().addr, "0.0.0.0:5000");
    assert_eq!(cfg.coordinator().probe_interval, Duration::from_secs(5));
    assert_eq!(cfg.coordinator().probe_timeout, Duration::from_secs(2));
    assert_eq!(cfg.coordinator().dispatch_attempts, 3);
    assert_eq!(cfg.worker().addr, "0.0.0.0:0");
    assert_eq!(cfg.worker().coordinator, "127.0.0.1:5000");
    assert!(cfg.worker().advertise.is_none());
    assert_eq!(cfg.client().rounds, 10);
}

#[test]
fn test_humantime_durations_are_parsed() {
    let yaml = r#"
matdispatch:
  env: dev
  logs:
    level: info
  coordinator:
    addr: "127.0.0.1:6000"
    probe_interval: 1s 500ms
    call_timeout: 10s
    dispatch_attempts: 5
  worker:
    advertise: "10.0.0.3:7001"
"#;
    let cfg = Config::from_yaml(yaml).unwrap();

    assert!(cfg.is_dev());
    assert_eq!(cfg.logs().and_then(|l| l.level.as_deref()), Some("info"));
    assert_eq!(cfg.coordinator().addr, "127.0.0.1:6000");
    assert_eq!(cfg.coordinator().probe_interval, Duration::from_millis(1500));
    assert_eq!(cfg.coordinator().call_timeout, Duration::from_secs(10));
    assert_eq!(cfg.coordinator().probe_timeout, Duration::from_secs(2));
    assert_eq!(cfg.coordinator().dispatch_attempts, 5);
    assert_eq!(cfg.worker().advertise.as_deref(), Some("10.0.0.3:7001"));
}

#[test]
fn test_zero_attempts_rejected() {
    let yaml = "matdispatch:\n  coordinator:\n    dispatch_attempts: 0\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("dispatch_attempts"));
}

#[test]
fn test_zero_probe_interval_rejected() {
    let yaml = "matdispatch:\n  coordinator:\n    probe_interval: 0s\n";
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::load("cfg/does-not-exist.cfg.yaml").is_err());
}

#[test]
fn test_shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/cfg/matdispatch.cfg.yaml");
    let cfg = Config::load(path).unwrap();
    assert_eq!(cfg.coordinator().dispatch_attempts, 3);
}

#[test]
fn test_test_config_is_valid() {
    let cfg = super::new_test_config();
    assert!(cfg.is_test());
    cfg.validate().unwrap();
}
