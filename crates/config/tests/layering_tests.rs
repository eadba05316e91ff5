//! Configuration layering tests: defaults, YAML file, environment

use figment::Jail;
use inventory_relay_config::{MalformedPolicy, RelayConfig};
use std::path::Path;

#[test]
fn test_defaults_without_file_or_env() {
    Jail::expect_with(|_jail| {
        let config = RelayConfig::load(None).map_err(|e| e.to_string())?;

        assert_eq!(config, RelayConfig::default());
        Ok(())
    });
}

#[test]
fn test_yaml_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "relay.yaml",
            r#"
pipeline:
  brokers:
    - kafka-1:9092
    - kafka-2:9092
  source_topic: inventory.raw
  destination_topic: inventory.adjusted
  quantity_threshold: 25
  on_malformed: skip
  consumer_properties:
    session.timeout.ms: "6000"
observability:
  json_logging: true
"#,
        )?;

        let config = RelayConfig::load(Some(Path::new("relay.yaml"))).map_err(|e| e.to_string())?;

        assert_eq!(config.pipeline.brokers, vec!["kafka-1:9092", "kafka-2:9092"]);
        assert_eq!(config.pipeline.source_topic, "inventory.raw");
        assert_eq!(config.pipeline.destination_topic, "inventory.adjusted");
        assert_eq!(config.pipeline.quantity_threshold, 25);
        assert_eq!(config.pipeline.on_malformed, MalformedPolicy::Skip);
        assert_eq!(
            config.pipeline.consumer_properties.get("session.timeout.ms"),
            Some(&"6000".to_string())
        );
        // Untouched keys keep their defaults
        assert_eq!(config.pipeline.consumer_group, "inventory-relay");
        assert_eq!(config.pipeline.min_fetch_bytes, 10_000);
        assert!(config.observability.json_logging);
        assert_eq!(config.observability.log_level, "info");
        Ok(())
    });
}

#[test]
fn test_env_overrides_yaml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "relay.yaml",
            r#"
pipeline:
  source_topic: from-file
  quantity_threshold: 25
"#,
        )?;
        jail.set_env("INVENTORY_RELAY_PIPELINE__SOURCE_TOPIC", "from-env");
        jail.set_env("INVENTORY_RELAY_PIPELINE__BROKERS", "k1:9092,k2:9092");
        jail.set_env("INVENTORY_RELAY_OBSERVABILITY__LOG_LEVEL", "debug");

        let config = RelayConfig::load(Some(Path::new("relay.yaml"))).map_err(|e| e.to_string())?;

        assert_eq!(config.pipeline.source_topic, "from-env");
        assert_eq!(config.pipeline.quantity_threshold, 25);
        assert_eq!(config.pipeline.brokers, vec!["k1:9092", "k2:9092"]);
        assert_eq!(config.observability.log_level, "debug");
        Ok(())
    });
}

#[test]
fn test_missing_file_is_an_error() {
    Jail::expect_with(|_jail| {
        let result = RelayConfig::load(Some(Path::new("absent.yaml")));

        assert!(result.is_err());
        Ok(())
    });
}

#[test]
fn test_invalid_policy_fails_to_load() {
    Jail::expect_with(|jail| {
        jail.set_env("INVENTORY_RELAY_PIPELINE__ON_MALFORMED", "ignore");

        assert!(RelayConfig::load(None).is_err());
        Ok(())
    });
}

#[test]
fn test_loaded_config_is_validated_separately() {
    Jail::expect_with(|jail| {
        jail.set_env("INVENTORY_RELAY_PIPELINE__DESTINATION_TOPIC", "libtest");

        let config = RelayConfig::load(None).map_err(|e| e.to_string())?;

        assert!(config.validate().is_err());
        Ok(())
    });
}
