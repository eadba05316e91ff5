//! Configuration management for inventory-relay
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables prefixed with `INVENTORY_RELAY_` (nested keys are
//! separated by `__`, e.g. `INVENTORY_RELAY_PIPELINE__SOURCE_TOPIC`).

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "INVENTORY_RELAY_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level relay configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Broker and pipeline settings
    pub pipeline: PipelineConfig,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Load configuration from defaults, an optional file, and the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(RelayConfig::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.observability.validate()
    }
}

/// What the consumer side does with a record its transformer cannot decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Stop the pipeline with a fatal error
    #[default]
    Fail,
    /// Log the record and keep consuming
    Skip,
}

impl MalformedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedPolicy::Fail => "fail",
            MalformedPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MalformedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(MalformedPolicy::Fail),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(ConfigError::ValidationError(format!(
                "invalid on_malformed: {}. Must be 'fail' or 'skip'",
                other
            ))),
        }
    }
}

/// Pipeline configuration, fixed for the lifetime of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Broker addresses (host:port), in order
    #[serde(deserialize_with = "broker_list")]
    pub brokers: Vec<String>,

    /// Topic records are consumed from
    pub source_topic: String,

    /// Topic transformed records are published to
    pub destination_topic: String,

    /// Consumer group used on the source topic
    pub consumer_group: String,

    /// Minimum bytes the broker should return per fetch
    pub min_fetch_bytes: usize,

    /// Maximum bytes the broker may return per fetch
    pub max_fetch_bytes: usize,

    /// Client ID reported to the brokers
    pub client_id: String,

    /// Where a new consumer group starts: "earliest" or "latest"
    pub auto_offset_reset: String,

    /// Delivery timeout for a single publish
    pub publish_timeout_ms: u64,

    /// Upper bound on flushing the producer during teardown
    pub close_timeout_ms: u64,

    /// Quantities strictly below this are zeroed by the stock transformer
    pub quantity_threshold: i64,

    /// Handling of records the transformer cannot decode
    pub on_malformed: MalformedPolicy,

    /// Extra librdkafka consumer properties, applied last
    pub consumer_properties: HashMap<String, String>,

    /// Extra librdkafka producer properties, applied last
    pub producer_properties: HashMap<String, String>,
}

/// librdkafka's default `message.max.bytes`
const DEFAULT_MESSAGE_MAX_BYTES: usize = 1_000_000;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            source_topic: "libtest".to_string(),
            destination_topic: "producer".to_string(),
            consumer_group: "inventory-relay".to_string(),
            min_fetch_bytes: 10_000,     // 10KB
            max_fetch_bytes: 10_000_000, // 10MB
            client_id: "inventory-relay".to_string(),
            auto_offset_reset: "earliest".to_string(),
            publish_timeout_ms: 10_000,
            close_timeout_ms: 10_000,
            quantity_threshold: 10,
            on_malformed: MalformedPolicy::Fail,
            consumer_properties: HashMap::new(),
            producer_properties: HashMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Validate the pipeline settings
    pub fn validate(&self) -> Result<()> {
        if self.brokers.is_empty() || self.brokers.iter().any(|b| b.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "brokers cannot be empty".to_string(),
            ));
        }

        if self.source_topic.is_empty() {
            return Err(ConfigError::ValidationError(
                "source_topic cannot be empty".to_string(),
            ));
        }

        if self.destination_topic.is_empty() {
            return Err(ConfigError::ValidationError(
                "destination_topic cannot be empty".to_string(),
            ));
        }

        if self.source_topic == self.destination_topic {
            return Err(ConfigError::ValidationError(format!(
                "source_topic and destination_topic must differ (both are '{}')",
                self.source_topic
            )));
        }

        if self.consumer_group.is_empty() {
            return Err(ConfigError::ValidationError(
                "consumer_group cannot be empty".to_string(),
            ));
        }

        if self.min_fetch_bytes == 0 || self.min_fetch_bytes > self.max_fetch_bytes {
            return Err(ConfigError::ValidationError(format!(
                "invalid fetch bounds: min_fetch_bytes={} max_fetch_bytes={}",
                self.min_fetch_bytes, self.max_fetch_bytes
            )));
        }

        let message_max_bytes = self.message_max_bytes()?;
        if self.max_fetch_bytes < message_max_bytes {
            return Err(ConfigError::ValidationError(format!(
                "max_fetch_bytes={} is below message.max.bytes={}",
                self.max_fetch_bytes, message_max_bytes
            )));
        }

        if !["earliest", "latest"].contains(&self.auto_offset_reset.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "invalid auto_offset_reset: {}. Must be 'earliest' or 'latest'",
                self.auto_offset_reset
            )));
        }

        if self.publish_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "publish_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Largest message the consumer accepts, librdkafka's default unless overridden
    fn message_max_bytes(&self) -> Result<usize> {
        match self.consumer_properties.get("message.max.bytes") {
            Some(value) => value.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("invalid message.max.bytes: {value}"))
            }),
            None => Ok(DEFAULT_MESSAGE_MAX_BYTES),
        }
    }

    /// Comma-separated broker list, as librdkafka expects it
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// Enable structured JSON logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "invalid log_level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}

/// Accept brokers either as a list or as one comma-separated string
fn broker_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Brokers {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Brokers::deserialize(deserializer)? {
        Brokers::List(list) => list,
        Brokers::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
