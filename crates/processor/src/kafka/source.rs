//! Kafka source implementation
//!
//! Wraps an rdkafka [`StreamConsumer`] subscribed to the source topic.
//! Offsets are committed by the client (`enable.auto.commit`), so a message
//! is considered consumed once it has been fetched.

use async_trait::async_trait;
use chrono::DateTime;
use inventory_relay_config::PipelineConfig;
use inventory_relay_types::BrokerMessage;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::Message;
use tracing::{debug, info};

use super::error::{KafkaError, Result};
use super::traits::MessageSource;

/// Consumer for the source topic
pub struct KafkaSource {
    consumer: StreamConsumer,
    topic: String,
    closed: bool,
}

impl KafkaSource {
    /// Create the consumer and subscribe it to `config.source_topic`
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let consumer: StreamConsumer = Self::client_config(config)
            .create()
            .map_err(|e| KafkaError::connection(e.to_string(), config.bootstrap_servers()))?;

        consumer.subscribe(&[config.source_topic.as_str()]).map_err(|e| {
            KafkaError::consumption(e.to_string(), config.source_topic.as_str(), None, None)
        })?;

        info!(
            brokers = %config.bootstrap_servers(),
            topic = %config.source_topic,
            group = %config.consumer_group,
            "Subscribed to source topic"
        );

        Ok(Self {
            consumer,
            topic: config.source_topic.clone(),
            closed: false,
        })
    }

    /// Client settings for the consumer; extra properties are applied last
    pub fn client_config(config: &PipelineConfig) -> ClientConfig {
        let mut client_config = ClientConfig::new();

        client_config
            .set("bootstrap.servers", config.bootstrap_servers())
            .set("group.id", &config.consumer_group)
            .set("client.id", &config.client_id)
            .set("fetch.min.bytes", config.min_fetch_bytes.to_string())
            .set("fetch.max.bytes", config.max_fetch_bytes.to_string())
            .set("auto.offset.reset", &config.auto_offset_reset)
            .set("enable.auto.commit", "true");

        for (key, value) in &config.consumer_properties {
            client_config.set(key, value);
        }

        client_config
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn fetch(&mut self) -> Result<BrokerMessage> {
        if self.closed {
            return Err(KafkaError::Closed);
        }

        let msg = self
            .consumer
            .recv()
            .await
            .map_err(|e| KafkaError::from(e).with_topic(&self.topic))?;

        Ok(BrokerMessage {
            key: msg.key().map(<[u8]>::to_vec).unwrap_or_default(),
            value: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            timestamp: msg
                .timestamp()
                .to_millis()
                .and_then(DateTime::from_timestamp_millis),
        })
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.consumer.unsubscribe();
        self.closed = true;
        debug!(topic = %self.topic, "Kafka source closed");
        Ok(())
    }
}
