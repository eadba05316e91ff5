//! Kafka sink implementation
//!
//! Wraps an rdkafka [`FutureProducer`]. Each message of a batch is sent and
//! awaited in order; a delivery that does not complete within the publish
//! timeout fails the batch.

use async_trait::async_trait;
use inventory_relay_config::PipelineConfig;
use inventory_relay_types::BrokerMessage;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{debug, info};

use super::error::{KafkaError, Result};
use super::traits::MessageSink;

/// Producer for the destination topic
pub struct KafkaSink {
    producer: FutureProducer,
    publish_timeout: Duration,
    close_timeout: Duration,
    closed: bool,
}

impl KafkaSink {
    /// Create the producer
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let producer: FutureProducer = Self::client_config(config)
            .create()
            .map_err(|e| KafkaError::connection(e.to_string(), config.bootstrap_servers()))?;

        info!(
            brokers = %config.bootstrap_servers(),
            topic = %config.destination_topic,
            "Kafka sink created"
        );

        Ok(Self {
            producer,
            publish_timeout: config.publish_timeout(),
            close_timeout: config.close_timeout(),
            closed: false,
        })
    }

    /// Client settings for the producer; extra properties are applied last
    pub fn client_config(config: &PipelineConfig) -> ClientConfig {
        let mut client_config = ClientConfig::new();

        client_config
            .set("bootstrap.servers", config.bootstrap_servers())
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", config.publish_timeout_ms.to_string());

        for (key, value) in &config.producer_properties {
            client_config.set(key, value);
        }

        client_config
    }
}

#[async_trait]
impl MessageSink for KafkaSink {
    async fn publish(&mut self, batch: &[BrokerMessage]) -> Result<()> {
        if self.closed {
            return Err(KafkaError::Closed);
        }

        for message in batch {
            let mut record = FutureRecord::<[u8], [u8]>::to(&message.topic).payload(&message.value);
            if !message.key.is_empty() {
                record = record.key(&message.key);
            }

            let (partition, offset) = self
                .producer
                .send(record, Timeout::After(self.publish_timeout))
                .await
                .map_err(|(e, _)| KafkaError::production(e.to_string(), message.topic.as_str(), None))?;

            debug!(topic = %message.topic, partition, offset, "Delivered message");
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        info!("Flushing pending messages...");
        self.producer
            .flush(Timeout::After(self.close_timeout))
            .map_err(KafkaError::from)?;

        info!("Kafka sink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_from_pipeline() {
        let config = PipelineConfig {
            publish_timeout_ms: 2_500,
            ..Default::default()
        };

        let client_config = KafkaSink::client_config(&config);

        assert_eq!(client_config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(client_config.get("client.id"), Some("inventory-relay"));
        assert_eq!(client_config.get("message.timeout.ms"), Some("2500"));
    }
}
