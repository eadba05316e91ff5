//! Producer stage: receive, reconstruct, publish

use inventory_relay_types::{decode_transformed, encode, BrokerMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::stats::PipelineStats;
use super::StageExit;
use crate::error::{ProcessorError, Result, Stage};
use crate::kafka::MessageSink;

/// Producer stage lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerState {
    Idle,
    Running,
    Closed,
}

/// Drains the hand-off channel into the destination topic
pub struct ProducerStage<K> {
    sink: K,
    handoff: mpsc::UnboundedReceiver<BrokerMessage>,
    destination_topic: String,
    stats: Arc<PipelineStats>,
    state: ProducerState,
}

impl<K: MessageSink> ProducerStage<K> {
    pub fn new(
        sink: K,
        handoff: mpsc::UnboundedReceiver<BrokerMessage>,
        destination_topic: impl Into<String>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            sink,
            handoff,
            destination_topic: destination_topic.into(),
            stats,
            state: ProducerState::Idle,
        }
    }

    /// Run until the channel is closed and drained, or a publish fails
    pub async fn run(mut self) -> StageExit<ProducerState> {
        self.state = ProducerState::Running;
        info!(topic = %self.destination_topic, "Producer stage running");

        let mut result = self.produce().await;

        // Stop accepting hand-offs before the flush
        self.handoff.close();

        if let Err(source) = self.sink.close().await {
            warn!(error = %source, "Failed to close sink connection");
            if result.is_ok() {
                result = Err(ProcessorError::Publish {
                    topic: self.destination_topic.clone(),
                    source,
                });
            }
        }

        self.state = ProducerState::Closed;
        info!("Producer stage stopped");
        StageExit {
            state: self.state,
            result,
        }
    }

    async fn produce(&mut self) -> Result<()> {
        while let Some(message) = self.handoff.recv().await {
            let location = message.to_string();

            let transformed = decode_transformed(&message.value).map_err(|e| {
                let err = ProcessorError::malformed(Stage::Producer, location.as_str(), e);
                error!(record = %location, error = %err, "Cannot decode transformed record");
                err
            })?;

            let value = encode(&transformed.into_inventory_record());
            let outbound = BrokerMessage::outbound(self.destination_topic.as_str(), message.key, value);

            if let Err(source) = self.sink.publish(std::slice::from_ref(&outbound)).await {
                let err = ProcessorError::Publish {
                    topic: self.destination_topic.clone(),
                    source,
                };
                error!(record = %location, error = %err, "Publish failed");
                return Err(err);
            }

            self.stats.record_published();
            info!(
                topic = %outbound.topic,
                key = %outbound.key_str(),
                value = %outbound.value_str(),
                "Published record"
            );
        }

        Ok(())
    }
}
