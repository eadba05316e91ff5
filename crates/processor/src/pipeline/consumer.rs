//! Consumer stage: fetch, transform, hand off

use inventory_relay_config::MalformedPolicy;
use inventory_relay_types::BrokerMessage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::stats::PipelineStats;
use super::StageExit;
use crate::error::{ProcessorError, Result};
use crate::kafka::{KafkaError, MessageSource};
use crate::transform::Transformer;

/// Consumer stage lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerState {
    Idle,
    Running,
    /// Fetch failed or shutdown was requested
    Closing,
    /// Transformation or hand-off failed
    Fatal,
}

/// Reads one message at a time, transforms it and hands it to the producer
pub struct ConsumerStage<S, T> {
    source: S,
    transformer: T,
    handoff: mpsc::UnboundedSender<BrokerMessage>,
    shutdown: CancellationToken,
    on_malformed: MalformedPolicy,
    stats: Arc<PipelineStats>,
    state: ConsumerState,
}

impl<S, T> ConsumerStage<S, T>
where
    S: MessageSource,
    T: Transformer,
{
    pub fn new(
        source: S,
        transformer: T,
        handoff: mpsc::UnboundedSender<BrokerMessage>,
        shutdown: CancellationToken,
        on_malformed: MalformedPolicy,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            source,
            transformer,
            handoff,
            shutdown,
            on_malformed,
            stats,
            state: ConsumerState::Idle,
        }
    }

    /// Run until a fetch fails, shutdown is requested, or a fatal error occurs
    ///
    /// The source is closed and the hand-off sender dropped on every path.
    pub async fn run(mut self) -> StageExit<ConsumerState> {
        self.state = ConsumerState::Running;
        info!(
            transformer = self.transformer.name(),
            on_malformed = %self.on_malformed,
            "Consumer stage running"
        );

        let result = self.consume().await;

        if let Err(e) = self.source.close().await {
            warn!(error = %e, "Failed to close source connection");
        }
        drop(self.handoff);

        info!(state = ?self.state, "Consumer stage stopped");
        StageExit {
            state: self.state,
            result,
        }
    }

    async fn consume(&mut self) -> Result<()> {
        loop {
            let fetched = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => Err(KafkaError::Closed),
                fetched = self.source.fetch() => fetched,
            };

            let message = match fetched {
                Ok(message) => message,
                Err(source) => {
                    self.state = ConsumerState::Closing;
                    if source.is_closed() {
                        info!("Shutdown requested, consumer stopping");
                    } else {
                        let err = ProcessorError::Fetch { source };
                        warn!(error = %err, "Consumer stopping");
                    }
                    return Ok(());
                }
            };

            self.stats.record_consumed();
            info!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                key = %message.key_str(),
                value = %message.value_str(),
                "Consumed record"
            );

            let location = message.to_string();
            let transformed = match self.transformer.run(message) {
                Ok(transformed) => transformed,
                Err(err @ ProcessorError::MalformedRecord { .. })
                    if self.on_malformed == MalformedPolicy::Skip =>
                {
                    warn!(record = %location, error = %err, "Skipping malformed record");
                    self.stats.record_skipped();
                    continue;
                }
                Err(err) => {
                    self.state = ConsumerState::Fatal;
                    error!(record = %location, error = %err, "Transformation failed");
                    return Err(err);
                }
            };

            if self.handoff.send(transformed).is_err() {
                self.state = ConsumerState::Fatal;
                error!(record = %location, "Hand-off channel closed");
                return Err(ProcessorError::HandOffClosed);
            }
            self.stats.record_handed_off();
            debug!(record = %location, "Handed off record");
        }
    }
}
