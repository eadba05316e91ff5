//! Pipeline coordinator
//!
//! Owns the hand-off channel, runs both stages as tasks and applies the
//! teardown rules:
//!
//! - shutdown requested: the consumer's token is cancelled, the producer drains
//! - consumer exits first: its sender is dropped, the producer drains, and
//!   the coordinator keeps waiting for shutdown unless a stage failed
//! - producer exits first: the consumer is cancelled
//!
//! Both tasks are always joined before [`PipelineCoordinator::run`] returns.

use inventory_relay_config::PipelineConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::consumer::{ConsumerStage, ConsumerState};
use super::producer::{ProducerStage, ProducerState};
use super::stats::PipelineStats;
use super::{PipelineReport, StageExit};
use crate::error::{ProcessorError, Result, Stage};
use crate::kafka::{MessageSink, MessageSource};
use crate::transform::Transformer;

/// Runs a consumer and a producer stage connected by an unbounded channel
pub struct PipelineCoordinator<S, K, T> {
    config: PipelineConfig,
    source: S,
    sink: K,
    transformer: T,
    stats: Arc<PipelineStats>,
}

impl<S, K, T> PipelineCoordinator<S, K, T>
where
    S: MessageSource + 'static,
    K: MessageSink + 'static,
    T: Transformer + 'static,
{
    pub fn new(config: PipelineConfig, source: S, sink: K, transformer: T) -> Self {
        Self {
            config,
            source,
            sink,
            transformer,
            stats: Arc::new(PipelineStats::new()),
        }
    }

    /// Live counters, readable while the pipeline runs
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    /// Run both stages until the pipeline stops
    ///
    /// Returns the first fatal error, preferring the producer's, or a report
    /// of what was processed.
    pub async fn run(self, shutdown: CancellationToken) -> Result<PipelineReport> {
        let (tx, rx) = mpsc::unbounded_channel();
        let consumer_token = shutdown.child_token();

        let consumer = ConsumerStage::new(
            self.source,
            self.transformer,
            tx,
            consumer_token.clone(),
            self.config.on_malformed,
            Arc::clone(&self.stats),
        );
        let producer = ProducerStage::new(
            self.sink,
            rx,
            self.config.destination_topic.as_str(),
            Arc::clone(&self.stats),
        );

        info!(
            source_topic = %self.config.source_topic,
            destination_topic = %self.config.destination_topic,
            group = %self.config.consumer_group,
            "Starting pipeline"
        );

        let mut consumer_task = tokio::spawn(consumer.run());
        let mut producer_task = tokio::spawn(producer.run());

        let (consumer_joined, producer_joined) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, draining pipeline");
                (consumer_task.await, producer_task.await)
            }
            consumer_joined = &mut consumer_task => {
                info!("Consumer stage finished, draining producer");
                (consumer_joined, producer_task.await)
            }
            producer_joined = &mut producer_task => {
                warn!("Producer stage finished first, stopping consumer");
                consumer_token.cancel();
                (consumer_task.await, producer_joined)
            }
        };

        let (consumer_state, consumer_result) = match joined(Stage::Consumer, consumer_joined) {
            Ok(exit) => (exit.state, exit.result),
            Err(e) => (ConsumerState::Fatal, Err(e)),
        };
        let (producer_state, producer_result) = match joined(Stage::Producer, producer_joined) {
            Ok(exit) => (exit.state, exit.result),
            Err(e) => (ProducerState::Closed, Err(e)),
        };

        // A clean run only ends once shutdown has been requested
        if producer_result.is_ok() && consumer_result.is_ok() && !shutdown.is_cancelled() {
            warn!("Consumer stopped without a shutdown request, waiting for interrupt");
            shutdown.cancelled().await;
        }

        let report = PipelineReport::new(self.stats.snapshot(), consumer_state, producer_state);
        info!(
            consumed = report.records_consumed,
            skipped = report.records_skipped,
            published = report.records_published,
            consumer_state = ?report.consumer_state,
            "Pipeline stopped"
        );

        producer_result?;
        consumer_result?;
        Ok(report)
    }
}

fn joined<St>(
    stage: Stage,
    result: std::result::Result<StageExit<St>, JoinError>,
) -> Result<StageExit<St>> {
    result.map_err(|e| ProcessorError::TaskFailed {
        stage,
        message: e.to_string(),
    })
}
