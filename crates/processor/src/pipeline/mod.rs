//! Consume-transform-produce pipeline
//!
//! ```text
//! source topic -> ConsumerStage -> (Transformer) -> hand-off channel -> ProducerStage -> destination topic
//! ```

pub mod consumer;
pub mod coordinator;
pub mod producer;
pub mod stats;

pub use consumer::{ConsumerStage, ConsumerState};
pub use coordinator::PipelineCoordinator;
pub use producer::{ProducerStage, ProducerState};
pub use stats::{PipelineStats, StatsSnapshot};

use inventory_relay_config::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result, Stage};
use crate::kafka::{KafkaSink, KafkaSource};
use crate::shutdown::ShutdownController;
use crate::transform::Transformer;

/// Final state of a stage together with how its loop ended
#[derive(Debug)]
pub struct StageExit<St> {
    pub state: St,
    pub result: Result<()>,
}

/// Summary of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub records_consumed: u64,
    pub records_handed_off: u64,
    pub records_skipped: u64,
    pub records_published: u64,
    pub consumer_state: ConsumerState,
    pub producer_state: ProducerState,
}

impl PipelineReport {
    fn new(stats: StatsSnapshot, consumer_state: ConsumerState, producer_state: ProducerState) -> Self {
        Self {
            records_consumed: stats.records_consumed,
            records_handed_off: stats.records_handed_off,
            records_skipped: stats.records_skipped,
            records_published: stats.records_published,
            consumer_state,
            producer_state,
        }
    }
}

/// Run the pipeline against Kafka until interrupted
///
/// Validates `config`, connects both stages, and installs an interrupt
/// listener; the first Ctrl-C starts a graceful shutdown.
pub async fn run<T>(config: &PipelineConfig, transformer: T) -> Result<PipelineReport>
where
    T: Transformer + 'static,
{
    run_until(config, transformer, ShutdownController::new()).await
}

/// Like [`run`], but also stops when `shutdown` is triggered programmatically
pub async fn run_until<T>(
    config: &PipelineConfig,
    transformer: T,
    shutdown: ShutdownController,
) -> Result<PipelineReport>
where
    T: Transformer + 'static,
{
    config.validate()?;

    let source = KafkaSource::new(config).map_err(|source| ProcessorError::Connection {
        stage: Stage::Consumer,
        source,
    })?;
    let sink = KafkaSink::new(config).map_err(|source| ProcessorError::Connection {
        stage: Stage::Producer,
        source,
    })?;

    let listener = shutdown.listen_for_interrupt();
    let result = PipelineCoordinator::new(config.clone(), source, sink, transformer)
        .run(shutdown.token())
        .await;
    listener.abort();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let stats = StatsSnapshot {
            records_consumed: 3,
            records_handed_off: 2,
            records_skipped: 1,
            records_published: 2,
        };
        let report = PipelineReport::new(stats, ConsumerState::Closing, ProducerState::Closed);

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["records_published"], 2);
        assert_eq!(json["consumer_state"], "closing");
        assert_eq!(json["producer_state"], "closed");
    }
}
