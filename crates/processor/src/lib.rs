//! Stream processor for inventory-relay
//!
//! This crate consumes inventory records from a source topic, applies a
//! [`Transformer`] to each one, and republishes the result to a destination
//! topic. Shutdown is driven by the process interrupt signal.
//!
//! ```rust,no_run
//! use inventory_relay_config::PipelineConfig;
//! use processor::QuantityFloorTransformer;
//!
//! # async fn example() -> processor::ProcessorResult<()> {
//! let config = PipelineConfig::default();
//! let report = processor::run(&config, QuantityFloorTransformer::new(config.quantity_threshold)).await?;
//! println!("published {} records", report.records_published);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod kafka;
pub mod pipeline;
pub mod shutdown;
pub mod transform;

pub use error::{ProcessorError, Result as ProcessorResult, Stage};

pub use kafka::{KafkaError, KafkaSink, KafkaSource, MessageSink, MessageSource};

pub use pipeline::{
    run, run_until, ConsumerState, PipelineCoordinator, PipelineReport, PipelineStats,
    ProducerState, StatsSnapshot,
};

pub use shutdown::ShutdownController;

pub use transform::{FnTransformer, QuantityFloorTransformer, Transformer};
