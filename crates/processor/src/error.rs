//! Error types for the relay pipeline
//!
//! Every fatal error names the stage it came from so the binary can report
//! `<stage>: <cause>`.

use inventory_relay_config::ConfigError;
use inventory_relay_types::CodecError;
use std::fmt;
use thiserror::Error;

use crate::kafka::KafkaError;

/// Pipeline stage an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Consumer,
    Producer,
    Pipeline,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Consumer => write!(f, "consumer"),
            Stage::Producer => write!(f, "producer"),
            Stage::Pipeline => write!(f, "pipeline"),
        }
    }
}

/// Main processor error type
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Fetch from the source topic failed; ends the consumer loop
    #[error("fetch failed: {source}")]
    Fetch {
        #[source]
        source: KafkaError,
    },

    /// Payload does not decode as the expected record shape
    #[error("malformed record at {location}: {source}")]
    MalformedRecord {
        stage: Stage,
        /// topic/partition/offset of the offending message
        location: String,
        #[source]
        source: CodecError,
    },

    /// Publishing to the destination topic failed or timed out
    #[error("publish to topic {topic} failed: {source}")]
    Publish {
        topic: String,
        #[source]
        source: KafkaError,
    },

    /// Broker client could not be created
    #[error("connection error: {source}")]
    Connection {
        stage: Stage,
        #[source]
        source: KafkaError,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Producer side of the hand-off channel went away
    #[error("hand-off channel closed by the producer")]
    HandOffClosed,

    /// A stage task panicked or was aborted
    #[error("task failed: {message}")]
    TaskFailed { stage: Stage, message: String },
}

impl ProcessorError {
    pub fn malformed(stage: Stage, location: impl Into<String>, source: CodecError) -> Self {
        ProcessorError::MalformedRecord {
            stage,
            location: location.into(),
            source,
        }
    }

    /// Whether the error must stop the pipeline with a non-zero exit
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ProcessorError::Fetch { .. })
    }

    /// Stage the error is attributed to
    pub fn stage(&self) -> Stage {
        match self {
            ProcessorError::Fetch { .. } | ProcessorError::HandOffClosed => Stage::Consumer,
            ProcessorError::Publish { .. } => Stage::Producer,
            ProcessorError::MalformedRecord { stage, .. }
            | ProcessorError::Connection { stage, .. }
            | ProcessorError::TaskFailed { stage, .. } => *stage,
            ProcessorError::Configuration(_) => Stage::Pipeline,
        }
    }
}

/// Result type for processor operations
pub type Result<T> = std::result::Result<T, ProcessorError>;
