//! Broker integration
//!
//! [`MessageSource`] and [`MessageSink`] are the seams the pipeline stages
//! talk to. [`KafkaSource`] and [`KafkaSink`] implement them on top of
//! rdkafka; tests substitute in-memory implementations.

pub mod error;
pub mod sink;
pub mod source;
pub mod traits;

pub use error::KafkaError;
pub use sink::KafkaSink;
pub use source::KafkaSource;
pub use traits::{MessageSink, MessageSource};
