//! Broker error types.
//!
//! Both the rdkafka adapters and any other [`MessageSource`](super::MessageSource)
//! or [`MessageSink`](super::MessageSink) implementation report failures with
//! [`KafkaError`].

use thiserror::Error;

/// Result type alias for broker operations.
pub type Result<T> = std::result::Result<T, KafkaError>;

/// Placeholder topic for errors converted without broker context.
const UNKNOWN_TOPIC: &str = "unknown";

/// Error type for broker operations.
#[derive(Error, Debug)]
pub enum KafkaError {
    /// Error establishing the client against the brokers.
    #[error("Failed to connect to Kafka broker {broker}: {message}")]
    Connection {
        /// Error message describing the connection failure.
        message: String,
        /// Broker list the client was created for.
        broker: String,
    },

    /// Error during message consumption.
    #[error("Failed to consume message from topic {topic}: {message}")]
    Consumption {
        message: String,
        topic: String,
        partition: Option<i32>,
        offset: Option<i64>,
    },

    /// Error during message production.
    #[error("Failed to produce message to topic {topic}: {message}")]
    Production {
        message: String,
        topic: String,
        partition: Option<i32>,
    },

    /// The connection was closed, locally or by shutdown.
    #[error("Connection closed")]
    Closed,

    /// Error from the underlying rdkafka library.
    #[error("Kafka client error: {message}")]
    KafkaClient { message: String },
}

impl KafkaError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>, broker: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            broker: broker.into(),
        }
    }

    /// Create a consumption error.
    pub fn consumption(
        message: impl Into<String>,
        topic: impl Into<String>,
        partition: Option<i32>,
        offset: Option<i64>,
    ) -> Self {
        Self::Consumption {
            message: message.into(),
            topic: topic.into(),
            partition,
            offset,
        }
    }

    /// Create a production error.
    pub fn production(
        message: impl Into<String>,
        topic: impl Into<String>,
        partition: Option<i32>,
    ) -> Self {
        Self::Production {
            message: message.into(),
            topic: topic.into(),
            partition,
        }
    }

    /// Attach the topic to a consumption or production error that lacks one.
    pub fn with_topic(self, name: &str) -> Self {
        match self {
            Self::Consumption {
                message,
                topic,
                partition,
                offset,
            } if topic == UNKNOWN_TOPIC => Self::consumption(message, name, partition, offset),
            Self::Production {
                message,
                topic,
                partition,
            } if topic == UNKNOWN_TOPIC => Self::production(message, name, partition),
            other => other,
        }
    }

    /// True when the error only reports a closed connection.
    pub fn is_closed(&self) -> bool {
        matches!(self, KafkaError::Closed)
    }
}

impl From<rdkafka::error::KafkaError> for KafkaError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        use rdkafka::error::KafkaError as RdKafkaError;

        match err {
            RdKafkaError::ClientCreation(msg) => KafkaError::connection(msg, "unknown"),

            RdKafkaError::MessageProduction(code) => KafkaError::production(
                format!("Message production failed with code: {:?}", code),
                UNKNOWN_TOPIC,
                None,
            ),

            RdKafkaError::MessageConsumption(code) => KafkaError::consumption(
                format!("Message consumption failed with code: {:?}", code),
                UNKNOWN_TOPIC,
                None,
                None,
            ),

            RdKafkaError::PartitionEOF(partition) => KafkaError::consumption(
                format!("Reached end of partition {}", partition),
                UNKNOWN_TOPIC,
                Some(partition),
                None,
            ),

            RdKafkaError::Canceled => KafkaError::Closed,

            _ => KafkaError::KafkaClient {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KafkaError::connection("Connection refused", "localhost:9092");
        let display = format!("{}", err);
        assert!(display.contains("localhost:9092"));
        assert!(display.contains("Connection refused"));
    }

    #[test]
    fn test_is_closed() {
        assert!(KafkaError::Closed.is_closed());
        assert!(!KafkaError::consumption("eof", "libtest", Some(0), None).is_closed());
    }

    #[test]
    fn test_rdkafka_conversion() {
        let err: KafkaError =
            rdkafka::error::KafkaError::ClientCreation("bad config".to_string()).into();
        assert!(matches!(err, KafkaError::Connection { .. }));

        let err: KafkaError = rdkafka::error::KafkaError::Canceled.into();
        assert!(err.is_closed());
    }

    #[test]
    fn test_consume_error_keeps_partition_and_gains_topic() {
        let err = KafkaError::from(rdkafka::error::KafkaError::PartitionEOF(3)).with_topic("libtest");

        match err {
            KafkaError::Consumption {
                topic,
                partition,
                offset,
                ..
            } => {
                assert_eq!(topic, "libtest");
                assert_eq!(partition, Some(3));
                assert_eq!(offset, None);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_topic_keeps_known_topic() {
        let err = KafkaError::production("timed out", "producer", Some(1)).with_topic("libtest");
        assert!(err.to_string().contains("topic producer"));

        assert!(KafkaError::Closed.with_topic("libtest").is_closed());
    }
}
