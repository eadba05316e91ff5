//! Broker message envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Partition/offset placeholder for messages the broker has not stored yet
pub const UNASSIGNED: i64 = -1;

/// Opaque message as read from or written to a topic
///
/// The relay never interprets `partition` or `offset` beyond logging them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerMessage {
    /// Message key (empty when the producer set none)
    pub key: Vec<u8>,
    /// Message payload
    pub value: Vec<u8>,
    /// Topic name
    pub topic: String,
    /// Partition
    pub partition: i32,
    /// Offset within the partition
    pub offset: i64,
    /// Broker timestamp, if the broker supplied one
    pub timestamp: Option<DateTime<Utc>>,
}

impl BrokerMessage {
    /// Create a message that is about to be published to `topic`
    pub fn outbound(topic: impl Into<String>, key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            key,
            value,
            topic: topic.into(),
            partition: UNASSIGNED as i32,
            offset: UNASSIGNED,
            timestamp: None,
        }
    }

    /// Replace the payload, keeping key and coordinates
    pub fn with_value(mut self, value: Vec<u8>) -> Self {
        self.value = value;
        self
    }

    /// Key rendered for logs
    pub fn key_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    /// Value rendered for logs
    pub fn value_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

impl fmt::Display for BrokerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.topic, self.partition, self.offset)
    }
}
