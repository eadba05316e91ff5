//! Broker seams used by the pipeline stages

use async_trait::async_trait;
use inventory_relay_types::BrokerMessage;

use super::error::Result;

/// Reads messages from the source topic under a consumer group
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next message
    ///
    /// Any error ends the consumer loop.
    async fn fetch(&mut self) -> Result<BrokerMessage>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Writes messages to the destination topic
#[async_trait]
pub trait MessageSink: Send {
    /// Publish a batch, in order; fails if any message is not delivered
    async fn publish(&mut self, batch: &[BrokerMessage]) -> Result<()>;

    /// Flush outstanding deliveries and release the connection
    async fn close(&mut self) -> Result<()>;
}
