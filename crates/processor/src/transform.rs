//! Per-record transformation
//!
//! A [`Transformer`] turns one consumed message into the message handed to
//! the producer stage. It runs synchronously inside the consumer loop and
//! must not fetch or publish.

use inventory_relay_types::{decode, encode, BrokerMessage};

use crate::error::{ProcessorError, Result, Stage};

/// Pluggable per-record logic
pub trait Transformer: Send + Sync {
    /// Transform one message
    fn run(&self, message: BrokerMessage) -> Result<BrokerMessage>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Zeroes quantities below a threshold
///
/// Decodes an `InventoryRecord`, sets `actual_qty_updated` to 0 when
/// `actual_qty < threshold` (otherwise to `actual_qty`), and encodes the
/// resulting `TransformedInventoryRecord`. Key and coordinates are kept.
#[derive(Debug, Clone)]
pub struct QuantityFloorTransformer {
    threshold: i64,
}

impl QuantityFloorTransformer {
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    fn floor(&self, qty: i64) -> i64 {
        if qty < self.threshold {
            0
        } else {
            qty
        }
    }
}

impl Default for QuantityFloorTransformer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Transformer for QuantityFloorTransformer {
    fn run(&self, message: BrokerMessage) -> Result<BrokerMessage> {
        let record = decode(&message.value)
            .map_err(|e| ProcessorError::malformed(Stage::Consumer, message.to_string(), e))?;

        let updated = self.floor(record.actual_qty);
        let value = encode(&record.with_updated_qty(updated));

        Ok(message.with_value(value))
    }

    fn name(&self) -> &str {
        "quantity_floor"
    }
}

/// Adapts a closure into a [`Transformer`]
pub struct FnTransformer<F> {
    name: String,
    func: F,
}

impl<F> FnTransformer<F>
where
    F: Fn(BrokerMessage) -> Result<BrokerMessage> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Transformer for FnTransformer<F>
where
    F: Fn(BrokerMessage) -> Result<BrokerMessage> + Send + Sync,
{
    fn run(&self, message: BrokerMessage) -> Result<BrokerMessage> {
        (self.func)(message)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
