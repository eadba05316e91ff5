//! Core types for inventory-relay
//!
//! This crate provides the inventory record shapes, their JSON codec, and the
//! broker message envelope shared by the processor and the CLI.

pub mod codec;
pub mod inventory;
pub mod message;

pub use codec::{decode, decode_as, decode_transformed, encode, CodecError, CodecResult, WireRecord};
pub use inventory::{InventoryRecord, TransformedInventoryRecord};
pub use message::BrokerMessage;
