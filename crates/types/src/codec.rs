//! JSON codec for inventory records
//!
//! Decoding is strict about required fields and their types and lenient about
//! extra fields. Encoding cannot fail for the record types defined here, so
//! [`encode`] returns plain bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::inventory::{InventoryRecord, TransformedInventoryRecord};

/// Maximum number of payload bytes kept on a [`CodecError`] for diagnostics
const PAYLOAD_SAMPLE_LEN: usize = 256;

/// Record codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Bytes are not a valid encoding of the expected record shape
    #[error("malformed {shape}: {reason}")]
    MalformedRecord {
        /// Name of the shape that was expected
        shape: &'static str,
        /// Parser diagnostic
        reason: String,
        /// Leading bytes of the offending payload
        payload_sample: Vec<u8>,
    },
}

impl CodecError {
    fn malformed(shape: &'static str, err: serde_json::Error, bytes: &[u8]) -> Self {
        let sample_len = bytes.len().min(PAYLOAD_SAMPLE_LEN);
        CodecError::MalformedRecord {
            shape,
            reason: err.to_string(),
            payload_sample: bytes[..sample_len].to_vec(),
        }
    }

    /// Shape the decoder was expecting
    pub fn shape(&self) -> &'static str {
        match self {
            CodecError::MalformedRecord { shape, .. } => shape,
        }
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// A record shape the codec knows how to carry
pub trait WireRecord: Serialize + DeserializeOwned {
    /// Human-readable shape name used in diagnostics
    const SHAPE: &'static str;
}

impl WireRecord for InventoryRecord {
    const SHAPE: &'static str = "InventoryRecord";
}

impl WireRecord for TransformedInventoryRecord {
    const SHAPE: &'static str = "TransformedInventoryRecord";
}

/// Decode any wire record shape
pub fn decode_as<R: WireRecord>(bytes: &[u8]) -> CodecResult<R> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::malformed(R::SHAPE, e, bytes))
}

/// Decode an [`InventoryRecord`]
pub fn decode(bytes: &[u8]) -> CodecResult<InventoryRecord> {
    decode_as(bytes)
}

/// Decode a [`TransformedInventoryRecord`]
pub fn decode_transformed(bytes: &[u8]) -> CodecResult<TransformedInventoryRecord> {
    decode_as(bytes)
}

/// Encode a record to its JSON wire form
pub fn encode<R: WireRecord>(record: &R) -> Vec<u8> {
    // Plain structs of strings and integers always serialize.
    serde_json::to_vec(record).unwrap_or_default()
}
