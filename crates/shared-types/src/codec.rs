//! # Wire Codec
//!
//! Canonical binary encoding for every persisted or gossiped value.
//!
//! Encoding is bincode with fixed-width little-endian integers. Decoding
//! applies a size limit and rejects trailing bytes so that every value has
//! exactly one accepted byte representation.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Upper bound on an encoded transaction.
pub const MAX_TRANSACTION_SIZE: u64 = 64 * 1024;

/// Upper bound on an encoded block.
pub const MAX_BLOCK_SIZE: u64 = 8 * 1024 * 1024;

/// Upper bound on a gossip message.
pub const MAX_GOSSIP_SIZE: u64 = 8 * 1024 * 1024;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

/// Encodes a value to its canonical bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    options()
        .serialize(value)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decodes a value, refusing inputs larger than `limit` bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], limit: u64) -> Result<T, CodecError> {
    if bytes.len() as u64 > limit {
        return Err(CodecError::Decode(format!(
            "input of {} bytes exceeds limit of {}",
            bytes.len(),
            limit
        )));
    }
    options()
        .with_limit(limit)
        .deserialize(bytes)
        .map_err(|e| CodecError::Decode(e.to_string()))
}
