//! # Message Codecs
//!
//! Format-specific encoding between structured channel messages and bytes.
//!
//! A message is a [`serde_json::Value`]: the JSON-like structured values a
//! channel layer passes between producers and consumers. Codecs are strategy
//! objects behind the [`MessageCodec`] trait so a serializer can carry any
//! format, and new formats plug in through the registry.
//!
//! ## Built-in Formats
//! - **JSON**: canonical UTF-8 text, universally available
//! - **MessagePack**: compact binary, behind the `msgpack` cargo feature

use crate::error::{EnvelopeError, Result};
use serde_json::Value;

/// Encode/decode between a structured message and bytes.
///
/// `decode` must be total over the errors it reports: bytes not produced by a
/// compatible codec fail with [`EnvelopeError::Format`], never a panic or a
/// silently wrong value. Round-trips are value-for-value, not necessarily
/// byte-for-byte; `decode` accepts any valid encoding of a value, not only
/// the output of a prior `encode`.
pub trait MessageCodec: Send + Sync {
    /// Encode a message to bytes.
    fn encode(&self, message: &Value) -> Result<Vec<u8>>;

    /// Decode bytes back to a message.
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

/// JSON codec producing canonical UTF-8 text regardless of host platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl MessageCodec for JsonCodec {
    fn encode(&self, message: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(message).map_err(|e| EnvelopeError::Format(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(|e| EnvelopeError::Format(e.to_string()))
    }
}

/// Compact binary codec backed by MessagePack.
#[cfg(feature = "msgpack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

#[cfg(feature = "msgpack")]
impl MessageCodec for MsgPackCodec {
    fn encode(&self, message: &Value) -> Result<Vec<u8>> {
        rmp_serde::to_vec(message).map_err(|e| EnvelopeError::Format(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        rmp_serde::from_slice(bytes).map_err(|e| EnvelopeError::Format(e.to_string()))
    }
}

/// Whether the MessagePack codec is compiled into this build.
///
/// The `"msgpack"` registry name exists either way; without the feature its
/// factory fails with [`EnvelopeError::DependencyMissing`] at instantiation.
pub fn msgpack_available() -> bool {
    cfg!(feature = "msgpack")
}
