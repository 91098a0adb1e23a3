//! # channel-envelope
//!
//! Serialization and encryption envelope pipeline for channel-layer
//! messaging.
//!
//! This crate turns a structured application message into a byte string
//! suitable for an external pub/sub transport and reverses the transformation
//! on receipt. It composes three independently optional layers into one
//! contract:
//!
//! - **Codec**: pluggable wire formats (JSON built in, MessagePack behind the
//!   `msgpack` feature)
//! - **Encryption**: multi-key authenticated encryption with rotation support
//!   and fail-closed expiry checking
//! - **Padding**: fixed-length random prefix to decorrelate envelope
//!   lengths and content
//!
//! The transport itself (broker clients, connection handling, dispatch) is
//! out of scope: it calls [`MessageSerializer::serialize`] before publishing
//! and [`MessageSerializer::deserialize`] after receiving, and never inspects
//! envelope internals.
//!
//! ## Usage
//! ```
//! use channel_envelope::{SerializerOptions, SerializerRegistry};
//! use serde_json::json;
//!
//! # fn main() -> channel_envelope::Result<()> {
//! let registry = SerializerRegistry::with_builtins();
//! let serializer = registry.get(
//!     "json",
//!     SerializerOptions::new()
//!         .with_keys(["current-secret", "previous-secret"])
//!         .with_random_prefix(8)
//!         .with_expiry(60),
//! )?;
//!
//! let wire = serializer.serialize(&json!({"type": "chat.message"}))?;
//! let message = serializer.deserialize(&wire)?;
//! assert_eq!(message, json!({"type": "chat.message"}));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//! A constructed serializer is immutable and safe for unbounded concurrent
//! use; the registry's read path takes a shared lock, and registration is a
//! rare startup-time write.

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use config::EnvelopeConfig;
pub use core::codec::{msgpack_available, JsonCodec, MessageCodec};
pub use core::registry::SerializerRegistry;
pub use core::serializer::{MessageSerializer, SerializerOptions};
pub use error::{EnvelopeError, Result};
pub use utils::crypto::{SecretKey, GRACE_PERIOD_SECS};

#[cfg(feature = "msgpack")]
pub use core::codec::MsgPackCodec;
