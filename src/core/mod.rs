//! # Core Envelope Components
//!
//! Codecs, the serializer pipeline, and the format registry.
//!
//! ## Components
//! - **Codec**: format-specific encode/decode between messages and bytes
//! - **Serializer**: codec → encryption → padding composed into one pair
//! - **Registry**: name-keyed serializer factories with deferred-failure
//!   placeholders for optional formats
//!
//! ## Envelope Format
//! ```text
//! [Random Prefix(N)] [Token]
//! ```

pub mod codec;
pub mod registry;
pub mod serializer;
