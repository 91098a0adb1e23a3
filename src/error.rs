//! # Error Types
//!
//! Error taxonomy for the envelope pipeline.
//!
//! Every failure in this crate surfaces synchronously to the immediate caller
//! of `serialize`, `deserialize`, or a registry lookup. The crate performs no
//! retries and no silent recovery; retry policy belongs to the transport.
//!
//! ## Error Categories
//! - **Format Errors**: bytes that do not decode under the selected codec
//! - **Configuration Errors**: malformed construction arguments, caught before
//!   any message is processed
//! - **Cryptographic Errors**: integrity failures and expired tokens
//! - **Registry Errors**: unknown format names, missing optional codecs
//!
//! All errors implement `std::error::Error` for interoperability.

use thiserror::Error;

/// Primary error type for all envelope operations.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Bytes do not decode under the selected codec.
    #[error("format error: {0}")]
    Format(String),

    /// Malformed construction arguments, raised before any message is
    /// processed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An optional codec's backing library is not compiled in. Surfaced
    /// lazily, at first instantiation rather than registration.
    #[error("serializer format '{0}' requires an optional dependency that is not enabled")]
    DependencyMissing(String),

    /// Authentication failed for every configured key. Covers both corrupted
    /// tokens and decryption with the wrong key set.
    #[error("token failed integrity check under all configured keys")]
    Tamper,

    /// The token authenticated but its embedded creation time is outside the
    /// accepted window.
    #[error("token expired: age {age_secs}s exceeds limit {limit_secs}s")]
    Expired {
        /// Seconds since the token's embedded creation time.
        age_secs: u64,
        /// Maximum accepted age, grace window included.
        limit_secs: u64,
    },

    /// Registry lookup for a format name that was never registered.
    #[error("unknown serializer format '{0}'")]
    UnknownFormat(String),

    /// The AEAD backend rejected an encryption request, e.g. a plaintext
    /// beyond the cipher's length limit.
    #[error("encryption failed")]
    Encryption,

    /// The operating system's randomness source failed.
    #[error("system randomness unavailable: {0}")]
    Rng(String),
}

/// Type alias for Results using EnvelopeError
pub type Result<T> = std::result::Result<T, EnvelopeError>;
