//! # Envelope Serializer
//!
//! Composition of codec, optional encryption, and optional random padding
//! into one serialize/deserialize pair.
//!
//! ## Envelope Layout
//! ```text
//! [Random Prefix(N)] [Token]
//! ```
//! where the token is raw codec output when no keys are configured, or an
//! authenticated-encryption token otherwise. The prefix length and the
//! encryption on/off decision are shared out-of-band: producer and consumer
//! hold identically configured serializers.

use crate::core::codec::MessageCodec;
use crate::error::Result;
use crate::utils::crypto::{MultiKeyCrypter, SecretKey};
use crate::utils::padding::RandomPrefix;

use serde_json::Value;
use std::fmt;

/// Per-channel-layer construction arguments for a serializer.
///
/// Passed to [`SerializerRegistry::get`](crate::core::registry::SerializerRegistry::get)
/// on every call, so one registered format can back any number of
/// independently configured layers.
#[derive(Debug, Clone, Default)]
pub struct SerializerOptions {
    /// Ordered encryption keys; empty disables encryption. The first key
    /// encrypts, all keys are tried on decryption.
    pub symmetric_encryption_keys: Vec<SecretKey>,
    /// Number of random bytes prepended to each envelope; 0 disables padding.
    pub random_prefix_length: usize,
    /// Message expiry in seconds; `None` disables the age check.
    pub expiry: Option<u64>,
}

impl SerializerOptions {
    /// Options with encryption, padding, and expiry all disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordered key list.
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SecretKey>,
    {
        self.symmetric_encryption_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the random prefix length.
    pub fn with_random_prefix(mut self, length: usize) -> Self {
        self.random_prefix_length = length;
        self
    }

    /// Set the message expiry in seconds.
    pub fn with_expiry(mut self, secs: u64) -> Self {
        self.expiry = Some(secs);
        self
    }
}

/// A configured serialize/deserialize pair for one channel layer.
///
/// Built once at layer startup and immutable afterward; `serialize` and
/// `deserialize` are safe for unbounded concurrent use through `&self` with
/// no external locking.
pub struct MessageSerializer {
    codec: Box<dyn MessageCodec>,
    crypter: Option<MultiKeyCrypter>,
    prefix: RandomPrefix,
    expiry: Option<u64>,
}

impl MessageSerializer {
    /// Compose `codec` with the encryption and padding described by
    /// `options`.
    ///
    /// Misconfiguration surfaces here as [`EnvelopeError::Config`], before
    /// any message is processed.
    ///
    /// [`EnvelopeError::Config`]: crate::error::EnvelopeError::Config
    pub fn new(codec: Box<dyn MessageCodec>, options: SerializerOptions) -> Result<Self> {
        let crypter = if options.symmetric_encryption_keys.is_empty() {
            None
        } else {
            Some(MultiKeyCrypter::new(&options.symmetric_encryption_keys)?)
        };

        Ok(Self {
            codec,
            crypter,
            prefix: RandomPrefix::new(options.random_prefix_length),
            expiry: options.expiry,
        })
    }

    /// Whether this serializer encrypts its payload.
    pub fn is_encrypted(&self) -> bool {
        self.crypter.is_some()
    }

    /// Serialize a message to wire bytes: encode, encrypt if keys are
    /// configured, then pad. Encryption sees the codec output, never the
    /// padded form, so padding never participates in the authenticated
    /// payload.
    pub fn serialize(&self, message: &Value) -> Result<Vec<u8>> {
        let mut body = self.codec.encode(message)?;
        if let Some(crypter) = &self.crypter {
            body = crypter.encrypt(&body)?;
        }
        self.prefix.apply(body)
    }

    /// Deserialize wire bytes back to a message: strip the prefix, decrypt if
    /// keys are configured, then decode. Any stage error propagates unchanged.
    pub fn deserialize(&self, envelope: &[u8]) -> Result<Value> {
        let body = self.prefix.strip(envelope);
        match &self.crypter {
            Some(crypter) => {
                let plaintext = crypter.decrypt(body, self.expiry)?;
                self.codec.decode(&plaintext)
            }
            None => self.codec.decode(body),
        }
    }
}

impl fmt::Debug for MessageSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSerializer")
            .field("encrypted", &self.crypter.is_some())
            .field("random_prefix_length", &self.prefix.len())
            .field("expiry", &self.expiry)
            .finish()
    }
}
