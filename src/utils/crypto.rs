//! Multi-Key Authenticated Encryption
//!
//! XChaCha20-Poly1305 token encryption with key-rotation support. Operators
//! supply secrets of any length; each secret is derived to a fixed 32-byte
//! key via SHA-256 before a cipher is built from it.
//!
//! Rotation works by list order: the first key encrypts every new token, and
//! all keys are tried in order on decryption. Rolling a secret means
//! prepending the new one and keeping the old one in the list until no token
//! encrypted under it can still be in flight.
//!
//! ## Token Format
//! ```text
//! [Version(1)] [Timestamp(8, BE seconds)] [Nonce(24)] [Ciphertext + Tag(16)]
//! ```
//! Version and timestamp are fed to the AEAD as associated data, so a forged
//! creation time fails authentication before any age check runs.

use crate::error::{EnvelopeError, Result};
use crate::utils::time::unix_timestamp;

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Allowance added to `expiry` to absorb queueing delay and clock skew
/// between producer and consumer. Also bounds how far in the future a token's
/// creation time may lie before it is rejected as unverifiable.
pub const GRACE_PERIOD_SECS: u64 = 10;

/// Token format version for this deployment's AEAD scheme.
const TOKEN_VERSION: u8 = 0x01;

/// Version byte plus big-endian creation timestamp.
const HEADER_LEN: usize = 9;

/// XChaCha20 extended nonce.
const NONCE_LEN: usize = 24;

/// Poly1305 authentication tag.
const TAG_LEN: usize = 16;

/// Shortest well-formed token: header, nonce, and the tag of an empty
/// plaintext.
const MIN_TOKEN_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// An operator-supplied secret of arbitrary length. Never used directly as
/// key material; see [`MultiKeyCrypter`].
///
/// The raw bytes are zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap raw secret material.
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self(material.into())
    }

    fn material(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SecretKey {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for SecretKey {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&[u8]> for SecretKey {
    fn from(b: &[u8]) -> Self {
        Self(b.to_vec())
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(b: Vec<u8>) -> Self {
        Self(b)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Ordered set of ciphers backing one serializer's encryption layer.
///
/// Immutable after construction and safe to share across threads; each
/// `encrypt`/`decrypt` call is independent.
pub struct MultiKeyCrypter {
    ciphers: Vec<XChaCha20Poly1305>,
}

impl MultiKeyCrypter {
    /// Build one cipher per secret, preserving list order. The first key is
    /// primary: it encrypts all new tokens.
    pub fn new(keys: &[SecretKey]) -> Result<Self> {
        if keys.is_empty() {
            return Err(EnvelopeError::Config(
                "at least one symmetric encryption key is required".into(),
            ));
        }

        let ciphers = keys
            .iter()
            .map(|key| {
                let mut derived = [0u8; 32];
                derived.copy_from_slice(&Sha256::digest(key.material()));
                let cipher = XChaCha20Poly1305::new(Key::from_slice(&derived));
                derived.zeroize();
                cipher
            })
            .collect();

        debug!(key_count = keys.len(), "encryption layer initialized");
        Ok(Self { ciphers })
    }

    /// Number of configured keys.
    pub fn key_count(&self) -> usize {
        self.ciphers.len()
    }

    /// Encrypt `plaintext` into a token under the primary key, stamping the
    /// current wall-clock time as the creation timestamp.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_at(plaintext, unix_timestamp())
    }

    pub(crate) fn encrypt_at(&self, plaintext: &[u8], created_at: u64) -> Result<Vec<u8>> {
        let mut header = [0u8; HEADER_LEN];
        header[0] = TOKEN_VERSION;
        header[1..].copy_from_slice(&created_at.to_be_bytes());

        let mut nonce = [0u8; NONCE_LEN];
        getrandom::fill(&mut nonce).map_err(|e| EnvelopeError::Rng(e.to_string()))?;

        let ciphertext = self.ciphers[0]
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|_| EnvelopeError::Encryption)?;

        let mut token = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&header);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);
        Ok(token)
    }

    /// Decrypt a token, trying every key in list order and returning the
    /// first authenticating plaintext.
    ///
    /// When `ttl` is set, the token's embedded creation time must satisfy
    /// `age <= ttl + GRACE_PERIOD_SECS`; older tokens fail with
    /// [`EnvelopeError::Expired`]. When `ttl` is `None`, age is never
    /// checked, but integrity always is.
    pub fn decrypt(&self, token: &[u8], ttl: Option<u64>) -> Result<Vec<u8>> {
        if token.len() < MIN_TOKEN_LEN || token[0] != TOKEN_VERSION {
            return Err(EnvelopeError::Tamper);
        }

        let header = &token[..HEADER_LEN];
        let mut ts_bytes = [0u8; 8];
        ts_bytes.copy_from_slice(&token[1..HEADER_LEN]);
        let created_at = u64::from_be_bytes(ts_bytes);

        let nonce = XNonce::from_slice(&token[HEADER_LEN..HEADER_LEN + NONCE_LEN]);
        let ciphertext = &token[HEADER_LEN + NONCE_LEN..];

        for cipher in &self.ciphers {
            if let Ok(plaintext) = cipher.decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: header,
                },
            ) {
                check_token_age(created_at, ttl, unix_timestamp())?;
                return Ok(plaintext);
            }
        }

        warn!("token failed authentication under all configured keys");
        Err(EnvelopeError::Tamper)
    }
}

impl fmt::Debug for MultiKeyCrypter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiKeyCrypter")
            .field("key_count", &self.ciphers.len())
            .finish()
    }
}

/// Validate a token's age against `ttl + GRACE_PERIOD_SECS`.
///
/// Fail-closed: a creation time more than the grace window in the future
/// cannot be aged reliably and is rejected as expired.
fn check_token_age(created_at: u64, ttl: Option<u64>, now: u64) -> Result<()> {
    let Some(ttl) = ttl else {
        return Ok(());
    };

    let limit = ttl.saturating_add(GRACE_PERIOD_SECS);
    if created_at > now.saturating_add(GRACE_PERIOD_SECS) {
        warn!(created_at, now, "rejecting future-dated token");
        return Err(EnvelopeError::Expired {
            age_secs: 0,
            limit_secs: limit,
        });
    }

    let age = now.saturating_sub(created_at);
    if age > limit {
        warn!(age, limit, "rejecting expired token");
        return Err(EnvelopeError::Expired {
            age_secs: age,
            limit_secs: limit,
        });
    }
    Ok(())
}
