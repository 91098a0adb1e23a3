//! # Utility Modules
//!
//! Supporting utilities for cryptography, padding, and timing.
//!
//! ## Components
//! - **Crypto**: XChaCha20-Poly1305 multi-key token encryption with rotation
//! - **Padding**: fixed-length random envelope prefix
//! - **Time**: timestamp helper for expiry checks
//!
//! ## Security
//! - Cryptographically secure RNG (getrandom)
//! - Memory zeroing for secret material (zeroize crate)

pub mod crypto;
pub mod padding;
pub mod time;

pub use crypto::{MultiKeyCrypter, SecretKey, GRACE_PERIOD_SECS};
pub use padding::RandomPrefix;
