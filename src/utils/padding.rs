//! Random Prefix Padding
//!
//! Write-only padding that prepends a fixed number of cryptographically random
//! bytes to an envelope. The prefix decorrelates envelope content and length
//! patterns on transports that might otherwise leak size or timing
//! information; it is never interpreted on the read path, only stripped.

use crate::error::{EnvelopeError, Result};

/// Fixed-length random prefix applied to outgoing envelopes.
///
/// The length is a serializer-level constant shared out-of-band by producer
/// and consumer; the prefix is not self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomPrefix {
    length: usize,
}

impl RandomPrefix {
    /// Create a prefix of the given length. Zero disables padding.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Configured prefix length in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether padding is disabled.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Prepend `length` bytes from the OS CSPRNG to `body`.
    pub fn apply(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        if self.length == 0 {
            return Ok(body);
        }

        let mut out = vec![0u8; self.length + body.len()];
        getrandom::fill(&mut out[..self.length])
            .map_err(|e| EnvelopeError::Rng(e.to_string()))?;
        out[self.length..].copy_from_slice(&body);
        Ok(out)
    }

    /// Drop exactly the first `length` bytes of `envelope` without inspecting
    /// them. An envelope shorter than the prefix strips to empty; the
    /// downstream decode stage reports the resulting error.
    pub fn strip<'a>(&self, envelope: &'a [u8]) -> &'a [u8] {
        &envelope[self.length.min(envelope.len())..]
    }
}
