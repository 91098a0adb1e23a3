//! # Configuration Management
//!
//! Channel-layer envelope configuration, read once at layer startup.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-variable overrides via `from_env()`
//!
//! A configuration is validated before it is turned into construction
//! arguments, so a malformed key setting fails at startup rather than on the
//! first message.

use crate::core::serializer::SerializerOptions;
use crate::error::{EnvelopeError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

fn default_format() -> String {
    "json".to_string()
}

/// Key setting as it appears in configuration input.
///
/// Only the list form is valid; the single form exists so that an operator
/// supplying a bare secret where a list of possible keys is required gets a
/// configuration error instead of silent misbehavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeySetting {
    /// A list of possible keys, first key primary.
    List(Vec<String>),
    /// A bare secret. Always rejected by validation.
    Single(String),
}

impl Default for KeySetting {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Envelope configuration for one channel layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvelopeConfig {
    /// Registered serializer format name.
    #[serde(default = "default_format")]
    pub format: String,

    /// Symmetric encryption keys; empty list disables encryption.
    #[serde(default)]
    pub symmetric_encryption_keys: KeySetting,

    /// Random prefix length in bytes; 0 disables padding.
    #[serde(default)]
    pub random_prefix_length: usize,

    /// Message expiry in seconds; absent disables the age check.
    #[serde(default)]
    pub expiry: Option<u64>,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            symmetric_encryption_keys: KeySetting::default(),
            random_prefix_length: 0,
            expiry: None,
        }
    }
}

impl EnvelopeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| EnvelopeError::Config(format!("failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| EnvelopeError::Config(format!("failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| EnvelopeError::Config(format!("failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(format) = std::env::var("CHANNEL_ENVELOPE_FORMAT") {
            config.format = format;
        }

        if let Ok(keys) = std::env::var("CHANNEL_ENVELOPE_KEYS") {
            config.symmetric_encryption_keys = KeySetting::List(
                keys.split(',')
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }

        if let Ok(length) = std::env::var("CHANNEL_ENVELOPE_RANDOM_PREFIX_LENGTH") {
            config.random_prefix_length = length
                .parse()
                .map_err(|e| EnvelopeError::Config(format!("invalid prefix length: {e}")))?;
        }

        if let Ok(expiry) = std::env::var("CHANNEL_ENVELOPE_EXPIRY") {
            config.expiry = Some(
                expiry
                    .parse()
                    .map_err(|e| EnvelopeError::Config(format!("invalid expiry: {e}")))?,
            );
        }

        Ok(config)
    }

    /// Validate the configuration without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.format.is_empty() {
            return Err(EnvelopeError::Config(
                "serializer format name must not be empty".into(),
            ));
        }

        if let KeySetting::Single(_) = self.symmetric_encryption_keys {
            return Err(EnvelopeError::Config(
                "symmetric_encryption_keys must be a list of possible keys".into(),
            ));
        }

        Ok(())
    }

    /// Convert a validated configuration into serializer construction
    /// arguments.
    pub fn options(&self) -> Result<SerializerOptions> {
        self.validate()?;

        let keys = match &self.symmetric_encryption_keys {
            KeySetting::List(keys) => keys.clone(),
            // validate() already rejected the single form
            KeySetting::Single(_) => unreachable!(),
        };

        debug!(
            format = %self.format,
            keys = keys.len(),
            prefix = self.random_prefix_length,
            expiry = ?self.expiry,
            "resolved envelope configuration"
        );

        let mut options = SerializerOptions::new()
            .with_keys(keys)
            .with_random_prefix(self.random_prefix_length);
        options.expiry = self.expiry;
        Ok(options)
    }
}
