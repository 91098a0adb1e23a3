//! # Serializer Registry
//!
//! Name-keyed factory map for serializer formats.
//!
//! The registry is an explicit value constructed at process startup (no
//! hidden global): build it with [`SerializerRegistry::with_builtins`], pass
//! it by reference to whatever configures channel layers, and treat it as
//! append-only afterward. `get` is the hot read path and takes a shared lock;
//! `register` is a rare administrative write.
//!
//! Optional formats follow a deferred-dependency pattern: a format whose
//! backing library is compiled out is still registered under its name, with a
//! factory that fails only when a serializer is actually instantiated. The
//! name stays declared without imposing a hard dependency on unused features.

use crate::core::codec::{JsonCodec, MessageCodec};
use crate::core::serializer::{MessageSerializer, SerializerOptions};
use crate::error::{EnvelopeError, Result};

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

#[cfg(feature = "msgpack")]
use crate::core::codec::MsgPackCodec;

/// Factory producing a fresh codec instance, or the deferred error of an
/// unavailable optional format.
pub type CodecFactory = Box<dyn Fn() -> Result<Box<dyn MessageCodec>> + Send + Sync>;

/// Process-wide mapping from format name to codec factory.
pub struct SerializerRegistry {
    formats: RwLock<HashMap<String, CodecFactory>>,
}

impl SerializerRegistry {
    /// An empty registry with no formats.
    pub fn new() -> Self {
        Self {
            formats: RwLock::new(HashMap::new()),
        }
    }

    /// A registry pre-populated with the built-in formats: `"json"` always,
    /// and `"msgpack"` either live or as a deferred-failure placeholder
    /// depending on the `msgpack` cargo feature.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register("json", || Ok(Box::new(JsonCodec) as Box<dyn MessageCodec>));

        #[cfg(feature = "msgpack")]
        registry.register("msgpack", || {
            Ok(Box::new(MsgPackCodec) as Box<dyn MessageCodec>)
        });

        #[cfg(not(feature = "msgpack"))]
        registry.register("msgpack", || {
            Err(EnvelopeError::DependencyMissing("msgpack".into()))
        });

        registry
    }

    /// Register a codec factory under `format`, overwriting any existing
    /// entry for that name. Intended for startup-time configuration, not
    /// steady-state use.
    pub fn register<F>(&self, format: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn MessageCodec>> + Send + Sync + 'static,
    {
        let mut formats = self
            .formats
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let replaced = formats
            .insert(format.to_string(), Box::new(factory))
            .is_some();
        debug!(format, replaced, "registered serializer format");
    }

    /// Instantiate a new serializer for `format` with the caller's
    /// construction arguments. Nothing is cached: every call builds a fresh
    /// [`MessageSerializer`], so one format can back any number of
    /// independently configured channel layers.
    pub fn get(&self, format: &str, options: SerializerOptions) -> Result<MessageSerializer> {
        let codec = {
            let formats = self
                .formats
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let factory = formats
                .get(format)
                .ok_or_else(|| EnvelopeError::UnknownFormat(format.to_string()))?;
            factory()?
        };

        debug!(format, "instantiating serializer");
        MessageSerializer::new(codec, options)
    }

    /// Whether `format` is registered (its dependencies may still be
    /// missing; see [`SerializerRegistry::get`]).
    pub fn contains(&self, format: &str) -> bool {
        self.formats
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(format)
    }

    /// Names of all registered formats, in no particular order.
    pub fn formats(&self) -> Vec<String> {
        self.formats
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
