//! Integration tests for the envelope pipeline
//!
//! Exercises the registry-built serializers end to end: plain JSON,
//! encrypted tokens, key rotation, and random prefix padding.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use channel_envelope::{
    EnvelopeConfig, EnvelopeError, SerializerOptions, SerializerRegistry,
};
use serde_json::json;

#[test]
fn plain_json_envelope_is_the_utf8_text() {
    let registry = SerializerRegistry::with_builtins();
    let s = registry.get("json", SerializerOptions::new()).unwrap();

    let wire = s.serialize(&json!({"a": 1})).unwrap();
    assert_eq!(wire, br#"{"a":1}"#.to_vec());
    assert_eq!(s.deserialize(&wire).unwrap(), json!({"a": 1}));

    // Any valid JSON encoding of the value deserializes, not only our own
    // encode output.
    assert_eq!(s.deserialize(br#"{ "a" : 1 }"#).unwrap(), json!({"a": 1}));
}

#[test]
fn encrypted_envelope_roundtrip_and_tamper() {
    let registry = SerializerRegistry::with_builtins();
    let s = registry
        .get("json", SerializerOptions::new().with_keys(["secret"]))
        .unwrap();

    let message = json!({"type": "chat.message", "text": "hello"});
    let wire = s.serialize(&message).unwrap();
    assert_eq!(s.deserialize(&wire).unwrap(), message);

    for position in [0, wire.len() / 2, wire.len() - 1] {
        let mut corrupted = wire.clone();
        corrupted[position] ^= 0x01;
        assert!(
            matches!(s.deserialize(&corrupted), Err(EnvelopeError::Tamper)),
            "flipping byte {position} must fail authentication"
        );
    }
}

#[test]
fn key_rotation_across_serializers() {
    let registry = SerializerRegistry::with_builtins();
    let message = json!({"seq": 42});

    let fresh = registry
        .get("json", SerializerOptions::new().with_keys(["new-key"]))
        .unwrap();
    let wire = fresh.serialize(&message).unwrap();

    // Rotated consumer holds [new, old] and reads the new token.
    let rotated = registry
        .get(
            "json",
            SerializerOptions::new().with_keys(["new-key", "old-key"]),
        )
        .unwrap();
    assert_eq!(rotated.deserialize(&wire).unwrap(), message);

    // A consumer that never rotated cannot.
    let stale = registry
        .get("json", SerializerOptions::new().with_keys(["old-key"]))
        .unwrap();
    assert!(matches!(
        stale.deserialize(&wire),
        Err(EnvelopeError::Tamper)
    ));

    // Tokens published before rotation stay readable after it.
    let old_wire = stale.serialize(&message).unwrap();
    assert_eq!(rotated.deserialize(&old_wire).unwrap(), message);
}

#[test]
fn random_prefix_varies_output_not_value() {
    let registry = SerializerRegistry::with_builtins();
    let s = registry
        .get("json", SerializerOptions::new().with_random_prefix(4))
        .unwrap();

    let message = json!({"a": 1});
    let one = s.serialize(&message).unwrap();
    let two = s.serialize(&message).unwrap();

    assert_eq!(one.len(), two.len());
    assert_ne!(one, two);
    assert_eq!(&one[4..], &two[4..]);
    assert_eq!(s.deserialize(&one).unwrap(), message);
    assert_eq!(s.deserialize(&two).unwrap(), message);
}

#[test]
fn all_layers_together() {
    let registry = SerializerRegistry::with_builtins();
    let s = registry
        .get(
            "json",
            SerializerOptions::new()
                .with_keys(["k1", "k0"])
                .with_random_prefix(16)
                .with_expiry(3600),
        )
        .unwrap();

    let message = json!({"nested": {"list": [1, 2, 3]}, "unicode": "héllo ☃"});
    let wire = s.serialize(&message).unwrap();
    assert_eq!(s.deserialize(&wire).unwrap(), message);
}

#[test]
fn unknown_format_lookup() {
    let registry = SerializerRegistry::with_builtins();
    match registry.get("unknown", SerializerOptions::new()) {
        Err(EnvelopeError::UnknownFormat(name)) => assert_eq!(name, "unknown"),
        other => panic!("expected UnknownFormat, got {other:?}"),
    }
}

#[cfg(feature = "msgpack")]
#[test]
fn msgpack_envelope_roundtrip() {
    let registry = SerializerRegistry::with_builtins();
    let s = registry
        .get(
            "msgpack",
            SerializerOptions::new().with_keys(["secret"]).with_random_prefix(8),
        )
        .unwrap();

    let message = json!({"binary-ish": [0, 255, 128], "flag": false});
    let wire = s.serialize(&message).unwrap();
    assert_eq!(s.deserialize(&wire).unwrap(), message);
}

#[test]
fn config_driven_setup() {
    let registry = SerializerRegistry::with_builtins();
    let config = EnvelopeConfig::from_toml(
        r#"
        format = "json"
        symmetric_encryption_keys = ["s3cret"]
        random_prefix_length = 8
        "#,
    )
    .unwrap();

    let s = registry.get(&config.format, config.options().unwrap()).unwrap();
    let wire = s.serialize(&json!({"configured": true})).unwrap();
    assert_eq!(s.deserialize(&wire).unwrap(), json!({"configured": true}));
}
