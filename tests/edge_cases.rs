//! Edge-case tests for the envelope pipeline
//!
//! Malformed input, boundary sizes, and configurations at the ends of their
//! ranges.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use channel_envelope::{
    EnvelopeError, MessageSerializer, JsonCodec, SerializerOptions, SerializerRegistry,
};
use serde_json::{json, Value};

fn json_serializer(options: SerializerOptions) -> MessageSerializer {
    MessageSerializer::new(Box::new(JsonCodec), options).unwrap()
}

#[test]
fn scalar_and_empty_values_roundtrip() {
    let s = json_serializer(SerializerOptions::new().with_keys(["k"]));
    for message in [
        json!(null),
        json!(true),
        json!(0),
        json!(-1.5),
        json!(""),
        json!({}),
        json!([]),
    ] {
        let wire = s.serialize(&message).unwrap();
        assert_eq!(s.deserialize(&wire).unwrap(), message);
    }
}

#[test]
fn deeply_nested_message() {
    let mut message = json!("leaf");
    for _ in 0..32 {
        message = json!({ "child": message });
    }
    let s = json_serializer(SerializerOptions::new().with_keys(["k"]).with_random_prefix(4));
    let wire = s.serialize(&message).unwrap();
    assert_eq!(s.deserialize(&wire).unwrap(), message);
}

#[test]
fn large_message() {
    let payload: Vec<Value> = (0..10_000).map(|i| json!(i)).collect();
    let message = json!({ "items": payload });
    let s = json_serializer(SerializerOptions::new().with_keys(["k"]));
    let wire = s.serialize(&message).unwrap();
    assert_eq!(s.deserialize(&wire).unwrap(), message);
}

#[test]
fn empty_envelope_without_keys_is_a_format_error() {
    let s = json_serializer(SerializerOptions::new());
    assert!(matches!(s.deserialize(b""), Err(EnvelopeError::Format(_))));
}

#[test]
fn empty_envelope_with_keys_is_tamper() {
    let s = json_serializer(SerializerOptions::new().with_keys(["k"]));
    assert!(matches!(s.deserialize(b""), Err(EnvelopeError::Tamper)));
}

#[test]
fn envelope_shorter_than_prefix() {
    let s = json_serializer(SerializerOptions::new().with_random_prefix(64));
    // Strips to empty, then the codec reports the failure.
    assert!(matches!(s.deserialize(b"abc"), Err(EnvelopeError::Format(_))));
}

#[test]
fn plaintext_envelope_into_encrypted_serializer() {
    let plain = json_serializer(SerializerOptions::new());
    let encrypted = json_serializer(SerializerOptions::new().with_keys(["k"]));

    let wire = plain.serialize(&json!({"a": 1})).unwrap();
    assert!(matches!(
        encrypted.deserialize(&wire),
        Err(EnvelopeError::Tamper)
    ));
}

#[test]
fn encrypted_envelope_into_plaintext_serializer() {
    let plain = json_serializer(SerializerOptions::new());
    let encrypted = json_serializer(SerializerOptions::new().with_keys(["k"]));

    let wire = encrypted.serialize(&json!({"a": 1})).unwrap();
    assert!(matches!(
        plain.deserialize(&wire),
        Err(EnvelopeError::Format(_))
    ));
}

#[test]
fn mismatched_prefix_lengths_fail_closed() {
    let sender = json_serializer(SerializerOptions::new().with_keys(["k"]).with_random_prefix(4));
    let receiver = json_serializer(SerializerOptions::new().with_keys(["k"]).with_random_prefix(8));

    let wire = sender.serialize(&json!({"a": 1})).unwrap();
    assert!(matches!(
        receiver.deserialize(&wire),
        Err(EnvelopeError::Tamper)
    ));
}

#[test]
fn empty_key_list_means_no_encryption() {
    let s = json_serializer(SerializerOptions::new().with_keys(Vec::<String>::new()));
    assert!(!s.is_encrypted());
    let wire = s.serialize(&json!({"a": 1})).unwrap();
    assert_eq!(wire, br#"{"a":1}"#.to_vec());
}

#[test]
fn very_old_token_without_expiry_still_reads() {
    // expiry unset: age is never checked, even across serializer instances.
    let writer = json_serializer(SerializerOptions::new().with_keys(["k"]));
    let reader = json_serializer(SerializerOptions::new().with_keys(["k"]));
    let wire = writer.serialize(&json!({"a": 1})).unwrap();
    assert_eq!(reader.deserialize(&wire).unwrap(), json!({"a": 1}));
}

#[test]
fn registry_register_is_never_fallible() {
    // Registering a factory that always fails is fine; the failure is
    // deferred to instantiation.
    let registry = SerializerRegistry::new();
    registry.register("doomed", || {
        Err(EnvelopeError::DependencyMissing("doomed".into()))
    });
    assert!(registry.contains("doomed"));
    assert!(matches!(
        registry.get("doomed", SerializerOptions::new()),
        Err(EnvelopeError::DependencyMissing(_))
    ));
}

#[test]
fn format_names_are_case_sensitive() {
    let registry = SerializerRegistry::with_builtins();
    assert!(registry.contains("json"));
    assert!(!registry.contains("JSON"));
}
