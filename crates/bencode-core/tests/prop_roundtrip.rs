/// Property-Based Roundtrip Tests for Bencode
///
/// Uses the `proptest` crate to generate random `Value` trees and verify:
///
/// - `decode(encode(v)) == [v]` for every generated value
/// - dictionary encoding ignores insertion order
/// - decode → encode of canonical bytes is byte-identical
/// - concatenated encodings decode to the original sequence
/// - strict mode accepts everything the encoder produces
/// - the JSON bridge maps every value back to itself
/// - arbitrary input bytes never panic the decoder
use bencode_core::json::{from_json, to_json};
use bencode_core::{
    decode_from_bytes, decode_from_bytes_with, encode_to_vec, DecodeOptions, Dictionary, Value,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Random byte string, biased toward bytes that are structurally meaningful.
fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..24),
        "[a-z0-9:ield-]{0,12}".prop_map(String::into_bytes),
        "\\$hex(:[0-9a-f]{0,4})?".prop_map(String::into_bytes),
        Just(Vec::new()),
    ]
}

fn arb_integer() -> impl Strategy<Value = i64> {
    prop_oneof![
        any::<i64>(),
        -1000i64..1000,
        Just(0),
        Just(i64::MIN),
        Just(i64::MAX),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_integer().prop_map(Value::Integer),
        arb_bytes().prop_map(Value::ByteString),
    ]
}

/// Random value tree up to 4 levels deep.
fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
            prop::collection::btree_map(arb_bytes(), inner, 0..8).prop_map(Value::Dictionary),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn roundtrip_any_value(value in arb_value()) {
        let bytes = encode_to_vec(&value).unwrap();
        let decoded = decode_from_bytes(&bytes).into_result().unwrap();
        prop_assert_eq!(decoded, vec![value]);
    }

    #[test]
    fn reencode_is_byte_identical(value in arb_value()) {
        let bytes = encode_to_vec(&value).unwrap();
        let decoded = decode_from_bytes(&bytes).into_result().unwrap();
        prop_assert_eq!(encode_to_vec(&decoded[0]).unwrap(), bytes);
    }

    #[test]
    fn dictionary_bytes_ignore_insertion_order(
        pairs in prop::collection::vec((arb_bytes(), arb_leaf()), 0..12)
    ) {
        let mut forward = Dictionary::new();
        for (k, v) in pairs.iter().cloned() {
            forward.insert(k, v);
        }
        // Rebuild in reverse, keeping the same winner for duplicate keys.
        let mut backward = Dictionary::new();
        for (k, v) in pairs.iter().rev().cloned() {
            backward.entry(k).or_insert(v);
        }
        prop_assert_eq!(
            encode_to_vec(&Value::Dictionary(forward)).unwrap(),
            encode_to_vec(&Value::Dictionary(backward)).unwrap()
        );
    }

    #[test]
    fn strict_decode_accepts_encoder_output(value in arb_value()) {
        let bytes = encode_to_vec(&value).unwrap();
        let strict = decode_from_bytes_with(&bytes, DecodeOptions::strict());
        prop_assert!(strict.is_ok(), "strict decode rejected encoder output: {:?}", strict.error);
        prop_assert_eq!(strict.values, vec![value]);
    }

    #[test]
    fn json_bridge_roundtrips(value in arb_value()) {
        prop_assert_eq!(from_json(&to_json(&value)).unwrap(), value);
    }

    #[test]
    fn concatenated_values_decode_in_order(values in prop::collection::vec(arb_value(), 0..6)) {
        let mut bytes = Vec::new();
        for value in &values {
            bytes.extend(encode_to_vec(value).unwrap());
        }
        let decoded = decode_from_bytes(&bytes).into_result().unwrap();
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn arbitrary_input_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let outcome = decode_from_bytes(&bytes);
        for value in &outcome.values {
            prop_assert!(encode_to_vec(value).is_ok());
        }
    }

    #[test]
    fn truncating_an_encoding_always_fails(
        value in arb_value(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = encode_to_vec(&value).unwrap();
        let len = cut.index(bytes.len());
        let outcome = decode_from_bytes(&bytes[..len]);
        if len == 0 {
            prop_assert!(outcome.is_ok() && outcome.values.is_empty());
        } else {
            prop_assert!(outcome.error.is_some());
        }
    }
}
