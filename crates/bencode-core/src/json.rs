//! Conversion between Bencode values and `serde_json::Value`.
//!
//! Bencode byte strings are arbitrary bytes while JSON strings are text, so
//! the mapping needs an escape hatch:
//!
//! - byte strings that are valid UTF-8 become JSON strings
//! - any other byte string becomes `{"$hex": "<lowercase hex>"}`
//! - dictionary keys that are not UTF-8 become `"$hex:<lowercase hex>"`
//!
//! Text keys that would read back as an escape are hex-escaped too: keys
//! starting with `$hex:`, and the `$hex` key of a single-entry dictionary.
//! That keeps `from_json(&to_json(v))` equal to `v` for every value.
//!
//! Going the other way, JSON kinds with no Bencode counterpart (booleans,
//! null, floats, integers outside `i64`) are rejected with
//! [`BencodeError::Unsupported`] rather than skipped, so a conversion never
//! silently drops data.
//!
//! JSON written by hand that looks like an escape (`"$hex:..."` keys,
//! single-key `{"$hex": ...}` objects) is read back as bytes.

use crate::error::{BencodeError, Result};
use crate::types::{Dictionary, Value};
use serde_json::{Map, Number, Value as Json};

const HEX_FIELD: &str = "$hex";
const HEX_KEY_PREFIX: &str = "$hex:";

/// Render a Bencode value as JSON.
///
/// ```
/// use bencode_core::{json::to_json, Value};
/// use serde_json::json;
///
/// let value = Value::List(vec![Value::Integer(7), Value::ByteString(vec![0xff])]);
/// assert_eq!(to_json(&value), json!([7, {"$hex": "ff"}]));
/// ```
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Integer(n) => Json::Number(Number::from(*n)),
        Value::ByteString(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Json::String(text.to_string()),
            Err(_) => {
                let mut escaped = Map::new();
                escaped.insert(HEX_FIELD.to_string(), Json::String(hex::encode(bytes)));
                Json::Object(escaped)
            }
        },
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Dictionary(dict) => {
            let sole = dict.len() == 1;
            let mut map = Map::new();
            for (key, child) in dict {
                map.insert(json_key(key, sole), to_json(child));
            }
            Json::Object(map)
        }
    }
}

/// `sole` is set when `key` is the only entry of its dictionary.
fn json_key(key: &[u8], sole: bool) -> String {
    match std::str::from_utf8(key) {
        Ok(text) if !text.starts_with(HEX_KEY_PREFIX) && !(sole && text == HEX_FIELD) => {
            text.to_string()
        }
        _ => format!("{HEX_KEY_PREFIX}{}", hex::encode(key)),
    }
}

/// Build a Bencode value from JSON.
///
/// ```
/// use bencode_core::{encode_to_vec, json::from_json};
/// use serde_json::json;
///
/// let value = from_json(&json!({"b": 2, "a": [1, "x"]})).unwrap();
/// assert_eq!(encode_to_vec(&value).unwrap(), b"d1:ali1e1:xe1:bi2ee");
/// ```
pub fn from_json(json: &Json) -> Result<Value> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| BencodeError::Unsupported(format!("number {n} is not an i64"))),
        Json::String(s) => Ok(Value::string(s)),
        Json::Array(items) => items
            .iter()
            .map(from_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        Json::Object(map) => {
            if let Some(bytes) = hex_escape(map)? {
                return Ok(Value::ByteString(bytes));
            }
            let mut dict = Dictionary::new();
            for (key, child) in map {
                dict.insert(bencode_key(key)?, from_json(child)?);
            }
            Ok(Value::Dictionary(dict))
        }
        Json::Bool(b) => Err(BencodeError::Unsupported(format!("boolean {b}"))),
        Json::Null => Err(BencodeError::Unsupported("null".to_string())),
    }
}

/// `{"$hex": "..."}` → raw bytes.
fn hex_escape(map: &Map<String, Json>) -> Result<Option<Vec<u8>>> {
    if map.len() != 1 {
        return Ok(None);
    }
    match map.get(HEX_FIELD) {
        Some(Json::String(digits)) => decode_hex(digits).map(Some),
        _ => Ok(None),
    }
}

fn bencode_key(key: &str) -> Result<Vec<u8>> {
    match key.strip_prefix(HEX_KEY_PREFIX) {
        Some(digits) => decode_hex(digits),
        None => Ok(key.as_bytes().to_vec()),
    }
}

fn decode_hex(digits: &str) -> Result<Vec<u8>> {
    hex::decode(digits).map_err(|e| BencodeError::Unsupported(format!("bad hex {digits:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn utf8_strings_stay_text() {
        assert_eq!(to_json(&Value::string("spam")), json!("spam"));
    }

    #[test]
    fn binary_keys_are_prefixed() {
        let mut dict = Dictionary::new();
        dict.insert(vec![0x00, 0xff], Value::Integer(1));
        let json = to_json(&Value::Dictionary(dict.clone()));
        assert_eq!(json, json!({"$hex:00ff": 1}));
        assert_eq!(from_json(&json).unwrap(), Value::Dictionary(dict));
    }

    #[test]
    fn binary_values_round_trip() {
        let value = Value::ByteString(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(from_json(&to_json(&value)).unwrap(), value);
    }

    #[test]
    fn rejects_kinds_without_bencode_form() {
        for json in [json!(true), json!(null), json!(1.5), json!([1, null])] {
            assert!(matches!(
                from_json(&json),
                Err(BencodeError::Unsupported(_))
            ));
        }
    }

    #[test]
    fn rejects_u64_beyond_i64() {
        assert!(from_json(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn bad_hex_escape_is_an_error() {
        assert!(from_json(&json!({"$hex": "zz"})).is_err());
    }

    #[test]
    fn hex_field_with_siblings_is_a_plain_dictionary() {
        let value = from_json(&json!({"$hex": "00", "x": 1})).unwrap();
        assert!(value.get(b"$hex").is_some());
    }

    #[test]
    fn text_key_with_escape_prefix_round_trips() {
        let mut dict = Dictionary::new();
        dict.insert(b"$hex:6869".to_vec(), Value::Integer(1));
        let value = Value::Dictionary(dict);
        let json = to_json(&value);
        assert_eq!(json, json!({"$hex:246865783a36383639": 1}));
        assert_eq!(from_json(&json).unwrap(), value);
    }

    #[test]
    fn single_hex_key_dictionary_stays_a_dictionary() {
        let mut dict = Dictionary::new();
        dict.insert(b"$hex".to_vec(), Value::string("ff"));
        let value = Value::Dictionary(dict);
        let json = to_json(&value);
        assert_eq!(json, json!({"$hex:24686578": "ff"}));
        assert_eq!(from_json(&json).unwrap(), value);
    }

    #[test]
    fn hex_key_beside_other_keys_stays_text() {
        let mut dict = Dictionary::new();
        dict.insert(b"$hex".to_vec(), Value::string("ff"));
        dict.insert(b"x".to_vec(), Value::Integer(1));
        let value = Value::Dictionary(dict);
        let json = to_json(&value);
        assert_eq!(json, json!({"$hex": "ff", "x": 1}));
        assert_eq!(from_json(&json).unwrap(), value);
    }
}
