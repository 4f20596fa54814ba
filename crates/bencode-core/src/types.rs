//! The Bencode value tree.

use std::collections::BTreeMap;

/// Dictionary payload: byte-string keys mapped to values.
///
/// `BTreeMap` keeps keys in ascending byte order, which is exactly the order
/// the encoder must emit them in.
pub type Dictionary = BTreeMap<Vec<u8>, Value>;

/// A decoded (or to-be-encoded) Bencode value.
///
/// # Examples
///
/// ```
/// use bencode_core::Value;
///
/// let n: Value = 42i64.into();
/// let s: Value = "spam".into();
/// assert_eq!(n.as_integer(), Some(42));
/// assert_eq!(s.as_str(), Some("spam"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    /// Raw bytes; not required to be valid UTF-8.
    ByteString(Vec<u8>),
    List(Vec<Value>),
    Dictionary(Dictionary),
}

impl Value {
    /// Byte string value from UTF-8 text.
    pub fn string(s: &str) -> Self {
        Value::ByteString(s.as_bytes().to_vec())
    }

    /// Short name of the variant, used in diagnostics and stats.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::ByteString(_) => "string",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dictionary",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as text if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a dictionary.
    ///
    /// ```
    /// use bencode_core::decode_from_bytes;
    ///
    /// let values = decode_from_bytes(b"d3:foo3:bare").into_result().unwrap();
    /// assert_eq!(values[0].get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert!(values[0].get(b"missing").is_none());
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::ByteString(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::ByteString(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Dictionary> for Value {
    fn from(d: Dictionary) -> Self {
        Value::Dictionary(d)
    }
}
