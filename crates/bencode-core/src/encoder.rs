//! Bencode encoder: `Value` tree → canonical bytes.
//!
//! Each value kind has its own writer and [`encode_value`] dispatches between
//! them with an exhaustive match:
//!
//! - **Integer**: `i<decimal>e`, leading `-` for negatives, no leading zeros
//! - **Byte string**: `<length>:<raw bytes>`
//! - **List**: `l<items>e`, items in their original order
//! - **Dictionary**: `d<key><value>...e`, keys in ascending byte order
//!
//! Every writer returns the number of bytes it emitted.
//!
//! # Example
//! ```
//! use bencode_core::{encode_to_vec, Value};
//!
//! let list = Value::List(vec![Value::Integer(1), Value::string("a")]);
//! assert_eq!(encode_to_vec(&list).unwrap(), b"li1e1:ae");
//! ```

use crate::decimal::{write_decimal, write_unsigned};
use crate::error::Result;
use crate::types::{Dictionary, Value};
use std::io::{BufWriter, Write};

/// Encode `value` into `sink`, returning the number of bytes written.
///
/// The sink is wrapped in a `BufWriter` and flushed before returning, so
/// unbuffered sinks (files, sockets) are fine to pass directly.
pub fn encode<W: Write>(sink: W, value: &Value) -> Result<usize> {
    let mut w = BufWriter::new(sink);
    let written = encode_value(&mut w, value)?;
    w.flush()?;
    Ok(written)
}

/// Encode `value` into a fresh byte vector.
pub fn encode_to_vec(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_value(&mut out, value)?;
    Ok(out)
}

/// Dispatch on the value kind and write its encoding.
pub fn encode_value<W: Write>(w: &mut W, value: &Value) -> Result<usize> {
    match value {
        Value::Integer(n) => encode_integer(w, *n),
        Value::ByteString(bytes) => encode_byte_string(w, bytes),
        Value::List(items) => encode_list(w, items),
        Value::Dictionary(dict) => encode_dictionary(w, dict),
    }
}

/// `i<decimal>e`
pub fn encode_integer<W: Write>(w: &mut W, n: i64) -> Result<usize> {
    w.write_all(b"i")?;
    let digits = write_decimal(w, n)?;
    w.write_all(b"e")?;
    Ok(digits + 2)
}

/// `<length>:<bytes>`
pub fn encode_byte_string<W: Write>(w: &mut W, bytes: &[u8]) -> Result<usize> {
    let prefix = write_unsigned(w, bytes.len() as u64)?;
    w.write_all(b":")?;
    w.write_all(bytes)?;
    Ok(prefix + 1 + bytes.len())
}

/// `l<items>e`
pub fn encode_list<W: Write>(w: &mut W, items: &[Value]) -> Result<usize> {
    w.write_all(b"l")?;
    let mut written = 1;
    for item in items {
        written += encode_value(w, item)?;
    }
    w.write_all(b"e")?;
    Ok(written + 1)
}

/// `d<key><value>...e`
///
/// `Dictionary` is a `BTreeMap` over byte vectors, so iteration already
/// yields keys in ascending byte order; insertion order never leaks into the
/// output.
pub fn encode_dictionary<W: Write>(w: &mut W, dict: &Dictionary) -> Result<usize> {
    w.write_all(b"d")?;
    let mut written = 1;
    for (key, value) in dict {
        written += encode_byte_string(w, key)?;
        written += encode_value(w, value)?;
    }
    w.write_all(b"e")?;
    Ok(written + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_counts_match_output_length() {
        let mut dict = Dictionary::new();
        dict.insert(b"k".to_vec(), Value::List(vec![Value::Integer(-12)]));
        let value = Value::Dictionary(dict);

        let mut out = Vec::new();
        let written = encode_value(&mut out, &value).unwrap();
        assert_eq!(written, out.len());
        assert_eq!(out, b"d1:kli-12eee");
    }

    #[test]
    fn encode_flushes_through_bufwriter() {
        let mut sink = Vec::new();
        let written = encode(&mut sink, &Value::string("spam")).unwrap();
        assert_eq!(written, 6);
        assert_eq!(sink, b"4:spam");
    }
}
