//! Bencode decoder: bytes → `Value` tree.
//!
//! Decoding is driven by a one-byte peek. The next byte picks the codec:
//!
//! | byte      | codec       |
//! |-----------|-------------|
//! | `i`       | integer     |
//! | `0`..`9`  | byte string |
//! | `l`       | list        |
//! | `d`       | dictionary  |
//!
//! Anything else where a value is expected is a format error. A failure
//! anywhere inside a list or dictionary aborts the whole enclosing value; no
//! partial containers are returned.
//!
//! [`decode_all`] keeps decoding top-level values until the source is
//! exhausted, so a stream of back-to-back messages (`i1ei2e3:abc`) decodes to
//! one `Value` per message. If a value fails, the values before it are still
//! returned next to the error.
//!
//! # Lenient vs strict
//!
//! By default the decoder accepts everything the grammar allows even when the
//! encoder would never produce it: `i-0e`, `i007e`, `03:abc`, dictionary keys
//! out of order, and duplicate keys (the last occurrence wins). With
//! [`DecodeOptions::strict`] all of those are format errors.

use crate::decimal::{decimal_len, read_decimal};
use crate::error::{BencodeError, Result};
use crate::source::{describe, Source};
use crate::types::{Dictionary, Value};
use std::io::BufRead;
use tracing::{debug, trace};

/// Default nesting limit for lists and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for the decoder.
///
/// ```
/// use bencode_core::{decode_from_bytes_with, DecodeOptions};
///
/// let lenient = decode_from_bytes_with(b"i007e", DecodeOptions::default());
/// assert!(lenient.error.is_none());
///
/// let strict = decode_from_bytes_with(b"i007e", DecodeOptions::strict());
/// assert!(strict.error.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject non-canonical input: leading zeros, `-0`, and dictionary keys
    /// that are not strictly ascending.
    pub strict: bool,
    /// Maximum number of nested lists/dictionaries. A top-level container
    /// counts as depth 1.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Default options with strict canonical-form checking turned on.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Result of decoding a multi-value stream.
///
/// `values` holds every top-level value decoded before `error` (if any)
/// stopped the pass.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub values: Vec<Value>,
    pub error: Option<BencodeError>,
}

impl DecodeOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the salvaged values on failure and return a plain `Result`.
    pub fn into_result(self) -> Result<Vec<Value>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.values),
        }
    }
}

/// Decode every top-level value in `source` until it is exhausted.
pub fn decode_all<R: BufRead>(source: R) -> DecodeOutcome {
    decode_all_with(source, DecodeOptions::default())
}

/// [`decode_all`] with explicit options.
pub fn decode_all_with<R: BufRead>(source: R, options: DecodeOptions) -> DecodeOutcome {
    let mut source = Source::new(source);
    let mut values = Vec::new();

    loop {
        match source.peek() {
            Ok(None) => break,
            Ok(Some(_)) => {}
            Err(e) => return stop(values, e),
        }
        match decode_value(&mut source, options) {
            Ok(value) => {
                trace!(
                    kind = value.kind(),
                    offset = source.offset(),
                    "decoded top-level value"
                );
                values.push(value);
            }
            Err(e) => return stop(values, e),
        }
    }

    DecodeOutcome {
        values,
        error: None,
    }
}

fn stop(values: Vec<Value>, error: BencodeError) -> DecodeOutcome {
    debug!(
        error = %error,
        salvaged = values.len(),
        "bencode decode stopped"
    );
    DecodeOutcome {
        values,
        error: Some(error),
    }
}

/// Decode every top-level value in an in-memory buffer.
///
/// ```
/// use bencode_core::{decode_from_bytes, Value};
///
/// let values = decode_from_bytes(b"i1ei2e3:abc").into_result().unwrap();
/// assert_eq!(
///     values,
///     vec![Value::Integer(1), Value::Integer(2), Value::string("abc")]
/// );
/// ```
pub fn decode_from_bytes(buffer: &[u8]) -> DecodeOutcome {
    decode_all(buffer)
}

/// [`decode_from_bytes`] with explicit options.
pub fn decode_from_bytes_with(buffer: &[u8], options: DecodeOptions) -> DecodeOutcome {
    decode_all_with(buffer, options)
}

/// Decode exactly one value from `source`, leaving any following bytes
/// unread. Useful for pulling framed messages off a stream one at a time.
pub fn decode_value<R: BufRead>(source: &mut Source<R>, options: DecodeOptions) -> Result<Value> {
    Decoder::new(source, options).value()
}

/// Decode an `i<decimal>e` integer.
pub fn decode_integer<R: BufRead>(source: &mut Source<R>, options: DecodeOptions) -> Result<i64> {
    Decoder::new(source, options).integer()
}

/// Decode a `<length>:<bytes>` byte string.
pub fn decode_byte_string<R: BufRead>(
    source: &mut Source<R>,
    options: DecodeOptions,
) -> Result<Vec<u8>> {
    Decoder::new(source, options).byte_string()
}

/// Decode an `l...e` list.
pub fn decode_list<R: BufRead>(
    source: &mut Source<R>,
    options: DecodeOptions,
) -> Result<Vec<Value>> {
    Decoder::new(source, options).list()
}

/// Decode a `d...e` dictionary.
pub fn decode_dictionary<R: BufRead>(
    source: &mut Source<R>,
    options: DecodeOptions,
) -> Result<Dictionary> {
    Decoder::new(source, options).dictionary()
}

/// The value codec selected by a peeked byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Integer,
    ByteString,
    List,
    Dictionary,
}

fn classify(byte: u8) -> Option<Kind> {
    match byte {
        b'i' => Some(Kind::Integer),
        b'0'..=b'9' => Some(Kind::ByteString),
        b'l' => Some(Kind::List),
        b'd' => Some(Kind::Dictionary),
        _ => None,
    }
}

/// Recursive-descent state: the source, the options, and the current depth.
struct Decoder<'a, R> {
    source: &'a mut Source<R>,
    options: DecodeOptions,
    depth: usize,
}

impl<'a, R: BufRead> Decoder<'a, R> {
    fn new(source: &'a mut Source<R>, options: DecodeOptions) -> Self {
        Self {
            source,
            options,
            depth: 0,
        }
    }

    /// Peek, classify, and decode one value.
    fn value(&mut self) -> Result<Value> {
        let offset = self.source.offset();
        let kind = match self.source.peek()? {
            Some(byte) => classify(byte).ok_or_else(|| {
                BencodeError::format(
                    offset,
                    format!("unexpected {} where a value was expected", describe(byte)),
                )
            })?,
            None => {
                return Err(BencodeError::format(
                    offset,
                    "unexpected end of input where a value was expected",
                ))
            }
        };

        match kind {
            Kind::Integer => self.integer().map(Value::Integer),
            Kind::ByteString => self.byte_string().map(Value::ByteString),
            Kind::List => self.list().map(Value::List),
            Kind::Dictionary => self.dictionary().map(Value::Dictionary),
        }
    }

    /// Read a decimal and apply the zero-digit and canonical-form checks.
    fn number(&mut self, what: &str) -> Result<i64> {
        let offset = self.source.offset();
        let (value, len) = read_decimal(self.source)?;
        if len == 0 {
            return Err(BencodeError::Number { offset });
        }
        if self.options.strict && len != decimal_len(value) {
            return Err(BencodeError::format(
                offset,
                format!("non-canonical {what} (leading zero or negative zero)"),
            ));
        }
        Ok(value)
    }

    fn integer(&mut self) -> Result<i64> {
        self.source.expect(b'i')?;
        let value = self.number("integer")?;
        self.source.expect(b'e')?;
        Ok(value)
    }

    fn byte_string(&mut self) -> Result<Vec<u8>> {
        let offset = self.source.offset();
        let len = self.number("byte string length")?;
        let len = usize::try_from(len).map_err(|_| BencodeError::Number { offset })?;
        self.source.expect(b':')?;
        self.source.read_body(len)
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(BencodeError::format(
                self.source.offset(),
                format!("nesting deeper than {} levels", self.options.max_depth),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Consume the closing `e` if it is next. Fails at end of input.
    fn at_end(&mut self, container: &str) -> Result<bool> {
        match self.source.peek()? {
            Some(b'e') => {
                self.source.next_byte()?;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(BencodeError::format(
                self.source.offset(),
                format!("unexpected end of input inside {container}"),
            )),
        }
    }

    fn list(&mut self) -> Result<Vec<Value>> {
        self.enter()?;
        self.source.expect(b'l')?;
        let mut items = Vec::new();
        while !self.at_end("list")? {
            items.push(self.value()?);
        }
        self.depth -= 1;
        Ok(items)
    }

    fn dictionary(&mut self) -> Result<Dictionary> {
        self.enter()?;
        self.source.expect(b'd')?;
        let mut dict = Dictionary::new();
        let mut previous: Option<Vec<u8>> = None;

        while !self.at_end("dictionary")? {
            let key_offset = self.source.offset();
            let key = self.byte_string()?;

            if self.options.strict {
                if let Some(prev) = &previous {
                    if key <= *prev {
                        return Err(BencodeError::format(
                            key_offset,
                            "dictionary keys not in strictly ascending order",
                        ));
                    }
                }
                previous = Some(key.clone());
            }

            let value = self.value()?;
            dict.insert(key, value);
        }

        self.depth -= 1;
        Ok(dict)
    }
}
