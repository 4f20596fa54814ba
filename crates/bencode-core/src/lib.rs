//! # bencode-core
//!
//! Pure-Rust encoder and decoder for **Bencode**, the serialization format of
//! BitTorrent metainfo files, tracker responses, and peer-wire extension
//! messages.
//!
//! Bencode has four value kinds, each self-delimiting:
//!
//! | Kind        | Encoding              | Example                       |
//! |-------------|-----------------------|-------------------------------|
//! | Integer     | `i<decimal>e`         | `-7` → `i-7e`                 |
//! | Byte string | `<length>:<bytes>`    | `"spam"` → `4:spam`           |
//! | List        | `l<items>e`           | `[1, "a"]` → `li1e1:ae`       |
//! | Dictionary  | `d<key><value>...e`   | `{"a": 1}` → `d1:ai1ee`       |
//!
//! Dictionary keys are always emitted in ascending byte order, so encoding is
//! canonical: equal values always produce identical bytes.
//!
//! ## Quick start
//!
//! ```rust
//! use bencode_core::{decode_from_bytes, encode_to_vec, Value};
//!
//! let bytes = b"d3:keyl1:a1:bee";
//! let values = decode_from_bytes(bytes).into_result().unwrap();
//! assert_eq!(
//!     values[0].get(b"key"),
//!     Some(&Value::List(vec![Value::string("a"), Value::string("b")]))
//! );
//!
//! // Re-encoding a decoded value is byte-identical.
//! assert_eq!(encode_to_vec(&values[0]).unwrap(), bytes);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — `Value` → bytes
//! - [`decoder`] — bytes → `Value`s, lenient or strict
//! - [`decimal`] — decimal digit read/write primitives
//! - [`source`] — peekable byte source over any `BufRead`
//! - [`json`] — conversion to and from `serde_json::Value`
//! - [`error`] — error types
//! - [`types`] — the `Value` tree

pub mod decimal;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod source;
pub mod types;

pub use decoder::{
    decode_all, decode_all_with, decode_from_bytes, decode_from_bytes_with, decode_value,
    DecodeOptions, DecodeOutcome,
};
pub use encoder::{encode, encode_to_vec};
pub use error::BencodeError;
pub use source::Source;
pub use types::{Dictionary, Value};
