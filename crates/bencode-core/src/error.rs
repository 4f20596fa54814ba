//! Error types for Bencode encoding and decoding operations.

use thiserror::Error;

/// Errors that can occur during Bencode encoding or decoding.
///
/// Every decode error carries the byte offset (from the start of the source)
/// at which the problem was detected.
#[derive(Error, Debug)]
pub enum BencodeError {
    /// A decimal number was expected but no digits were present, or the
    /// digits do not fit in an `i64`.
    #[error("expected number at byte {offset}")]
    Number { offset: u64 },

    /// A structural byte (`i`, `l`, `d`, `e`, `:` or a value tag) was missing
    /// or unexpected.
    #[error("wrong bencode format at byte {offset}: {message}")]
    Format { offset: u64, message: String },

    /// A byte string declared more bytes than the source could supply.
    #[error("truncated input at byte {offset}: declared {declared} bytes, {available} available")]
    Truncated {
        offset: u64,
        declared: u64,
        available: u64,
    },

    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON value has no Bencode counterpart (bool, null, float).
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

impl BencodeError {
    pub(crate) fn format(offset: u64, message: impl Into<String>) -> Self {
        BencodeError::Format {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset at which a decode error was detected, if any.
    pub fn offset(&self) -> Option<u64> {
        match self {
            BencodeError::Number { offset }
            | BencodeError::Format { offset, .. }
            | BencodeError::Truncated { offset, .. } => Some(*offset),
            BencodeError::Io(_) | BencodeError::Unsupported(_) => None,
        }
    }
}

/// Convenience alias used throughout bencode-core.
pub type Result<T> = std::result::Result<T, BencodeError>;
