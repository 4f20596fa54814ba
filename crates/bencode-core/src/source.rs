//! One-byte-peekable input with offset tracking.
//!
//! Every decoder reads through [`Source`], which wraps any `BufRead` (a byte
//! slice, a `BufReader<File>`, a `BufReader<TcpStream>`) and counts consumed
//! bytes so errors can report where they happened. Peeking never consumes:
//! it only looks at the front of the reader's internal buffer.

use crate::error::{BencodeError, Result};
use std::io::{BufRead, ErrorKind};

/// Preallocation cap for byte-string bodies. A declared length is only a
/// claim until the bytes actually arrive.
const MAX_PREALLOC: usize = 64 * 1024;

/// A buffered byte source that supports peeking at the next byte.
#[derive(Debug)]
pub struct Source<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> Source<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the wrapped reader, positioned right after the last consumed byte.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Polls the reader once and returns how many bytes are buffered.
    ///
    /// Zero means end of input. Readers whose end of input is not sticky
    /// (terminals, some pipes) may have more data on the next poll, so each
    /// end of input is observed exactly once.
    fn fill(&mut self) -> Result<usize> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.len()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Looks at the next byte without consuming it. `None` at end of input.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if self.fill()? == 0 {
            return Ok(None);
        }
        // Non-empty buffer: `fill_buf` hands back the same bytes without
        // touching the reader.
        Ok(self.inner.fill_buf()?.first().copied())
    }

    /// Consumes and returns the next byte. `None` at end of input.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.inner.consume(1);
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Consumes the next byte, failing with a format error unless it is `tag`.
    ///
    /// On mismatch the offending byte is left unconsumed.
    pub fn expect(&mut self, tag: u8) -> Result<()> {
        match self.peek()? {
            Some(b) if b == tag => {
                self.inner.consume(1);
                self.offset += 1;
                Ok(())
            }
            Some(b) => Err(BencodeError::format(
                self.offset,
                format!("expected '{}', found {}", tag as char, describe(b)),
            )),
            None => Err(BencodeError::format(
                self.offset,
                format!("expected '{}', found end of input", tag as char),
            )),
        }
    }

    /// Reads exactly `len` bytes.
    ///
    /// Fails with [`BencodeError::Truncated`] if the source runs dry first;
    /// the error offset is where the body started.
    pub fn read_body(&mut self, len: usize) -> Result<Vec<u8>> {
        let start = self.offset;
        let mut out = Vec::with_capacity(len.min(MAX_PREALLOC));
        while out.len() < len {
            if self.fill()? == 0 {
                return Err(BencodeError::Truncated {
                    offset: start,
                    declared: len as u64,
                    available: out.len() as u64,
                });
            }
            let buf = self.inner.fill_buf()?;
            let take = buf.len().min(len - out.len());
            out.extend_from_slice(&buf[..take]);
            self.inner.consume(take);
            self.offset += take as u64;
        }
        Ok(out)
    }
}

/// Printable rendering of a byte for error messages.
pub(crate) fn describe(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("0x{:02x}", byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut src = Source::new(&b"ab"[..]);
        assert_eq!(src.peek().unwrap(), Some(b'a'));
        assert_eq!(src.peek().unwrap(), Some(b'a'));
        assert_eq!(src.offset(), 0);
        assert_eq!(src.next_byte().unwrap(), Some(b'a'));
        assert_eq!(src.offset(), 1);
    }

    #[test]
    fn expect_leaves_mismatch_unconsumed() {
        let mut src = Source::new(&b"x"[..]);
        let err = src.expect(b'e').unwrap_err();
        assert!(matches!(err, BencodeError::Format { offset: 0, .. }));
        assert_eq!(src.peek().unwrap(), Some(b'x'));
    }

    #[test]
    fn read_body_reports_short_read() {
        let mut src = Source::new(&b"abc"[..]);
        match src.read_body(5) {
            Err(BencodeError::Truncated {
                offset,
                declared,
                available,
            }) => {
                assert_eq!((offset, declared, available), (0, 5, 3));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn read_body_spans_small_buffers() {
        let reader = std::io::BufReader::with_capacity(2, &b"hello world"[..]);
        let mut src = Source::new(reader);
        assert_eq!(src.read_body(11).unwrap(), b"hello world");
        assert_eq!(src.peek().unwrap(), None);
    }

    /// Reader that replays a fixed sequence of reads; an empty chunk is a
    /// zero-byte read (end of input) that does not stick.
    struct Chunks(std::collections::VecDeque<&'static [u8]>);

    impl std::io::Read for Chunks {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.0.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn end_of_input_is_polled_once() {
        let reader = std::io::BufReader::new(Chunks(vec![&b""[..], b"i9e"].into()));
        let mut src = Source::new(reader);
        assert_eq!(src.peek().unwrap(), None);
        // The next poll sees the data that arrived after the first end of input.
        assert_eq!(src.peek().unwrap(), Some(b'i'));
    }

    #[test]
    fn read_body_stops_at_first_end_of_input() {
        let reader = std::io::BufReader::new(Chunks(vec![&b"ab"[..], b"", b"c"].into()));
        let mut src = Source::new(reader);
        assert!(matches!(
            src.read_body(3),
            Err(BencodeError::Truncated { available: 2, .. })
        ));
    }
}
