//! Decimal digit primitives shared by the integer and byte-string codecs.
//!
//! Writing walks a descending power-of-ten divisor so digits come out
//! most-significant first without building a temporary string. Reading is
//! greedy and stops at (without consuming) the first non-digit byte.

use crate::error::{BencodeError, Result};
use crate::source::Source;
use std::io::{self, BufRead, Write};

/// Write `n` in decimal with no leading zeros, prefixed by `-` when negative.
///
/// Returns the number of bytes written.
///
/// ```
/// use bencode_core::decimal::write_decimal;
///
/// let mut out = Vec::new();
/// assert_eq!(write_decimal(&mut out, -307).unwrap(), 4);
/// assert_eq!(out, b"-307");
/// ```
pub fn write_decimal<W: Write>(sink: &mut W, n: i64) -> io::Result<usize> {
    let mut written = 0;
    if n < 0 {
        sink.write_all(b"-")?;
        written += 1;
    }
    written += write_unsigned(sink, n.unsigned_abs())?;
    Ok(written)
}

/// Write an unsigned decimal (used for byte-string lengths).
pub fn write_unsigned<W: Write>(sink: &mut W, mut n: u64) -> io::Result<usize> {
    let mut divisor: u64 = 1;
    while divisor <= n / 10 {
        divisor *= 10;
    }

    let mut written = 0;
    loop {
        let digit = (n / divisor) as u8;
        sink.write_all(&[b'0' + digit])?;
        written += 1;
        if divisor == 1 {
            break;
        }
        n %= divisor;
        divisor /= 10;
    }
    Ok(written)
}

/// Number of bytes [`write_decimal`] would emit for `n`.
///
/// Comparing this against the byte count returned by [`read_decimal`] tells
/// whether the input spelled the number canonically (no leading zeros, no
/// `-0`).
pub fn decimal_len(n: i64) -> usize {
    let sign = usize::from(n < 0);
    let mut rest = n.unsigned_abs();
    let mut digits = 1;
    while rest >= 10 {
        rest /= 10;
        digits += 1;
    }
    sign + digits
}

/// Read an optionally signed decimal number.
///
/// Returns the value and the number of bytes that belong to it (sign plus
/// digits). The first non-digit byte is left in the source. A count of `0`
/// means no digits were present at all; callers turn that into
/// [`BencodeError::Number`]. A digit run that overflows `i64` fails with
/// [`BencodeError::Number`] directly.
pub fn read_decimal<R: BufRead>(source: &mut Source<R>) -> Result<(i64, usize)> {
    let start = source.offset();

    let negative = source.peek()? == Some(b'-');
    if negative {
        source.next_byte()?;
    }

    let mut magnitude: u64 = 0;
    let mut digits = 0usize;
    while let Some(byte @ b'0'..=b'9') = source.peek()? {
        source.next_byte()?;
        digits += 1;
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(u64::from(byte - b'0')))
            .ok_or(BencodeError::Number { offset: start })?;
    }

    if digits == 0 {
        return Ok((0, 0));
    }

    let value = if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(BencodeError::Number { offset: start });
        }
        (magnitude as i64).wrapping_neg()
    } else {
        i64::try_from(magnitude).map_err(|_| BencodeError::Number { offset: start })?
    };

    Ok((value, digits + usize::from(negative)))
}
