//! Hex transcoding.
//!
//! Output is always uppercase. Input is case-insensitive.

use std::fmt::Write;

use super::int::read_i64;
use crate::error::{Error, Result};

/// Encode bytes as uppercase hex, two characters per byte.
///
/// With `formatted` set every byte pair is followed by one space, including
/// the last: `[0x0A, 0xFF]` becomes `"0A FF "`.
#[must_use]
pub fn bytes_to_hex(bytes: &[u8], formatted: bool) -> String {
    let per_byte = if formatted { 3 } else { 2 };
    let mut out = String::with_capacity(bytes.len() * per_byte);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{byte:02X}");
        if formatted {
            out.push(' ');
        }
    }
    out
}

fn nibble(c: char, position: usize) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or(Error::InvalidHex {
            character: c,
            position,
        })
}

/// Decode hex text into bytes.
///
/// The output holds `len / 2` bytes: a trailing unpaired character is
/// dropped, so `"ABC"` decodes to `[0xAB]`.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] if a consumed character is not a hex digit.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    let chars: Vec<char> = hex.chars().collect();
    chars
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let hi = nibble(pair[0], i * 2)?;
            let lo = nibble(pair[1], i * 2 + 1)?;
            Ok((hi << 4) | lo)
        })
        .collect()
}

/// Decode up to 16 hex characters as a big-endian `i64`.
///
/// Shorter input is right-aligned, so `"FF"` is `255` and
/// `"FFFFFFFFFFFFFFFF"` is `-1`. Odd-length input is left-padded with `'0'`,
/// so `"123"` is `0x123`.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] for non-hex input, or
/// [`Error::DestinationTooSmall`] if the input decodes to more than 8 bytes.
pub fn hex_to_i64(hex: &str) -> Result<i64> {
    let bytes = if hex.chars().count() % 2 == 0 {
        hex_to_bytes(hex)?
    } else {
        hex_to_bytes(&format!("0{hex}"))?
    };
    if bytes.len() > 8 {
        return Err(Error::destination_too_small(0, bytes.len(), 8));
    }
    let mut word = [0u8; 8];
    word[8 - bytes.len()..].copy_from_slice(&bytes);
    read_i64(&word, 0)
}

/// Render bytes as a hex dump with `per_line` bytes on each line.
///
/// Bytes on a line are separated by single spaces and lines by `'\n'`. A
/// `per_line` of zero puts everything on one line.
#[must_use]
pub fn hex_dump(bytes: &[u8], per_line: usize) -> String {
    let per_line = if per_line == 0 {
        bytes.len().max(1)
    } else {
        per_line
    };
    bytes
        .chunks(per_line)
        .map(|line| bytes_to_hex(line, true).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
