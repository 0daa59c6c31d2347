//! Bit extraction and bit-string parsing.

use crate::error::{Error, Result};

/// Split a byte into its 8 bits, most significant first.
///
/// `0b1011_0000` yields `[1, 0, 1, 1, 0, 0, 0, 0]`.
#[must_use]
pub fn byte_to_bits(b: u8) -> [u8; 8] {
    std::array::from_fn(|i| (b >> (7 - i)) & 1)
}

/// Render a byte as 8 binary digits, most significant first.
#[must_use]
pub fn byte_to_bit_string(b: u8) -> String {
    format!("{b:08b}")
}

/// Concatenate bit values (as produced by [`byte_to_bits`]) into text.
#[must_use]
pub fn bits_to_string(bits: &[u8]) -> String {
    bits.iter().map(u8::to_string).collect()
}

/// Parse a 4- or 8-character bit string as a signed byte.
///
/// An 8-bit string starting with `'1'` is read as two's complement, so
/// `"10110000"` is `-80`. A 4-bit string is always in `0..=15`.
///
/// # Errors
///
/// Returns [`Error::InvalidBitLength`] for any other length, or
/// [`Error::InvalidBits`] if a character is not `0` or `1`.
pub fn bits_to_signed_byte(bits: &str) -> Result<i8> {
    let length = bits.chars().count();
    if length != 4 && length != 8 {
        return Err(Error::InvalidBitLength { length });
    }
    if !bits.chars().all(|c| c == '0' || c == '1') {
        return Err(Error::InvalidBits {
            value: bits.to_string(),
        });
    }
    let value = bits
        .bytes()
        .fold(0u8, |acc, b| (acc << 1) | (b - b'0'));
    Ok(value as i8)
}

/// Parse a 4- or 8-character bit string into a byte.
///
/// Returns the same bit pattern as [`bits_to_signed_byte`], so
/// `bits_to_byte(&byte_to_bit_string(b)) == b` for every byte.
///
/// # Errors
///
/// Returns [`Error::InvalidBitLength`] for any length other than 4 or 8, or
/// [`Error::InvalidBits`] if a character is not `0` or `1`.
pub fn bits_to_byte(bits: &str) -> Result<u8> {
    bits_to_signed_byte(bits).map(|v| v as u8)
}
