//! Binary-coded decimal packing.
//!
//! Two digits per byte, first digit in the high nibble. Odd-length input is
//! left-padded with `'0'` before packing.

use std::fmt::Write;

use crate::error::{Error, Result};

/// Map a digit character to its nibble value.
///
/// Letters continue after nine (`a`/`A` is 10, `z`/`Z` is 35), so hex digits
/// pack as expected; values above 15 spill into the neighbouring nibble.
fn digit_value(c: char, position: usize) -> Result<u32> {
    match c {
        '0'..='9' => Ok(u32::from(c) - u32::from('0')),
        'a'..='z' => Ok(u32::from(c) - u32::from('a') + 10),
        'A'..='Z' => Ok(u32::from(c) - u32::from('A') + 10),
        _ => Err(Error::InvalidBcd {
            character: c,
            position,
        }),
    }
}

/// Pack a digit string into BCD bytes.
///
/// `"1234"` packs to `[0x12, 0x34]`; `"123"` is treated as `"0123"`.
///
/// # Errors
///
/// Returns [`Error::InvalidBcd`] for characters outside `0-9a-zA-Z`.
pub fn decimal_to_bcd(digits: &str) -> Result<Vec<u8>> {
    let mut nibbles = digits
        .chars()
        .enumerate()
        .map(|(i, c)| digit_value(c, i))
        .collect::<Result<Vec<_>>>()?;
    if nibbles.len() % 2 != 0 {
        nibbles.insert(0, 0);
    }
    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| ((pair[0] << 4) + pair[1]) as u8)
        .collect())
}

/// Expand BCD bytes into digits, high nibble first, without dropping anything.
///
/// Nibbles are rendered in decimal, so a non-decimal nibble such as `0xA`
/// produces two characters (`"10"`).
#[must_use]
pub fn bcd_to_digits(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{}{}", byte >> 4, byte & 0x0F);
    }
    out
}

/// Expand BCD bytes into digits and drop a single leading `'0'`.
///
/// Only the first character is ever removed: `[0x00, 0x34]` becomes
/// `"034"`, not `"34"`. Use [`bcd_to_digits`] when the width is fixed.
#[must_use]
pub fn bcd_to_decimal(bytes: &[u8]) -> String {
    let digits = bcd_to_digits(bytes);
    match digits.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => digits,
    }
}
