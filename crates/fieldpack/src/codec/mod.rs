//! Byte-level codec for fixed-width binary records.
//!
//! Every function here is a stateless operation over a buffer owned by the
//! caller. Readers take `&[u8]`, writers take `&mut [u8]`, and every field is
//! addressed by an `(offset, width)` pair that must fit inside the buffer:
//!
//! - [`int`]: big-endian 16/32/64-bit integers and single bytes
//! - [`buffer`]: bounded copies and right padding
//! - [`text`]: fixed-width strings in a chosen [`TextEncoding`]
//! - [`hex`]: uppercase hex transcoding
//! - [`bcd`]: binary-coded-decimal digit packing
//! - [`timestamp`]: 7-byte BCD `yyyyMMddHHmmss` timestamps
//! - [`bits`]: bit extraction and bit-string parsing
//!
//! A write that fails leaves the buffer untouched.
//!
//! # Example
//!
//! ```
//! use fieldpack::codec::{self, TextEncoding};
//!
//! let mut record = [0u8; 16];
//! codec::write_i32(&mut record, -2, 0).unwrap();
//! codec::write_string(&mut record, "OK", 4, 4, TextEncoding::Ascii).unwrap();
//!
//! assert_eq!(codec::read_i32(&record, 0).unwrap(), -2);
//! assert_eq!(codec::bytes_to_hex(&record[..8], false), "FFFFFFFE4F4B2020");
//! ```

use std::ops::Range;

use crate::error::{Error, Result};

pub mod bcd;
pub mod bits;
pub mod buffer;
pub mod hex;
pub mod int;
pub mod text;
pub mod timestamp;

pub use bcd::{bcd_to_decimal, bcd_to_digits, decimal_to_bcd};
pub use bits::{
    bits_to_byte, bits_to_signed_byte, bits_to_string, byte_to_bit_string, byte_to_bits,
};
pub use buffer::{copy_range, pad_right};
pub use hex::{bytes_to_hex, hex_dump, hex_to_bytes, hex_to_i64};
pub use int::{
    bytes_to_i32, i32_to_bytes, read_byte, read_i16, read_i32, read_i64, write_byte, write_i16,
    write_i32, write_i64,
};
pub use text::{read_string, write_string, TextEncoding};
pub use timestamp::{
    decode_timestamp, encode_timestamp, parse_timestamp, read_timestamp_digits,
    read_timestamp_digits_legacy, TIMESTAMP_DIGITS, TIMESTAMP_LEN,
};

/// Resolve `offset..offset + width` inside a destination of `len` bytes.
pub(crate) fn dst_range(len: usize, offset: usize, width: usize) -> Result<Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(Error::destination_too_small(offset, width, len)),
    }
}

/// Resolve `offset..offset + width` inside a source of `len` bytes.
pub(crate) fn src_range(len: usize, offset: usize, width: usize) -> Result<Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(Error::source_too_short(offset, width, len)),
    }
}
