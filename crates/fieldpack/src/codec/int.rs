//! Big-endian fixed-width integers.
//!
//! Values are always stored most-significant byte first. Readers accumulate
//! into an unsigned `u64` and reinterpret the result at the requested width,
//! so negative values never pass through an intermediate sign extension.

use super::{dst_range, src_range};
use crate::error::{Error, Result};

/// Write the low `width` bytes of `value` at `offset`, big-endian.
fn write_be(buf: &mut [u8], value: u64, offset: usize, width: usize) -> Result<()> {
    let range = dst_range(buf.len(), offset, width)?;
    let bytes = value.to_be_bytes();
    buf[range].copy_from_slice(&bytes[8 - width..]);
    Ok(())
}

/// Read `width` bytes at `offset` as an unsigned big-endian value.
fn read_be(buf: &[u8], offset: usize, width: usize) -> Result<u64> {
    let range = src_range(buf.len(), offset, width)?;
    Ok(buf[range]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Write a single byte, keeping only the low 8 bits of `value`.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if `offset` is past the end of `buf`.
pub fn write_byte(buf: &mut [u8], value: i32, offset: usize) -> Result<()> {
    write_be(buf, u64::from(value as u8), offset, 1)
}

/// Read the byte at `offset`.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if `offset` is past the end of `buf`.
pub fn read_byte(buf: &[u8], offset: usize) -> Result<u8> {
    read_be(buf, offset, 1).map(|v| v as u8)
}

/// Write the low 16 bits of `value` as two big-endian bytes.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if the field does not fit.
pub fn write_i16(buf: &mut [u8], value: i32, offset: usize) -> Result<()> {
    write_be(buf, u64::from(value as u16), offset, 2)
}

/// Read two big-endian bytes as an unsigned 16-bit quantity.
///
/// The result is always in `0..=65535`; `0xFFFF` reads back as `65535`, so a
/// round trip through [`write_i16`] yields `value & 0xFFFF`.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if the field does not fit.
pub fn read_i16(buf: &[u8], offset: usize) -> Result<i32> {
    read_be(buf, offset, 2).map(|v| i32::from(v as u16))
}

/// Write `value` as four big-endian bytes.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if the field does not fit.
pub fn write_i32(buf: &mut [u8], value: i32, offset: usize) -> Result<()> {
    write_be(buf, u64::from(value as u32), offset, 4)
}

/// Read four big-endian bytes as a signed 32-bit value.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if the field does not fit.
pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32> {
    read_be(buf, offset, 4).map(|v| v as u32 as i32)
}

/// Write `value` as eight big-endian bytes.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if the field does not fit.
pub fn write_i64(buf: &mut [u8], value: i64, offset: usize) -> Result<()> {
    write_be(buf, value as u64, offset, 8)
}

/// Read eight big-endian bytes as a signed 64-bit value.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if the field does not fit.
pub fn read_i64(buf: &[u8], offset: usize) -> Result<i64> {
    read_be(buf, offset, 8).map(|v| v as i64)
}

/// Convert `value` into a fresh 4-byte big-endian array.
#[must_use]
pub fn i32_to_bytes(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Convert up to four bytes into an `i32`.
///
/// Bytes are placed from the most significant end, so a 2-byte input
/// `[0x12, 0x34]` yields `0x1234_0000`.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if more than four bytes are given.
pub fn bytes_to_i32(bytes: &[u8]) -> Result<i32> {
    if bytes.len() > 4 {
        return Err(Error::destination_too_small(0, bytes.len(), 4));
    }
    let mut word = [0u8; 4];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(i32::from_be_bytes(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_write_i32_layout() {
        let mut buf = [0u8; 6];
        write_i32(&mut buf, 0x0102_0304, 1).unwrap();
        assert_eq!(buf, [0x00, 0x01, 0x02, 0x03, 0x04, 0x00]);
    }

    #[test]
    fn test_i32_negative_round_trip() {
        let mut buf = [0u8; 4];
        write_i32(&mut buf, i32::MIN, 0).unwrap();
        assert_eq!(buf, [0x80, 0, 0, 0]);
        assert_eq!(read_i32(&buf, 0).unwrap(), i32::MIN);

        write_i32(&mut buf, -1, 0).unwrap();
        assert_eq!(buf, [0xFF; 4]);
        assert_eq!(read_i32(&buf, 0).unwrap(), -1);
    }

    #[test]
    fn test_i16_uses_low_bits_only() {
        let mut buf = [0u8; 2];
        write_i16(&mut buf, 0x0012_3456, 0).unwrap();
        assert_eq!(buf, [0x34, 0x56]);
        assert_eq!(read_i16(&buf, 0).unwrap(), 0x3456);
    }

    #[test]
    fn test_i16_reads_unsigned() {
        let buf = [0x27, 0x10];
        assert_eq!(read_i16(&buf, 0).unwrap(), 10_000);

        let mut buf = [0u8; 2];
        write_i16(&mut buf, -1, 0).unwrap();
        assert_eq!(read_i16(&buf, 0).unwrap(), 0xFFFF);
    }

    #[test]
    fn test_i64_min_round_trip() {
        let mut buf = [0u8; 8];
        write_i64(&mut buf, i64::MIN, 0).unwrap();
        assert_eq!(buf, [0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(read_i64(&buf, 0).unwrap(), i64::MIN);
    }

    #[test]
    fn test_i64_high_bit_in_low_bytes() {
        // Every byte has its high bit set; a per-byte signed OR would smear these.
        let mut buf = [0u8; 8];
        write_i64(&mut buf, -0x7F7F_7F7F_7F7F_7F7F, 0).unwrap();
        assert_eq!(buf, [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x81]);
        assert_eq!(read_i64(&buf, 0).unwrap(), -0x7F7F_7F7F_7F7F_7F7F);
    }

    #[test]
    fn test_byte_accessors() {
        let mut buf = [0u8; 3];
        write_byte(&mut buf, 0x1FF, 2).unwrap();
        assert_eq!(buf, [0, 0, 0xFF]);
        assert_eq!(read_byte(&buf, 2).unwrap(), 0xFF);
        write_byte(&mut buf, -128, 0).unwrap();
        assert_eq!(read_byte(&buf, 0).unwrap(), 0x80);
    }

    #[test]
    fn test_write_out_of_bounds_leaves_buffer() {
        let mut buf = [0xAAu8; 6];
        let err = write_i32(&mut buf, 7, 3).unwrap_err();
        assert!(matches!(err, Error::DestinationTooSmall { .. }));
        assert_eq!(buf, [0xAA; 6]);
    }

    #[test]
    fn test_read_out_of_bounds() {
        let buf = [0u8; 7];
        assert!(matches!(
            read_i64(&buf, 0).unwrap_err(),
            Error::SourceTooShort { .. }
        ));
        assert!(read_byte(&buf, 7).is_err());
    }

    #[test]
    fn test_i32_to_bytes() {
        assert_eq!(i32_to_bytes(-2), [0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_bytes_to_i32_short_input() {
        assert_eq!(bytes_to_i32(&[0x12, 0x34]).unwrap(), 0x1234_0000);
        assert_eq!(bytes_to_i32(&[]).unwrap(), 0);
        assert_eq!(bytes_to_i32(&[0xFF, 0xFF, 0xFF, 0xFE]).unwrap(), -2);
    }

    #[test]
    fn test_bytes_to_i32_too_long() {
        assert!(bytes_to_i32(&[0; 5]).unwrap_err().is_bounds_error());
    }

    proptest! {
        #[test]
        fn prop_i32_round_trip(v in any::<i32>(), offset in 0usize..4) {
            let mut buf = [0u8; 8];
            write_i32(&mut buf, v, offset).unwrap();
            prop_assert_eq!(read_i32(&buf, offset).unwrap(), v);
        }

        #[test]
        fn prop_i16_round_trip_low_bits(v in any::<i32>()) {
            let mut buf = [0u8; 2];
            write_i16(&mut buf, v, 0).unwrap();
            prop_assert_eq!(read_i16(&buf, 0).unwrap(), v & 0xFFFF);
        }

        #[test]
        fn prop_i64_round_trip(v in any::<i64>()) {
            let mut buf = [0u8; 8];
            write_i64(&mut buf, v, 0).unwrap();
            prop_assert_eq!(read_i64(&buf, 0).unwrap(), v);
            prop_assert_eq!(buf, v.to_be_bytes());
        }
    }
}
