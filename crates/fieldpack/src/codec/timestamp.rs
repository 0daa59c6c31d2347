//! Calendar timestamps packed as 7 BCD bytes.
//!
//! A timestamp is rendered as the 14 digits `yyyyMMddHHmmss` and packed two
//! digits per byte. Decoding always expands all 14 digits, so timestamps whose
//! first digit is `0` (years before 1000) survive the round trip.

use chrono::{Datelike, NaiveDateTime};

use super::bcd::{bcd_to_decimal, bcd_to_digits, decimal_to_bcd};
use super::{dst_range, src_range};
use crate::error::{Error, Result};

/// Encoded size of a timestamp in bytes.
pub const TIMESTAMP_LEN: usize = 7;

/// Number of decimal digits in a timestamp.
pub const TIMESTAMP_DIGITS: usize = 14;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Pack `timestamp` into 7 BCD bytes at `offset`.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if 7 bytes do not fit at `offset`,
/// or [`Error::InvalidTimestamp`] if the year is outside `0..=9999`.
pub fn encode_timestamp(buf: &mut [u8], timestamp: &NaiveDateTime, offset: usize) -> Result<()> {
    let range = dst_range(buf.len(), offset, TIMESTAMP_LEN)?;
    if !(0..=9999).contains(&timestamp.year()) {
        return Err(Error::invalid_timestamp(
            timestamp.to_string(),
            "year must be between 0 and 9999",
        ));
    }
    let digits = timestamp.format(TIMESTAMP_FORMAT).to_string();
    let packed = decimal_to_bcd(&digits)?;
    buf[range].copy_from_slice(&packed);
    Ok(())
}

/// Read the 7 bytes at `offset` as a 14-digit string.
///
/// Leading zeros are kept. Bytes holding non-decimal nibbles expand to more
/// than 14 characters and will not parse.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if 7 bytes are not available at `offset`.
pub fn read_timestamp_digits(buf: &[u8], offset: usize) -> Result<String> {
    let range = src_range(buf.len(), offset, TIMESTAMP_LEN)?;
    Ok(bcd_to_digits(&buf[range]))
}

/// Read the 7 bytes at `offset` with single-leading-zero suppression.
///
/// This is the historical rendering: a block starting with a `0` digit
/// yields 13 characters, which [`parse_timestamp`] rejects.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if 7 bytes are not available at `offset`.
pub fn read_timestamp_digits_legacy(buf: &[u8], offset: usize) -> Result<String> {
    let range = src_range(buf.len(), offset, TIMESTAMP_LEN)?;
    Ok(bcd_to_decimal(&buf[range]))
}

/// Parse a 14-digit `yyyyMMddHHmmss` string.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if the input is not exactly 14 ASCII
/// digits or does not name a valid date and time.
pub fn parse_timestamp(digits: &str) -> Result<NaiveDateTime> {
    if digits.len() != TIMESTAMP_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_timestamp(
            digits,
            format!("expected {TIMESTAMP_DIGITS} digits in yyyyMMddHHmmss form"),
        ));
    }
    NaiveDateTime::parse_from_str(digits, TIMESTAMP_FORMAT)
        .map_err(|e| Error::invalid_timestamp(digits, e.to_string()))
}

/// Decode the 7-byte BCD timestamp at `offset`.
///
/// Returns `Ok(None)` when the bytes do not form a valid date, such as an
/// all-zero block.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if 7 bytes are not available at `offset`.
pub fn decode_timestamp(buf: &[u8], offset: usize) -> Result<Option<NaiveDateTime>> {
    let digits = read_timestamp_digits(buf, offset)?;
    Ok(parse_timestamp(&digits).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_encode_timestamp_layout() {
        let mut buf = [0u8; 9];
        encode_timestamp(&mut buf, &ts(1999, 1, 2, 3, 4, 5), 1).unwrap();
        assert_eq!(buf, [0x00, 0x19, 0x99, 0x01, 0x02, 0x03, 0x04, 0x05, 0x00]);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let original = ts(1999, 1, 2, 3, 4, 5);
        let mut buf = [0u8; TIMESTAMP_LEN];
        encode_timestamp(&mut buf, &original, 0).unwrap();

        assert_eq!(read_timestamp_digits(&buf, 0).unwrap(), "19990102030405");
        assert_eq!(decode_timestamp(&buf, 0).unwrap(), Some(original));
    }

    #[test]
    fn test_timestamp_leading_zero_year_round_trip() {
        let original = ts(999, 12, 31, 23, 59, 59);
        let mut buf = [0u8; TIMESTAMP_LEN];
        encode_timestamp(&mut buf, &original, 0).unwrap();

        assert_eq!(read_timestamp_digits(&buf, 0).unwrap(), "09991231235959");
        assert_eq!(decode_timestamp(&buf, 0).unwrap(), Some(original));
    }

    #[test]
    fn test_legacy_digits_drop_leading_zero() {
        let mut buf = [0u8; TIMESTAMP_LEN];
        encode_timestamp(&mut buf, &ts(999, 12, 31, 23, 59, 59), 0).unwrap();

        let legacy = read_timestamp_digits_legacy(&buf, 0).unwrap();
        assert_eq!(legacy, "9991231235959");
        assert!(parse_timestamp(&legacy).is_err());
    }

    #[test]
    fn test_decode_all_zero_block_is_none() {
        let buf = [0u8; TIMESTAMP_LEN];
        assert_eq!(read_timestamp_digits(&buf, 0).unwrap().len(), TIMESTAMP_DIGITS);
        assert_eq!(decode_timestamp(&buf, 0).unwrap(), None);
    }

    #[test]
    fn test_decode_invalid_month_is_none() {
        let buf = [0x20, 0x24, 0x13, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(decode_timestamp(&buf, 0).unwrap(), None);
    }

    #[test]
    fn test_decode_non_decimal_nibbles_is_none() {
        let buf = [0x20, 0x24, 0x0A, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(decode_timestamp(&buf, 0).unwrap(), None);
    }

    #[test]
    fn test_timestamp_bounds() {
        let mut buf = [0u8; 6];
        assert!(matches!(
            encode_timestamp(&mut buf, &ts(2024, 1, 1, 0, 0, 0), 0).unwrap_err(),
            Error::DestinationTooSmall { .. }
        ));
        assert!(matches!(
            decode_timestamp(&buf, 0).unwrap_err(),
            Error::SourceTooShort { .. }
        ));
    }

    #[test]
    fn test_encode_rejects_five_digit_year() {
        let mut buf = [0u8; TIMESTAMP_LEN];
        let err = encode_timestamp(&mut buf, &ts(10_000, 1, 1, 0, 0, 0), 0).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(buf, [0; TIMESTAMP_LEN]);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("20240229120000").unwrap(),
            ts(2024, 2, 29, 12, 0, 0)
        );
        assert!(parse_timestamp("20230229120000").is_err());
        assert!(parse_timestamp("2024022912000").is_err());
        assert!(parse_timestamp("+0240229120000").is_err());
    }
}
