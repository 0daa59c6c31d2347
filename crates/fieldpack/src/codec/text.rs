//! Fixed-width text fields.
//!
//! Text is encoded with a [`TextEncoding`] and right-padded with ASCII spaces
//! to the field width. Reading returns the full field, padding included.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::buffer::pad_right;
use super::{dst_range, src_range};
use crate::error::{Error, Result};

/// Byte used to pad text fields.
pub const TEXT_PAD: u8 = b' ';

/// Character encodings supported for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// 7-bit US-ASCII.
    Ascii,
    /// ISO-8859-1, one byte per code point `U+0000..=U+00FF`.
    Latin1,
}

impl TextEncoding {
    /// Canonical name of the encoding.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Encode `text` into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if a character cannot be represented.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Ascii => self.encode_narrow(text, 0x7F),
            Self::Latin1 => self.encode_narrow(text, 0xFF),
        }
    }

    fn encode_narrow(self, text: &str, max: u32) -> Result<Vec<u8>> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let code = u32::from(c);
                if code <= max {
                    Ok(code as u8)
                } else {
                    Err(Error::encoding(
                        self.name(),
                        format!("character {c:?} at index {i} is not representable"),
                    ))
                }
            })
            .collect()
    }

    /// Decode `bytes` into text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the bytes are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::encoding(self.name(), e.to_string())),
            Self::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(Error::encoding(
                        self.name(),
                        format!("byte 0x{:02X} at index {pos} is not ASCII", bytes[pos]),
                    ));
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "utf8" => Ok(Self::Utf8),
            "ascii" | "usascii" => Ok(Self::Ascii),
            "latin1" | "iso88591" | "l1" => Ok(Self::Latin1),
            _ => Err(Error::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TextEncoding> for &'static str {
    fn from(encoding: TextEncoding) -> Self {
        encoding.name()
    }
}

/// Encode `text`, pad it with spaces to `width` bytes and write it at `offset`.
///
/// # Errors
///
/// Returns [`Error::DestinationTooSmall`] if the field does not fit in `buf`,
/// [`Error::Encoding`] if `text` cannot be encoded, or
/// [`Error::FieldOverflow`] if the encoded text is longer than `width`.
/// The buffer is left untouched on error.
pub fn write_string(
    buf: &mut [u8],
    text: &str,
    offset: usize,
    width: usize,
    encoding: TextEncoding,
) -> Result<()> {
    let range = dst_range(buf.len(), offset, width)?;
    let encoded = encoding.encode(text)?;
    if encoded.len() > width {
        return Err(Error::FieldOverflow {
            needed: encoded.len(),
            width,
        });
    }
    let padded = pad_right(&encoded, width, TEXT_PAD)?;
    buf[range].copy_from_slice(&padded);
    Ok(())
}

/// Decode `width` bytes at `offset`. Padding is not trimmed.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if the field does not fit in `buf`, or
/// [`Error::Encoding`] if the bytes are invalid for `encoding`.
pub fn read_string(
    buf: &[u8],
    offset: usize,
    width: usize,
    encoding: TextEncoding,
) -> Result<String> {
    let range = src_range(buf.len(), offset, width)?;
    encoding.decode(&buf[range])
}
