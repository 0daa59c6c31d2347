//! Typed field values and decoded records.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::layout::FieldKind;
use crate::codec::{bits_to_byte, bits_to_string, byte_to_bits, hex_to_i64, parse_timestamp};
use crate::error::{Error, Result};

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Any integer field, including single bytes.
    Int(i64),
    /// Decoded text, padding included.
    Text(String),
    /// BCD digits.
    Digits(String),
    /// A timestamp, `None` when the stored bytes are not a valid date.
    Timestamp(Option<NaiveDateTime>),
    /// The 8 bits of a byte, most significant first.
    Bits([u8; 8]),
}

impl Value {
    /// Parse command-line text into a value suited to `kind`.
    ///
    /// Integers accept decimal or `0x`-prefixed hex. Timestamps use
    /// `yyyyMMddHHmmss`. Bit fields take a 4- or 8-character bit string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueMismatch`] if the text does not parse for `kind`.
    pub fn parse_for(field: &str, kind: FieldKind, text: &str) -> Result<Self> {
        let mismatch = |e: Error| Error::value_mismatch(field, kind.describe(), e.to_string());
        match kind {
            FieldKind::Byte | FieldKind::Int16 | FieldKind::Int32 | FieldKind::Int64 => {
                let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    Some(hex) => hex_to_i64(hex).map_err(mismatch)?,
                    None => text.parse::<i64>().map_err(|e| {
                        Error::value_mismatch(field, kind.describe(), e.to_string())
                    })?,
                };
                Ok(Self::Int(value))
            }
            FieldKind::Text { .. } => Ok(Self::Text(text.to_string())),
            FieldKind::Bcd { .. } => Ok(Self::Digits(text.to_string())),
            FieldKind::Timestamp => parse_timestamp(text)
                .map(|ts| Self::Timestamp(Some(ts)))
                .map_err(mismatch),
            FieldKind::Bits => bits_to_byte(text)
                .map(|b| Self::Bits(byte_to_bits(b)))
                .map_err(mismatch),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Digits(s) => f.write_str(s),
            Self::Timestamp(Some(ts)) => write!(f, "{ts}"),
            Self::Timestamp(None) => f.write_str("-"),
            Self::Bits(bits) => f.write_str(&bits_to_string(bits)),
        }
    }
}

/// An ordered set of named values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an earlier value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style [`Record::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a value by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of values in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
