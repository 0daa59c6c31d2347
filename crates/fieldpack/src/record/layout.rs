//! Named field layouts for fixed-width records.
//!
//! A [`Layout`] lists the fields of a record, each at a fixed offset with a
//! fixed width. Encoding writes every field through the codec; decoding reads
//! every field back into a [`Record`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::value::{Record, Value};
use crate::codec::{self, bcd_to_digits, byte_to_bits, decimal_to_bcd, TextEncoding, TIMESTAMP_LEN};
use crate::error::{Error, Result};

/// Largest record a layout may describe, in bytes.
pub const MAX_RECORD_LEN: usize = 1 << 20;

/// The kind of value a field holds, which also fixes its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// One byte.
    Byte,
    /// Two-byte big-endian integer.
    Int16,
    /// Four-byte big-endian integer.
    Int32,
    /// Eight-byte big-endian integer.
    Int64,
    /// Space-padded text.
    Text {
        /// Field width in bytes.
        width: usize,
    },
    /// BCD digits, right-aligned and zero-filled.
    Bcd {
        /// Field width in bytes.
        width: usize,
    },
    /// Seven-byte BCD timestamp.
    Timestamp,
    /// One byte viewed as 8 bits.
    Bits,
}

impl FieldKind {
    /// Width of the field in bytes.
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Self::Byte | Self::Bits => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
            Self::Text { width } | Self::Bcd { width } => width,
            Self::Timestamp => TIMESTAMP_LEN,
        }
    }

    /// Short description used in error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Byte => "a byte",
            Self::Int16 => "a 16-bit integer",
            Self::Int32 => "a 32-bit integer",
            Self::Int64 => "a 64-bit integer",
            Self::Text { .. } => "text",
            Self::Bcd { .. } => "BCD digits",
            Self::Timestamp => "a yyyyMMddHHmmss timestamp",
            Self::Bits => "a bit string",
        }
    }

    /// Inclusive range of integers accepted by an integer field.
    fn int_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Byte => Some((i64::from(i8::MIN), i64::from(u8::MAX))),
            Self::Int16 => Some((i64::from(i16::MIN), i64::from(u16::MAX))),
            Self::Int32 => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "byte"),
            Self::Int16 => write!(f, "int16"),
            Self::Int32 => write!(f, "int32"),
            Self::Int64 => write!(f, "int64"),
            Self::Text { width } => write!(f, "text({width})"),
            Self::Bcd { width } => write!(f, "bcd({width})"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Bits => write!(f, "bits"),
        }
    }
}

/// A named field at a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within a layout.
    pub name: String,
    /// Byte offset of the field from the start of the record.
    pub offset: usize,
    /// What the field holds.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    /// Create a field.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            offset,
            kind,
        }
    }

    /// Offset one past the last byte of the field.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.kind.width())
    }
}

/// A validated record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    name: String,
    encoding: TextEncoding,
    fields: Vec<Field>,
}

impl Layout {
    /// Create a layout, checking that its fields are well formed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if two fields share a name, a text
    /// or BCD field has zero width, a field ends past [`MAX_RECORD_LEN`], or
    /// two fields overlap.
    pub fn new(name: impl Into<String>, encoding: TextEncoding, fields: Vec<Field>) -> Result<Self> {
        let name = name.into();
        let mut sorted: Vec<&Field> = fields.iter().collect();
        sorted.sort_by_key(|f| f.offset);

        for (i, field) in sorted.iter().enumerate() {
            if field.kind.width() == 0 {
                return Err(Error::config_validation(format!(
                    "layout '{name}': field '{}' has zero width",
                    field.name
                )));
            }
            match field.offset.checked_add(field.kind.width()) {
                Some(end) if end <= MAX_RECORD_LEN => {}
                _ => {
                    return Err(Error::config_validation(format!(
                        "layout '{name}': field '{}' ends past the {MAX_RECORD_LEN}-byte record limit",
                        field.name
                    )));
                }
            }
            if sorted[..i].iter().any(|other| other.name == field.name) {
                return Err(Error::config_validation(format!(
                    "layout '{name}': duplicate field name '{}'",
                    field.name
                )));
            }
            if let Some(prev) = i.checked_sub(1).map(|j| sorted[j]) {
                if prev.end() > field.offset {
                    return Err(Error::config_validation(format!(
                        "layout '{name}': fields '{}' and '{}' overlap",
                        prev.name, field.name
                    )));
                }
            }
        }

        Ok(Self {
            name,
            encoding,
            fields,
        })
    }

    /// Layout name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text encoding used for text fields.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Size of an encoded record: the end of the last field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.iter().map(Field::end).max().unwrap_or(0)
    }

    /// Check if the layout has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse `name=value` assignments into a record for this layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for names the layout does not define,
    /// [`Error::ValueMismatch`] for values that do not parse, or
    /// [`Error::InvalidAssignment`] for an assignment without `=`.
    pub fn parse_assignments<S: AsRef<str>>(&self, assignments: &[S]) -> Result<Record> {
        let mut record = Record::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (name, text) = assignment
                .split_once('=')
                .ok_or_else(|| Error::InvalidAssignment(assignment.to_string()))?;
            let field = self.field(name).ok_or_else(|| self.unknown_field(name))?;
            record.set(name, Value::parse_for(name, field.kind, text)?);
        }
        Ok(record)
    }

    /// Encode `record` into a new buffer of [`Layout::len`] bytes.
    ///
    /// Fields missing from the record are written as zeros (spaces for text).
    ///
    /// # Errors
    ///
    /// See [`Layout::encode_into`].
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.len()];
        self.encode_into(&mut buf, record)?;
        Ok(buf)
    }

    /// Encode `record` into `buf`, which must hold at least [`Layout::len`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the record names a field the layout
    /// lacks, [`Error::ValueMismatch`] if a value does not suit its field,
    /// or any codec error raised while writing.
    pub fn encode_into(&self, buf: &mut [u8], record: &Record) -> Result<()> {
        if let Some((name, _)) = record.iter().find(|(n, _)| self.field(n).is_none()) {
            return Err(self.unknown_field(name));
        }
        if buf.len() < self.len() {
            return Err(Error::destination_too_small(0, self.len(), buf.len()));
        }

        for field in &self.fields {
            trace!(layout = %self.name, field = %field.name, kind = %field.kind, "encoding field");
            match record.get(&field.name) {
                Some(value) => self.write_field(buf, field, value)?,
                None => self.write_blank(buf, field)?,
            }
        }
        debug!(layout = %self.name, fields = record.len(), bytes = self.len(), "encoded record");
        Ok(())
    }

    /// Decode every field of `buf` into a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceTooShort`] if `buf` is shorter than the layout,
    /// or [`Error::Encoding`] if a text field does not decode.
    pub fn decode(&self, buf: &[u8]) -> Result<Record> {
        if buf.len() < self.len() {
            return Err(Error::source_too_short(0, self.len(), buf.len()));
        }

        let mut record = Record::new();
        for field in &self.fields {
            trace!(layout = %self.name, field = %field.name, kind = %field.kind, "decoding field");
            record.set(field.name.clone(), self.read_field(buf, field)?);
        }
        debug!(layout = %self.name, bytes = buf.len(), "decoded record");
        Ok(record)
    }

    fn unknown_field(&self, name: &str) -> Error {
        Error::UnknownField {
            layout: self.name.clone(),
            field: name.to_string(),
        }
    }

    fn write_field(&self, buf: &mut [u8], field: &Field, value: &Value) -> Result<()> {
        let offset = field.offset;
        match (field.kind, value) {
            (kind, Value::Int(v)) => {
                let Some((min, max)) = kind.int_range() else {
                    return Err(Error::value_mismatch(
                        &field.name,
                        kind.describe(),
                        format!("got integer {v}"),
                    ));
                };
                if *v < min || *v > max {
                    return Err(Error::value_mismatch(
                        &field.name,
                        kind.describe(),
                        format!("{v} is outside {min}..={max}"),
                    ));
                }
                match kind {
                    FieldKind::Byte => codec::write_byte(buf, *v as i32, offset),
                    FieldKind::Int16 => codec::write_i16(buf, *v as i32, offset),
                    FieldKind::Int32 => codec::write_i32(buf, *v as i32, offset),
                    _ => codec::write_i64(buf, *v, offset),
                }
            }
            (FieldKind::Text { width }, Value::Text(text)) => {
                codec::write_string(buf, text, offset, width, self.encoding)
            }
            (FieldKind::Bcd { width }, Value::Digits(digits)) => {
                let packed = decimal_to_bcd(digits)?;
                if packed.len() > width {
                    return Err(Error::FieldOverflow {
                        needed: packed.len(),
                        width,
                    });
                }
                let mut cell = vec![0u8; width];
                cell[width - packed.len()..].copy_from_slice(&packed);
                codec::copy_range(&cell, 0, buf, offset, width)
            }
            (FieldKind::Timestamp, Value::Timestamp(Some(ts))) => {
                codec::encode_timestamp(buf, ts, offset)
            }
            (FieldKind::Timestamp, Value::Timestamp(None)) => self.write_blank(buf, field),
            (FieldKind::Bits, Value::Bits(bits)) => {
                let byte = bits.iter().fold(0u8, |acc, b| (acc << 1) | (b & 1));
                codec::write_byte(buf, i32::from(byte), offset)
            }
            (kind, other) => Err(Error::value_mismatch(
                &field.name,
                kind.describe(),
                format!("got {other}"),
            )),
        }
    }

    fn write_blank(&self, buf: &mut [u8], field: &Field) -> Result<()> {
        match field.kind {
            FieldKind::Text { width } => {
                codec::write_string(buf, "", field.offset, width, self.encoding)
            }
            kind => {
                let zeros = vec![0u8; kind.width()];
                codec::copy_range(&zeros, 0, buf, field.offset, zeros.len())
            }
        }
    }

    fn read_field(&self, buf: &[u8], field: &Field) -> Result<Value> {
        let offset = field.offset;
        Ok(match field.kind {
            FieldKind::Byte => Value::Int(i64::from(codec::read_byte(buf, offset)?)),
            FieldKind::Int16 => Value::Int(i64::from(codec::read_i16(buf, offset)?)),
            FieldKind::Int32 => Value::Int(i64::from(codec::read_i32(buf, offset)?)),
            FieldKind::Int64 => Value::Int(codec::read_i64(buf, offset)?),
            FieldKind::Text { width } => {
                Value::Text(codec::read_string(buf, offset, width, self.encoding)?)
            }
            FieldKind::Bcd { width } => {
                let mut cell = vec![0u8; width];
                codec::copy_range(buf, offset, &mut cell, 0, width)?;
                Value::Digits(bcd_to_digits(&cell))
            }
            FieldKind::Timestamp => Value::Timestamp(codec::decode_timestamp(buf, offset)?),
            FieldKind::Bits => Value::Bits(byte_to_bits(codec::read_byte(buf, offset)?)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn login_layout() -> Layout {
        Layout::new(
            "login",
            TextEncoding::Latin1,
            vec![
                Field::new("msg_type", 0, FieldKind::Int16),
                Field::new("seq", 2, FieldKind::Int32),
                Field::new("user", 6, FieldKind::Text { width: 8 }),
                Field::new("card", 14, FieldKind::Bcd { width: 3 }),
                Field::new("sent_at", 17, FieldKind::Timestamp),
                Field::new("flags", 24, FieldKind::Bits),
                Field::new("balance", 25, FieldKind::Int64),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_field_kind_widths() {
        assert_eq!(FieldKind::Byte.width(), 1);
        assert_eq!(FieldKind::Int16.width(), 2);
        assert_eq!(FieldKind::Int64.width(), 8);
        assert_eq!(FieldKind::Text { width: 12 }.width(), 12);
        assert_eq!(FieldKind::Timestamp.width(), 7);
    }

    #[test]
    fn test_field_kind_display() {
        assert_eq!(FieldKind::Bcd { width: 3 }.to_string(), "bcd(3)");
        assert_eq!(FieldKind::Int32.to_string(), "int32");
    }

    #[test]
    fn test_layout_len() {
        let layout = login_layout();
        assert_eq!(layout.len(), 33);
        assert!(!layout.is_empty());
        assert_eq!(layout.name(), "login");
        assert_eq!(layout.encoding(), TextEncoding::Latin1);
    }

    #[test]
    fn test_layout_rejects_overlap() {
        let err = Layout::new(
            "bad",
            TextEncoding::Utf8,
            vec![
                Field::new("a", 0, FieldKind::Int32),
                Field::new("b", 2, FieldKind::Int16),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_layout_rejects_duplicate_names() {
        let err = Layout::new(
            "bad",
            TextEncoding::Utf8,
            vec![
                Field::new("a", 0, FieldKind::Byte),
                Field::new("a", 1, FieldKind::Byte),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_layout_rejects_offset_overflow() {
        let err = Layout::new(
            "huge",
            TextEncoding::Utf8,
            vec![Field::new("n", usize::MAX - 1, FieldKind::Int32)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
        assert!(err.to_string().contains("record limit"));
    }

    #[test]
    fn test_layout_rejects_oversized_record() {
        let err = Layout::new(
            "huge",
            TextEncoding::Utf8,
            vec![Field::new("t", 0, FieldKind::Text { width: MAX_RECORD_LEN + 1 })],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));

        let layout = Layout::new(
            "max",
            TextEncoding::Utf8,
            vec![Field::new("b", MAX_RECORD_LEN - 1, FieldKind::Byte)],
        )
        .unwrap();
        assert_eq!(layout.len(), MAX_RECORD_LEN);
    }

    #[test]
    fn test_layout_rejects_zero_width() {
        let err = Layout::new(
            "bad",
            TextEncoding::Utf8,
            vec![Field::new("t", 0, FieldKind::Text { width: 0 })],
        )
        .unwrap_err();
        assert!(err.to_string().contains("zero width"));
    }

    #[test]
    fn test_encode_decode_record() {
        let layout = login_layout();
        let sent_at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let record = Record::new()
            .with("msg_type", Value::Int(0x0101))
            .with("seq", Value::Int(-7))
            .with("user", Value::Text("zoë".to_string()))
            .with("card", Value::Digits("1234".to_string()))
            .with("sent_at", Value::Timestamp(Some(sent_at)))
            .with("flags", Value::Bits([1, 0, 0, 0, 0, 0, 0, 1]))
            .with("balance", Value::Int(i64::MIN + 1));

        let bytes = layout.encode(&record).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(&bytes[0..2], &[0x01, 0x01]);
        assert_eq!(&bytes[2..6], &[0xFF, 0xFF, 0xFF, 0xF9]);
        assert_eq!(&bytes[6..14], &[b'z', b'o', 0xEB, b' ', b' ', b' ', b' ', b' ']);
        assert_eq!(&bytes[14..17], &[0x00, 0x12, 0x34]);
        assert_eq!(&bytes[17..24], &[0x20, 0x24, 0x03, 0x09, 0x08, 0x30, 0x00]);
        assert_eq!(bytes[24], 0x81);

        let decoded = layout.decode(&bytes).unwrap();
        assert_eq!(decoded.get("msg_type"), Some(&Value::Int(0x0101)));
        assert_eq!(decoded.get("seq"), Some(&Value::Int(-7)));
        assert_eq!(decoded.get("user"), Some(&Value::Text("zoë     ".to_string())));
        assert_eq!(decoded.get("card"), Some(&Value::Digits("001234".to_string())));
        assert_eq!(decoded.get("sent_at"), Some(&Value::Timestamp(Some(sent_at))));
        assert_eq!(decoded.get("flags"), Some(&Value::Bits([1, 0, 0, 0, 0, 0, 0, 1])));
        assert_eq!(decoded.get("balance"), Some(&Value::Int(i64::MIN + 1)));
    }

    #[test]
    fn test_missing_fields_are_blank() {
        let layout = login_layout();
        let bytes = layout.encode(&Record::new()).unwrap();
        assert_eq!(&bytes[6..14], b"        ");
        assert!(bytes[..6].iter().all(|&b| b == 0));

        let decoded = layout.decode(&bytes).unwrap();
        assert_eq!(decoded.get("sent_at"), Some(&Value::Timestamp(None)));
        assert_eq!(decoded.len(), layout.fields().len());
    }

    #[test]
    fn test_encode_unknown_field() {
        let record = Record::new().with("nope", Value::Int(1));
        let err = login_layout().encode(&record).unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_encode_value_kind_mismatch() {
        let record = Record::new().with("seq", Value::Text("1".to_string()));
        let err = login_layout().encode(&record).unwrap_err();
        assert!(matches!(err, Error::ValueMismatch { .. }));
    }

    #[test]
    fn test_encode_int_out_of_range() {
        let record = Record::new().with("seq", Value::Int(i64::from(i32::MAX) + 1));
        assert!(login_layout().encode(&record).is_err());

        let record = Record::new().with("msg_type", Value::Int(0xFFFF));
        assert!(login_layout().encode(&record).is_ok());
    }

    #[test]
    fn test_encode_bcd_overflow() {
        let record = Record::new().with("card", Value::Digits("1234567".to_string()));
        let err = login_layout().encode(&record).unwrap_err();
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_encode_into_short_buffer() {
        let mut buf = [0u8; 10];
        let err = login_layout().encode_into(&mut buf, &Record::new()).unwrap_err();
        assert!(matches!(err, Error::DestinationTooSmall { .. }));
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = login_layout().decode(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, Error::SourceTooShort { .. }));
    }

    #[test]
    fn test_parse_assignments() {
        let layout = login_layout();
        let record = layout
            .parse_assignments(&["seq=42", "user=bob", "sent_at=20240309083000"])
            .unwrap();
        assert_eq!(record.get("seq"), Some(&Value::Int(42)));
        assert_eq!(record.get("user"), Some(&Value::Text("bob".to_string())));

        assert!(matches!(
            layout.parse_assignments(&["ghost=1"]).unwrap_err(),
            Error::UnknownField { .. }
        ));
        assert!(matches!(
            layout.parse_assignments(&["seq"]).unwrap_err(),
            Error::InvalidAssignment(_)
        ));
    }

    #[test]
    fn test_field_deserialize_flattened_kind() {
        let json = r#"{"name": "user", "offset": 4, "kind": "text", "width": 10}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field, Field::new("user", 4, FieldKind::Text { width: 10 }));

        let json = r#"{"name": "seq", "offset": 0, "kind": "int32"}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind, FieldKind::Int32);
        assert_eq!(field.end(), 4);
    }
}
