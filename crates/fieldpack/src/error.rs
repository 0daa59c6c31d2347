//! Error types for fieldpack.
//!
//! Every codec operation reports failures through [`Error`]. The variants fall
//! into four families: bounds problems (a field range does not fit a buffer),
//! text encoding problems, malformed input text (hex, BCD digits, timestamps,
//! bit strings), and invalid bit-string lengths. The remaining variants belong
//! to the record layer, configuration loading and the CLI.

use thiserror::Error;

/// The main error type for fieldpack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Bounds Errors ===
    /// A write (or copy) would run past the end of the destination buffer.
    #[error("destination too small: need {needed} bytes at offset {offset}, buffer holds {capacity}")]
    DestinationTooSmall {
        /// Offset the write starts at.
        offset: usize,
        /// Number of bytes to be written.
        needed: usize,
        /// Length of the destination buffer.
        capacity: usize,
    },

    /// A read (or copy) would run past the end of the source buffer.
    #[error("source too short: need {needed} bytes at offset {offset}, buffer holds {available}")]
    SourceTooShort {
        /// Offset the read starts at.
        offset: usize,
        /// Number of bytes to be read.
        needed: usize,
        /// Length of the source buffer.
        available: usize,
    },

    /// Encoded text does not fit its fixed-width field.
    #[error("text needs {needed} bytes but the field is {width} bytes wide")]
    FieldOverflow {
        /// Encoded length of the text.
        needed: usize,
        /// Width of the target field.
        width: usize,
    },

    // === Encoding Errors ===
    /// Text could not be encoded or decoded with the requested encoding.
    #[error("{encoding} encoding failed: {message}")]
    Encoding {
        /// Canonical name of the encoding.
        encoding: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// The named text encoding is not supported.
    #[error("unsupported text encoding '{0}'")]
    UnknownEncoding(String),

    // === Format Errors ===
    /// Hex text contained a character outside `0-9a-fA-F`.
    #[error("invalid hex character {character:?} at position {position}")]
    InvalidHex {
        /// The offending character.
        character: char,
        /// Character index within the input.
        position: usize,
    },

    /// BCD digit text contained a character outside `0-9a-zA-Z`.
    #[error("invalid BCD digit {character:?} at position {position}")]
    InvalidBcd {
        /// The offending character.
        character: char,
        /// Character index within the (unpadded) input.
        position: usize,
    },

    /// A timestamp could not be formatted or parsed as `yyyyMMddHHmmss`.
    #[error("invalid timestamp {value:?}: {message}")]
    InvalidTimestamp {
        /// The digits (or formatted timestamp) that failed.
        value: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A bit string contained a character other than `0` or `1`.
    #[error("invalid bit string {value:?}: only '0' and '1' are allowed")]
    InvalidBits {
        /// The offending bit string.
        value: String,
    },

    // === Length Errors ===
    /// A bit string had a length other than 4 or 8.
    #[error("bit string must be 4 or 8 characters long, got {length}")]
    InvalidBitLength {
        /// Length of the rejected input.
        length: usize,
    },

    // === Record Errors ===
    /// No layout with the given name is configured.
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    /// A value was supplied for a field the layout does not define.
    #[error("layout '{layout}' has no field named '{field}'")]
    UnknownField {
        /// Layout name.
        layout: String,
        /// Field name.
        field: String,
    },

    /// A `name=value` assignment was malformed.
    #[error("expected name=value, got '{0}'")]
    InvalidAssignment(String),

    /// A value does not fit the kind of the field it was supplied for.
    #[error("field '{field}' expects {expected}: {message}")]
    ValueMismatch {
        /// Field name.
        field: String,
        /// Human readable field kind.
        expected: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system or stdio operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fieldpack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a destination-too-small error.
    #[must_use]
    pub fn destination_too_small(offset: usize, needed: usize, capacity: usize) -> Self {
        Self::DestinationTooSmall {
            offset,
            needed,
            capacity,
        }
    }

    /// Create a source-too-short error.
    #[must_use]
    pub fn source_too_short(offset: usize, needed: usize, available: usize) -> Self {
        Self::SourceTooShort {
            offset,
            needed,
            available,
        }
    }

    /// Create an encoding error.
    #[must_use]
    pub fn encoding(encoding: &'static str, message: impl Into<String>) -> Self {
        Self::Encoding {
            encoding,
            message: message.into(),
        }
    }

    /// Create an invalid timestamp error.
    #[must_use]
    pub fn invalid_timestamp(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a value mismatch error.
    #[must_use]
    pub fn value_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::ValueMismatch {
            field: field.into(),
            expected,
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error means a field range did not fit a buffer.
    #[must_use]
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            Self::DestinationTooSmall { .. } | Self::SourceTooShort { .. } | Self::FieldOverflow { .. }
        )
    }

    /// Check if this error means the input text was malformed.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidHex { .. }
                | Self::InvalidBcd { .. }
                | Self::InvalidTimestamp { .. }
                | Self::InvalidBits { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_too_small_display() {
        let err = Error::destination_too_small(6, 4, 8);
        assert_eq!(
            err.to_string(),
            "destination too small: need 4 bytes at offset 6, buffer holds 8"
        );
    }

    #[test]
    fn test_source_too_short_display() {
        let err = Error::source_too_short(0, 7, 3);
        assert_eq!(
            err.to_string(),
            "source too short: need 7 bytes at offset 0, buffer holds 3"
        );
    }

    #[test]
    fn test_bounds_errors_are_distinct() {
        let dst = Error::destination_too_small(0, 1, 0);
        let src = Error::source_too_short(0, 1, 0);
        assert!(matches!(dst, Error::DestinationTooSmall { .. }));
        assert!(matches!(src, Error::SourceTooShort { .. }));
        assert!(dst.is_bounds_error());
        assert!(src.is_bounds_error());
    }

    #[test]
    fn test_field_overflow_is_bounds_error() {
        let err = Error::FieldOverflow {
            needed: 12,
            width: 10,
        };
        assert!(err.is_bounds_error());
        assert!(!err.is_format_error());
        assert!(err.to_string().contains("10 bytes wide"));
    }

    #[test]
    fn test_encoding_error_display() {
        let err = Error::encoding("US-ASCII", "character 'é' at index 3 is not representable");
        let msg = err.to_string();
        assert!(msg.starts_with("US-ASCII encoding failed"));
        assert!(msg.contains("index 3"));
    }

    #[test]
    fn test_format_errors() {
        let hex = Error::InvalidHex {
            character: 'G',
            position: 1,
        };
        let bcd = Error::InvalidBcd {
            character: '-',
            position: 0,
        };
        let ts = Error::invalid_timestamp("19991302000000", "month out of range");
        let bits = Error::InvalidBits {
            value: "10x0".to_string(),
        };
        for err in [hex, bcd, ts, bits] {
            assert!(err.is_format_error(), "{err}");
            assert!(!err.is_bounds_error(), "{err}");
        }
    }

    #[test]
    fn test_invalid_hex_display() {
        let err = Error::InvalidHex {
            character: 'Z',
            position: 5,
        };
        assert_eq!(err.to_string(), "invalid hex character 'Z' at position 5");
    }

    #[test]
    fn test_invalid_bit_length_display() {
        let err = Error::InvalidBitLength { length: 6 };
        assert_eq!(
            err.to_string(),
            "bit string must be 4 or 8 characters long, got 6"
        );
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_unknown_layout_display() {
        let err = Error::UnknownLayout("login".to_string());
        assert_eq!(err.to_string(), "unknown layout 'login'");
    }

    #[test]
    fn test_value_mismatch_display() {
        let err = Error::value_mismatch("amount", "an integer", "invalid digit found in string");
        let msg = err.to_string();
        assert!(msg.contains("amount"));
        assert!(msg.contains("an integer"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::config_validation("fields 'a' and 'b' overlap");
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
