//! Whole-record encoding on top of the codec.
//!
//! A [`Layout`] names each field of a fixed-width record. Layouts are usually
//! declared in the configuration file:
//!
//! ```toml
//! [layouts.login]
//! encoding = "ISO-8859-1"
//! fields = [
//!     { name = "msg_type", offset = 0, kind = "int16" },
//!     { name = "user", offset = 2, kind = "text", width = 16 },
//!     { name = "sent_at", offset = 18, kind = "timestamp" },
//! ]
//! ```
//!
//! # Example
//!
//! ```
//! use fieldpack::codec::TextEncoding;
//! use fieldpack::record::{Field, FieldKind, Layout, Record, Value};
//!
//! let layout = Layout::new(
//!     "ping",
//!     TextEncoding::Ascii,
//!     vec![
//!         Field::new("seq", 0, FieldKind::Int32),
//!         Field::new("tag", 4, FieldKind::Text { width: 4 }),
//!     ],
//! )
//! .unwrap();
//!
//! let record = Record::new()
//!     .with("seq", Value::Int(1))
//!     .with("tag", Value::Text("hi".into()));
//! let bytes = layout.encode(&record).unwrap();
//! assert_eq!(bytes, b"\0\0\0\x01hi  ");
//!
//! let decoded = layout.decode(&bytes).unwrap();
//! assert_eq!(decoded.get("seq"), Some(&Value::Int(1)));
//! ```

mod layout;
mod value;

pub use layout::{Field, FieldKind, Layout, MAX_RECORD_LEN};
pub use value::{Record, Value};
