//! `fieldpack` - Fixed-width binary record codec
//!
//! This library packs and unpacks the byte-level fields found in fixed-width
//! binary messages: big-endian integers, padded text, hex, BCD digits, 7-byte
//! BCD timestamps and single bits. The [`record`] module builds named layouts
//! on top of the [`codec`] primitives.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;

pub use codec::TextEncoding;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Layout, Record, Value};
