//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Hex transcoding commands.
#[derive(Debug, Subcommand)]
pub enum HexCommand {
    /// Encode raw bytes as hex
    Encode {
        /// File to read (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Follow every byte pair with a space
        #[arg(short, long)]
        formatted: bool,
    },

    /// Decode hex into raw bytes
    Decode {
        /// Hex text (case-insensitive)
        hex: String,

        /// Write bytes to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show hex as a multi-line dump
    Dump {
        /// Hex text (case-insensitive)
        hex: String,

        /// Bytes per line (defaults to codec.dump_width)
        #[arg(short = 'w', long)]
        per_line: Option<usize>,
    },

    /// Read up to 16 hex digits as a big-endian signed 64-bit integer
    Int {
        /// Hex text (case-insensitive)
        hex: String,
    },
}

/// BCD commands.
#[derive(Debug, Subcommand)]
pub enum BcdCommand {
    /// Pack digits into BCD bytes, printed as hex
    Pack {
        /// Digits to pack (odd lengths are left-padded with 0)
        digits: String,
    },

    /// Unpack hex BCD bytes into digits
    Unpack {
        /// Hex text of the BCD bytes
        hex: String,

        /// Keep every digit instead of dropping one leading zero
        #[arg(long)]
        fixed: bool,
    },
}

/// Timestamp commands.
#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// Pack a yyyyMMddHHmmss timestamp into 7 BCD bytes, printed as hex
    Pack {
        /// Timestamp digits, e.g. 19990102030405
        timestamp: String,
    },

    /// Unpack 7 hex BCD bytes into a timestamp
    Unpack {
        /// Hex text of the 7 timestamp bytes
        hex: String,

        /// Show the historical digit rendering with one leading zero dropped
        #[arg(long)]
        legacy: bool,
    },
}

/// Bit inspection arguments.
#[derive(Debug, Args)]
pub struct BitsCommand {
    /// A hex byte such as "B0", or a bit string with --parse
    pub value: String,

    /// Parse VALUE as a 4- or 8-character bit string
    #[arg(short, long)]
    pub parse: bool,
}

/// Record layout commands.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// List configured layouts
    List,

    /// Decode a hex record with a layout
    Decode {
        /// Layout name
        layout: String,

        /// Hex text of the record
        hex: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Encode name=value assignments with a layout, printed as hex
    Encode {
        /// Layout name
        layout: String,

        /// Field assignments, e.g. seq=42 user=bob
        assignments: Vec<String>,

        /// Follow every byte pair with a space
        #[arg(short, long)]
        formatted: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain `name=value` lines
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
