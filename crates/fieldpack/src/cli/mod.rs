//! Command-line interface for fieldpack.
//!
//! This module provides the CLI structure for the `fpack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BcdCommand, BitsCommand, ConfigCommand, HexCommand, OutputFormat, RecordCommand, TimeCommand,
};

/// fpack - Pack and unpack fixed-width binary records
///
/// Converts between raw bytes, hex text, BCD digits, BCD timestamps and
/// named record layouts.
#[derive(Debug, Parser)]
#[command(name = "fpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert between bytes and hex
    #[command(subcommand)]
    Hex(HexCommand),

    /// Pack and unpack BCD digits
    #[command(subcommand)]
    Bcd(BcdCommand),

    /// Pack and unpack 7-byte BCD timestamps
    #[command(subcommand)]
    Time(TimeCommand),

    /// Show the bits of a byte or parse a bit string
    Bits(BitsCommand),

    /// Encode and decode records with configured layouts
    #[command(subcommand)]
    Record(RecordCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
