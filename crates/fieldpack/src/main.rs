//! `fpack` - CLI for fieldpack
//!
//! This binary exposes the codec and configured record layouts on the command
//! line. Results go to stdout; log lines go to stderr.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use fieldpack::cli::{
    BcdCommand, BitsCommand, Cli, Command, ConfigCommand, HexCommand, OutputFormat, RecordCommand,
    TimeCommand,
};
use fieldpack::codec::{
    bcd_to_decimal, bcd_to_digits, bits_to_byte, bits_to_signed_byte, byte_to_bit_string,
    bytes_to_hex, decimal_to_bcd, decode_timestamp, encode_timestamp, hex_dump, hex_to_bytes,
    hex_to_i64, parse_timestamp, read_timestamp_digits, read_timestamp_digits_legacy,
    TIMESTAMP_LEN,
};
use fieldpack::{init_logging, Config, Layout, Record};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation reports a broken file instead of failing to start
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Hex(cmd) => handle_hex(&config, cmd),
        Command::Bcd(cmd) => handle_bcd(&cmd),
        Command::Time(cmd) => handle_time(&cmd),
        Command::Bits(cmd) => handle_bits(&cmd),
        Command::Record(cmd) => handle_record(&config, cmd),
        Command::Config(cmd) => handle_config(&config, &cmd),
    }
}

/// Hex typed on the command line may be grouped with spaces.
fn parse_hex_arg(hex: &str) -> Result<Vec<u8>> {
    let compact: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        bail!("hex input has an odd number of digits: {compact}");
    }
    hex_to_bytes(&compact).with_context(|| format!("invalid hex input: {hex}"))
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn handle_hex(config: &Config, cmd: HexCommand) -> Result<()> {
    match cmd {
        HexCommand::Encode { input, formatted } => {
            let bytes = read_input(input.as_deref())?;
            debug!(bytes = bytes.len(), "encoding input as hex");
            let hex = bytes_to_hex(&bytes, formatted || config.codec.hex_formatted);
            println!("{}", hex.trim_end());
        }
        HexCommand::Decode { hex, output } => {
            let bytes = parse_hex_arg(&hex)?;
            match output {
                Some(path) => fs::write(&path, &bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
        HexCommand::Dump { hex, per_line } => {
            let bytes = parse_hex_arg(&hex)?;
            println!(
                "{}",
                hex_dump(&bytes, per_line.unwrap_or(config.codec.dump_width))
            );
        }
        HexCommand::Int { hex } => {
            let compact: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
            let value =
                hex_to_i64(&compact).with_context(|| format!("invalid hex integer: {hex}"))?;
            println!("{value}");
        }
    }
    Ok(())
}

fn handle_bcd(cmd: &BcdCommand) -> Result<()> {
    match cmd {
        BcdCommand::Pack { digits } => {
            let bytes =
                decimal_to_bcd(digits).with_context(|| format!("cannot pack {digits:?}"))?;
            println!("{}", bytes_to_hex(&bytes, false));
        }
        BcdCommand::Unpack { hex, fixed } => {
            let bytes = parse_hex_arg(hex)?;
            let digits = if *fixed {
                bcd_to_digits(&bytes)
            } else {
                bcd_to_decimal(&bytes)
            };
            println!("{digits}");
        }
    }
    Ok(())
}

fn handle_time(cmd: &TimeCommand) -> Result<()> {
    match cmd {
        TimeCommand::Pack { timestamp } => {
            let ts = parse_timestamp(timestamp)?;
            let mut buf = [0u8; TIMESTAMP_LEN];
            encode_timestamp(&mut buf, &ts, 0)?;
            println!("{}", bytes_to_hex(&buf, false));
        }
        TimeCommand::Unpack { hex, legacy } => {
            let bytes = parse_hex_arg(hex)?;
            let digits = if *legacy {
                read_timestamp_digits_legacy(&bytes, 0)?
            } else {
                read_timestamp_digits(&bytes, 0)?
            };
            match decode_timestamp(&bytes, 0)? {
                Some(ts) => println!("{digits}  {ts}"),
                None => println!("{digits}  (not a valid date)"),
            }
        }
    }
    Ok(())
}

fn handle_bits(cmd: &BitsCommand) -> Result<()> {
    if cmd.parse {
        let unsigned = bits_to_byte(&cmd.value)?;
        let signed = bits_to_signed_byte(&cmd.value)?;
        println!("{unsigned:02X}  {unsigned}  {signed}");
    } else {
        let bytes = parse_hex_arg(&cmd.value)?;
        let [byte] = bytes.as_slice() else {
            bail!("expected a single hex byte, got {} bytes", bytes.len());
        };
        println!("{}", byte_to_bit_string(*byte));
    }
    Ok(())
}

fn handle_record(config: &Config, cmd: RecordCommand) -> Result<()> {
    match cmd {
        RecordCommand::List => {
            let layouts = config.layouts()?;
            if layouts.is_empty() {
                println!("No layouts configured.");
                println!("Add [layouts.<name>] sections to {}", Config::default_config_path().display());
            }
            for layout in &layouts {
                println!(
                    "{} ({} bytes, {}, {} fields)",
                    layout.name(),
                    layout.len(),
                    layout.encoding(),
                    layout.fields().len()
                );
                for field in layout.fields() {
                    println!("  {:<16} @{:<4} {}", field.name, field.offset, field.kind);
                }
            }
        }
        RecordCommand::Decode {
            layout,
            hex,
            format,
        } => {
            let layout = config.layout(&layout)?;
            let bytes = parse_hex_arg(&hex)?;
            let record = layout
                .decode(&bytes)
                .with_context(|| format!("failed to decode record as {}", layout.name()))?;
            print_record(&layout, &record, format)?;
        }
        RecordCommand::Encode {
            layout,
            assignments,
            formatted,
        } => {
            let layout = config.layout(&layout)?;
            let record = layout.parse_assignments(&assignments)?;
            let bytes = layout
                .encode(&record)
                .with_context(|| format!("failed to encode record as {}", layout.name()))?;
            let hex = bytes_to_hex(&bytes, formatted || config.codec.hex_formatted);
            println!("{}", hex.trim_end());
        }
    }
    Ok(())
}

fn print_record(layout: &Layout, record: &Record, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Plain => {
            for (name, value) in record.iter() {
                println!("{name}={value}");
            }
        }
        OutputFormat::Table => {
            println!("{:<16} {:>6} {:<12} VALUE", "FIELD", "OFFSET", "KIND");
            for field in layout.fields() {
                if let Some(value) = record.get(&field.name) {
                    println!(
                        "{:<16} {:>6} {:<12} {value}",
                        field.name,
                        field.offset,
                        field.kind.to_string()
                    );
                }
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Codec]");
                println!("  Text encoding:      {}", config.codec.text_encoding);
                println!("  Formatted hex:      {}", config.codec.hex_formatted);
                println!("  Dump width:         {}", config.codec.dump_width);
                println!();
                println!("[Layouts]");
                if config.layouts.is_empty() {
                    println!("  (none)");
                }
                for layout in config.layouts()? {
                    println!("  {:<18}  {} bytes", layout.name(), layout.len());
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            return handle_validate(file.clone());
        }
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(config) => {
            println!(
                "Configuration is valid ({} layouts).",
                config.layouts.len()
            );
            Ok(())
        }
        Err(e) => bail!("Configuration error: {e}"),
    }
}
