//! Configuration management for fieldpack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::TextEncoding;
use crate::error::{Error, Result};
use crate::record::{Field, Layout};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "fieldpack";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "FIELDPACK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FIELDPACK_`, sections separated
///    by `__`, e.g. `FIELDPACK_CODEC__TEXT_ENCODING=latin1`)
/// 2. TOML config file at `~/.config/fieldpack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Codec defaults.
    pub codec: CodecConfig,
    /// Named record layouts.
    pub layouts: BTreeMap<String, LayoutConfig>,
}

/// Codec-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Text encoding for layouts that do not name their own.
    pub text_encoding: TextEncoding,
    /// Separate hex output into space-terminated byte pairs.
    pub hex_formatted: bool,
    /// Bytes per line in hex dumps.
    pub dump_width: usize,
}

/// A record layout as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Text encoding for this layout's text fields.
    /// Defaults to `codec.text_encoding`.
    pub encoding: Option<TextEncoding>,
    /// Fields of the record.
    pub fields: Vec<Field>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            text_encoding: TextEncoding::Utf8,
            hex_formatted: false,
            dump_width: 16,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FIELDPACK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        debug!("Loading configuration from {}", config_file.display());

        let figment = Self::base_figment()
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(&figment)
    }

    /// Parse configuration from TOML text layered over the defaults.
    ///
    /// Environment variables are not consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::extract(&Self::base_figment().merge(Toml::string(toml)))
    }

    fn base_figment() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    fn extract(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        debug!(layouts = config.layouts.len(), "Configuration loaded");
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.codec.dump_width == 0 {
            return Err(Error::config_validation(
                "codec.dump_width must be greater than 0",
            ));
        }

        for name in self.layouts.keys() {
            if name.trim().is_empty() {
                return Err(Error::config_validation("layout names must not be empty"));
            }
            self.layout(name)?;
        }

        Ok(())
    }

    /// Build the named layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLayout`] if no such layout is configured, or a
    /// validation error if its fields are malformed.
    pub fn layout(&self, name: &str) -> Result<Layout> {
        let entry = self
            .layouts
            .get(name)
            .ok_or_else(|| Error::UnknownLayout(name.to_string()))?;
        Layout::new(
            name,
            entry.encoding.unwrap_or(self.codec.text_encoding),
            entry.fields.clone(),
        )
    }

    /// Build every configured layout, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any layout is malformed.
    pub fn layouts(&self) -> Result<Vec<Layout>> {
        self.layouts.keys().map(|name| self.layout(name)).collect()
    }
}
