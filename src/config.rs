//! Tool configuration module.
//!
//! Handles loading and validating `pixform.toml`. Every key is optional;
//! a missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! port = 8080                   # Port for `pixform serve`
//! root = "."                    # Directory uploads and outputs are written to
//! max_upload_bytes = 33554432   # Request body limit for POST /format (32 MiB)
//!
//! # Thumbnails produced by `pixform format` (the HTTP API takes them from
//! # the request's options document instead)
//! [[thumbnails]]
//! suffix = "-small"
//! width = 150
//! height = 150
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [server]
//! port = 9000
//! ```
//!
//! Unknown keys are rejected to catch typos early. Declaring any
//! `[[thumbnails]]` entry replaces the default list; `thumbnails = []`
//! disables thumbnails altogether.

use crate::options::Thumb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "pixform.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `pixform.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Thumbnail specs used by the one-shot `format` command.
    pub thumbnails: Vec<Thumb>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            thumbnails: default_thumbnails(),
        }
    }
}

/// The classic single `-small` 150×150 thumbnail.
pub fn default_thumbnails() -> Vec<Thumb> {
    vec![Thumb {
        suffix: "-small".to_string(),
        width: 150,
        height: 150,
    }]
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be non-zero".into(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "server.max_upload_bytes must be non-zero".into(),
            ));
        }
        if let Some(i) = self.thumbnails.iter().position(|t| t.suffix.is_empty()) {
            // An empty suffix would overwrite the primary output
            return Err(ConfigError::Validation(format!(
                "thumbnails[{i}].suffix must not be empty"
            )));
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Port to listen on (all interfaces).
    pub port: u16,
    /// Directory that receives uploaded originals and processed outputs.
    /// Created on startup if missing.
    pub root: PathBuf,
    /// Maximum accepted request body for `POST /format`, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            root: PathBuf::from("."),
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Load and validate the config file at `path`.
///
/// Returns stock defaults if the file does not exist.
/// Returns `Err` if the file exists but is invalid TOML or fails validation.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `pixform.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pixform configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTTP API (`pixform serve`)
# ---------------------------------------------------------------------------
[server]
# Port to listen on. Overridden by `pixform serve --port`.
port = 8080

# Directory that receives uploaded originals ("<name>-original.<ext>") and
# all processed outputs. Created on startup if missing.
# Overridden by `pixform serve --root`.
root = "."

# Largest accepted POST /format request body, in bytes.
max_upload_bytes = 33554432

# ---------------------------------------------------------------------------
# Thumbnails for `pixform format`
# ---------------------------------------------------------------------------
# Each entry produces one extra output named "<dst stem><suffix>.<ext>",
# resized from the finished image. A 0 width or height copies the other
# side (the thumbnail comes out square).
# Requests to the HTTP API list their thumbnails in the options document.
[[thumbnails]]
suffix = "-small"
width = 150
height = 150
"##
}
