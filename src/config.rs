//! Tool configuration module.
//!
//! Handles loading, validating, and merging `prepublish.toml`. The file lives in
//! the content root and is layered on top of the stock defaults, so a user only
//! writes the keys they want to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [slugs]
//! unpublished_prefix = "___UNPUBLISHED___"  # Marker for pre-publish review slugs
//! random_length = 32                        # Random characters per minted slug
//!
//! [content]
//! extensions = ["md", "markdown"]           # Files picked up when scanning a directory
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the content root.
pub const CONFIG_FILENAME: &str = "prepublish.toml";

/// Upper bound for `slugs.random_length`.
pub const MAX_RANDOM_LENGTH: usize = 128;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `prepublish.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepublishConfig {
    /// How review slugs are minted.
    pub slugs: SlugConfig,
    /// Which files count as content when a directory is scanned.
    pub content: ContentConfig,
}

impl PrepublishConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slugs.unpublished_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "slugs.unpublished_prefix must not be empty".into(),
            ));
        }
        if self.slugs.random_length == 0 || self.slugs.random_length > MAX_RANDOM_LENGTH {
            return Err(ConfigError::Validation(format!(
                "slugs.random_length must be 1-{MAX_RANDOM_LENGTH}"
            )));
        }
        if self.content.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "content.extensions must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Review slug settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlugConfig {
    /// Prefix marking a slug as a pre-publish review slug.
    pub unpublished_prefix: String,
    /// Number of random characters appended to every minted slug.
    pub random_length: usize,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            unpublished_prefix: "___UNPUBLISHED___".to_string(),
            random_length: 32,
        }
    }
}

/// Content discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// File extensions (without the dot, case-insensitive) treated as content.
    pub extensions: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// `PrepublishConfig::default()` as a TOML table, the bottom layer that a
/// user's `prepublish.toml` is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PrepublishConfig::default()).expect("stock config is plain data")
}

/// Layer `overlay` onto `base`.
///
/// Sections merge per key, so `[slugs] random_length = 16` keeps the stock
/// prefix. Any other value, arrays included, is taken from the overlay whole.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    let toml::Value::Table(overlay_table) = overlay else {
        return overlay;
    };
    let toml::Value::Table(mut merged) = base else {
        return toml::Value::Table(overlay_table);
    };
    for (key, value) in overlay_table {
        let layered = match merged.remove(&key) {
            Some(existing) => merge_toml(existing, value),
            None => value,
        };
        merged.insert(key, layered);
    }
    toml::Value::Table(merged)
}

/// Parse `<dir>/prepublish.toml` without interpreting it.
///
/// `Ok(None)` when the content root has no config file; a file that is not
/// valid TOML is an error.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&text)?))
}

/// Build the effective config from stock values and the user's file.
///
/// Unknown keys fail deserialization; out-of-range values fail `validate`.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PrepublishConfig, ConfigError> {
    let layered = match overlay {
        Some(user) => merge_toml(base, user),
        None => base,
    };
    let config = PrepublishConfig::deserialize(layered)?;
    config.validate()?;
    Ok(config)
}

/// Effective config for the content root `dir`.
///
/// A missing directory or missing file yields the stock defaults.
pub fn load_config(dir: &Path) -> Result<PrepublishConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `prepublish.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# prepublish configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Place this file in the content root as prepublish.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Review slugs
# ---------------------------------------------------------------------------
[slugs]
# Marker prepended to the slug minted for documents with `published: false`.
# Existing entries in `slugs` starting with this prefix are reused.
unpublished_prefix = "___UNPUBLISHED___"

# Number of random [A-Za-z0-9] characters appended to every minted slug.
random_length = 32

# ---------------------------------------------------------------------------
# Content discovery
# ---------------------------------------------------------------------------
[content]
# File extensions picked up when a directory is scanned.
extensions = ["md", "markdown"]
"##
}
