//! Configuration loading functionality.
//!
//! Handles locating the configuration file, creating a default one on first
//! run, parsing, validation and applying defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Directory holding `config.json` and, by default, the adhan audio file.
pub fn get_config_base_dir() -> Result<PathBuf> {
    let config_path = get_config_path()?;
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Get the configuration file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("adhan-clock").join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// This version does NOT create a default config if the path doesn't exist.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config = parse_config(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;
    apply_defaults(&mut config);

    Ok(config)
}

/// Parse a JSON configuration body without validation.
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_json::from_str(content)?)
}

/// Apply default values to configuration fields.
///
/// Fajr and Isha angles stay unset so the method's own angles apply.
pub(crate) fn apply_defaults(config: &mut Config) {
    config.latitude.get_or_insert(DEFAULT_LATITUDE);
    config.longitude.get_or_insert(DEFAULT_LONGITUDE);
    config
        .timezone
        .get_or_insert_with(|| DEFAULT_TIMEZONE.to_string());
    config.method.get_or_insert(DEFAULT_METHOD);
    config.madhab.get_or_insert(DEFAULT_MADHAB);
    config
        .high_latitude_rule
        .get_or_insert(DEFAULT_HIGH_LATITUDE_RULE);
    config.location_lookup.get_or_insert(DEFAULT_LOCATION_LOOKUP);
    config.tolerance_secs.get_or_insert(DEFAULT_TOLERANCE_SECS);
    config.cooldown_secs.get_or_insert(DEFAULT_COOLDOWN_SECS);
    config
        .poll_interval_secs
        .get_or_insert(DEFAULT_POLL_INTERVAL_SECS);
    config
        .adhan_sound
        .get_or_insert_with(|| DEFAULT_ADHAN_SOUND.to_string());
    config.sound.get_or_insert(DEFAULT_SOUND_ENABLED);
    config
        .notifications
        .get_or_insert(DEFAULT_NOTIFICATIONS_ENABLED);
}
