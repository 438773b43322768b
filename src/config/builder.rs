//! Default config creation and wholesale rewrites.
//!
//! The file is always rewritten as a whole: the new content goes to a
//! temporary file in the same directory which is then renamed over the old
//! one, so a reader never observes a half-written config.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::Config;
use super::loading::parse_config;
use super::validation::validate_config;
use crate::common::constants::*;
use crate::common::utils::private_path;
use crate::prayer::method::{CalculationMethod, HighLatitudeRule, Madhab};

/// Fields accepted by [`set_field`], in the order they appear in the file.
pub const SETTABLE_FIELDS: &[&str] = &[
    "latitude",
    "longitude",
    "timezone",
    "method",
    "fajr_angle",
    "isha_angle",
    "madhab",
    "high_latitude_rule",
    "location_lookup",
    "tolerance_secs",
    "cooldown_secs",
    "poll_interval_secs",
    "adhan_sound",
    "sound_player",
    "sound",
    "notifications",
];

/// The configuration written on first run.
pub fn default_config() -> Config {
    Config {
        latitude: Some(DEFAULT_LATITUDE),
        longitude: Some(DEFAULT_LONGITUDE),
        timezone: Some(DEFAULT_TIMEZONE.to_string()),
        method: Some(DEFAULT_METHOD),
        // Left unset so the method's own angles apply
        fajr_angle: None,
        isha_angle: None,
        madhab: Some(DEFAULT_MADHAB),
        high_latitude_rule: Some(DEFAULT_HIGH_LATITUDE_RULE),
        location_lookup: Some(DEFAULT_LOCATION_LOOKUP),
        tolerance_secs: Some(DEFAULT_TOLERANCE_SECS),
        cooldown_secs: Some(DEFAULT_COOLDOWN_SECS),
        poll_interval_secs: Some(DEFAULT_POLL_INTERVAL_SECS),
        adhan_sound: Some(DEFAULT_ADHAN_SOUND.to_string()),
        sound_player: None,
        sound: Some(DEFAULT_SOUND_ENABLED),
        notifications: Some(DEFAULT_NOTIFICATIONS_ENABLED),
    }
}

/// Create a default config file at `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    save_config(path, &default_config())?;
    log_block_start!("Created default configuration");
    log_indented!("{}", private_path(path));
    Ok(())
}

/// Atomically write `config` to `path`.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let dir = path
        .parent()
        .context("Config path has no parent directory")?;
    fs::create_dir_all(dir).context("Failed to create config directory")?;

    let mut content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    content.push('\n');

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", private_path(dir)))?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("Failed to write config to {}", private_path(path)))?;

    Ok(())
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => anyhow::bail!("{field} expects true or false (got `{value}`)"),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{field} expects a number (got `{value}`)"))
}

/// Set one field from its textual value.
///
/// Only the shape of the value is checked here; range checks happen in
/// [`validate_config`] once every requested change is applied.
pub fn set_field(config: &mut Config, field: &str, value: &str) -> Result<()> {
    match field {
        "latitude" => config.latitude = Some(parse_number(field, value)?),
        "longitude" => config.longitude = Some(parse_number(field, value)?),
        "timezone" => config.timezone = Some(value.trim().to_string()),
        "method" => {
            let method = CalculationMethod::parse(value).with_context(|| {
                let names: Vec<_> = CalculationMethod::ALL.iter().map(|m| m.as_str()).collect();
                format!("Unknown method `{value}`. Choose one of: {}", names.join(", "))
            })?;
            config.method = Some(method);
        }
        "fajr_angle" => config.fajr_angle = Some(parse_number(field, value)?),
        "isha_angle" => config.isha_angle = Some(parse_number(field, value)?),
        "madhab" => {
            config.madhab = Some(
                Madhab::parse(value)
                    .with_context(|| format!("Unknown madhab `{value}`. Choose shafi or hanafi"))?,
            );
        }
        "high_latitude_rule" => {
            config.high_latitude_rule = Some(HighLatitudeRule::parse(value).with_context(|| {
                format!(
                    "Unknown high_latitude_rule `{value}`. Choose middle_of_the_night, \
                    seventh_of_the_night or twilight_angle"
                )
            })?);
        }
        "location_lookup" => config.location_lookup = Some(parse_bool(field, value)?),
        "tolerance_secs" => config.tolerance_secs = Some(parse_number(field, value)?),
        "cooldown_secs" => config.cooldown_secs = Some(parse_number(field, value)?),
        "poll_interval_secs" => config.poll_interval_secs = Some(parse_number(field, value)?),
        "adhan_sound" => config.adhan_sound = Some(value.to_string()),
        "sound_player" => config.sound_player = Some(value.to_string()),
        "sound" => config.sound = Some(parse_bool(field, value)?),
        "notifications" => config.notifications = Some(parse_bool(field, value)?),
        _ => anyhow::bail!(
            "Unknown setting `{field}`. Valid settings: {}",
            SETTABLE_FIELDS.join(", ")
        ),
    }
    Ok(())
}

/// Apply `(field, value)` pairs to the file at `path` and rewrite it.
///
/// Fields not mentioned keep their current on-disk value, including absent
/// ones. Nothing is written if any pair is invalid.
pub fn update_config_file(path: &Path, changes: &[(String, String)]) -> Result<Config> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", private_path(path)))?;
        parse_config(&content)
            .with_context(|| format!("Failed to parse config from {}", private_path(path)))?
    } else {
        default_config()
    };

    for (field, value) in changes {
        set_field(&mut config, field, value)?;
    }
    validate_config(&config)?;

    save_config(path, &config)?;
    Ok(config)
}
