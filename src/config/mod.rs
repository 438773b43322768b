//! Configuration system for adhan-clock.
//!
//! The configuration is a flat JSON object stored at
//! `$XDG_CONFIG_HOME/adhan-clock/config.json` (or `<dir>/config.json` with
//! `--config <dir>`). A default file is written on first run.
//!
//! ```json
//! {
//!   "latitude": 40.7128,
//!   "longitude": -74.006,
//!   "timezone": "America/New_York",
//!   "method": "NORTH_AMERICA",
//!   "fajr_angle": 15.0,
//!   "isha_angle": 15.0,
//!   "madhab": "shafi",
//!   "high_latitude_rule": "middle_of_the_night",
//!   "location_lookup": true,
//!   "tolerance_secs": 30,
//!   "cooldown_secs": 120,
//!   "poll_interval_secs": 10,
//!   "adhan_sound": "makkah_adhan.mp3",
//!   "sound": true,
//!   "notifications": true
//! }
//! ```
//!
//! Every field is optional in the file. Values are validated first, then
//! missing fields receive their defaults. The coordinates and timezone are
//! the fallback used when IP geolocation is disabled or fails.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use crate::common::constants::*;
use crate::geo::location::Location;
use crate::prayer::method::{CalculationMethod, CalculationParams, HighLatitudeRule, Madhab};

// Re-export public API
pub use builder::{create_default_config, save_config, set_field};
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use watcher::start_config_watcher;

/// Configuration for the reminder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Fallback latitude in degrees (-90 to +90)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Fallback longitude in degrees (-180 to +180)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Fallback IANA timezone name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CalculationMethod>,
    /// Overrides the method's Fajr angle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fajr_angle: Option<f64>,
    /// Overrides the method's Isha angle (and any fixed Isha interval)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isha_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub madhab: Option<Madhab>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_latitude_rule: Option<HighLatitudeRule>,

    /// Whether to query IP geolocation at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lookup: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    /// Audio file, relative paths resolve against the config directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adhan_sound: Option<String>,
    /// Player command; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &Path) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(chrono_tz::UTC)
    }

    /// The configured location, used when lookup is off or fails.
    pub fn static_location(&self) -> Location {
        Location {
            latitude: self.latitude.unwrap_or(DEFAULT_LATITUDE),
            longitude: self.longitude.unwrap_or(DEFAULT_LONGITUDE),
            timezone: self.timezone(),
            city: None,
        }
    }

    pub fn location_lookup_enabled(&self) -> bool {
        self.location_lookup.unwrap_or(DEFAULT_LOCATION_LOOKUP)
    }

    /// Resolve method defaults and explicit overrides into calculation parameters.
    pub fn calculation_params(&self) -> CalculationParams {
        CalculationParams::for_method(self.method.unwrap_or(DEFAULT_METHOD))
            .with_angles(self.fajr_angle, self.isha_angle)
            .with_madhab(self.madhab.unwrap_or(DEFAULT_MADHAB))
            .with_high_latitude_rule(self.high_latitude_rule.unwrap_or(DEFAULT_HIGH_LATITUDE_RULE))
    }

    pub fn tolerance(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.tolerance_secs.unwrap_or(DEFAULT_TOLERANCE_SECS) as i64)
    }

    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS) as i64)
    }

    pub fn poll_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound.unwrap_or(DEFAULT_SOUND_ENABLED)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications.unwrap_or(DEFAULT_NOTIFICATIONS_ENABLED)
    }

    /// Absolute path of the adhan audio file.
    pub fn adhan_sound_path(&self) -> PathBuf {
        let sound = PathBuf::from(self.adhan_sound.as_deref().unwrap_or(DEFAULT_ADHAN_SOUND));
        if sound.is_absolute() {
            return sound;
        }
        match loading::get_config_base_dir() {
            Ok(dir) => dir.join(sound),
            Err(_) => sound,
        }
    }

    pub fn log_config(&self) {
        let params = self.calculation_params();

        log_block_start!("Loaded configuration");
        log_indented!("Method: {}", params.method);
        match params.isha_interval {
            Some(minutes) => log_indented!(
                "Angles: Fajr {:.1}°, Isha {} minutes after Maghrib",
                params.fajr_angle,
                minutes
            ),
            None => log_indented!(
                "Angles: Fajr {:.1}°, Isha {:.1}°",
                params.fajr_angle,
                params.isha_angle
            ),
        }
        log_indented!("Asr: {}", params.madhab.as_str());

        let location = self.static_location();
        let (lat, lon) = (location.latitude, location.longitude);
        log_indented!(
            "Fallback location: {:.3}°{}, {:.3}°{} ({})",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" },
            location.timezone
        );
        log_indented!(
            "Geolocation lookup: {}",
            if self.location_lookup_enabled() { "enabled" } else { "disabled" }
        );
        log_indented!(
            "Match window: ±{}s, cooldown {}s, poll every {}s",
            self.tolerance().num_seconds(),
            self.cooldown().num_seconds(),
            self.poll_interval().as_secs()
        );

        if self.sound_enabled() {
            log_indented!(
                "Adhan sound: {}",
                crate::common::utils::private_path(&self.adhan_sound_path())
            );
        } else {
            log_indented!("Adhan sound: disabled");
        }
        if !self.notifications_enabled() {
            log_indented!("Desktop notifications: disabled");
        }
    }
}

#[cfg(test)]
mod tests;
