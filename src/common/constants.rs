//! Application-wide constants and default values.

use crate::prayer::method::{CalculationMethod, HighLatitudeRule, Madhab};

// # Application Configuration Defaults

pub const DEFAULT_LATITUDE: f64 = 0.0;
pub const DEFAULT_LONGITUDE: f64 = 0.0;
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_METHOD: CalculationMethod = CalculationMethod::NorthAmerica;
pub const DEFAULT_MADHAB: Madhab = Madhab::Shafi;
pub const DEFAULT_HIGH_LATITUDE_RULE: HighLatitudeRule = HighLatitudeRule::MiddleOfTheNight;
pub const DEFAULT_LOCATION_LOOKUP: bool = true;

pub const DEFAULT_TOLERANCE_SECS: u64 = 30; // window around a prayer time that counts as "due"
pub const DEFAULT_COOLDOWN_SECS: u64 = 120; // suppression after an alert fires
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10; // idle sleep between checks

pub const DEFAULT_ADHAN_SOUND: &str = "makkah_adhan.mp3";
pub const DEFAULT_SOUND_ENABLED: bool = true;
pub const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;

// # Validation Limits

pub const MINIMUM_ANGLE: f64 = 0.0;
pub const MAXIMUM_ANGLE: f64 = 30.0;

pub const MINIMUM_TOLERANCE_SECS: u64 = 1;
pub const MAXIMUM_TOLERANCE_SECS: u64 = 600;

pub const MAXIMUM_COOLDOWN_SECS: u64 = 3600;

pub const MINIMUM_POLL_INTERVAL_SECS: u64 = 1;
pub const MAXIMUM_POLL_INTERVAL_SECS: u64 = 60;

// # Geolocation

pub const GEOLOCATION_URL: &str = "http://ip-api.com/json/";
pub const GEOLOCATION_TIMEOUT_SECS: u64 = 5;

// # Alerts

pub const NOTIFICATION_APP_NAME: &str = "Adhan Clock";
pub const NOTIFICATION_TIMEOUT_MS: i32 = 10_000;
pub const NOTIFICATION_SOUND_NAME: &str = "message-new-instant"; // freedesktop sound theme name

/// Players tried in order when `sound_player` is not configured.
pub const SOUND_PLAYERS: &[&str] = &["paplay", "pw-play", "aplay", "afplay"];

/// How often playback is polled for completion.
pub const PLAYBACK_POLL_MS: u64 = 250;

// # Dashboard

pub const DASHBOARD_REFRESH_MS: u64 = 1000;

// # Simulation

pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 60.0; // one simulated minute per second
pub const MINIMUM_SIMULATION_MULTIPLIER: f64 = 0.1;
pub const MAXIMUM_SIMULATION_MULTIPLIER: f64 = 3600.0;

// # Exit Codes

pub const EXIT_FAILURE: i32 = 1;

// # Test Constants
