//! Configuration validation functionality.
//!
//! Rejects values that would make the schedule or the alert loop meaningless:
//! out-of-range coordinates and angles, unknown timezones, and a cooldown
//! shorter than the match window.

use anyhow::Result;
use chrono_tz::Tz;

use super::Config;
use crate::common::constants::*;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(ref name) = config.timezone
        && name.parse::<Tz>().is_err()
    {
        anyhow::bail!(
            "timezone `{}` is not a known IANA timezone (e.g. \"America/New_York\")",
            name
        );
    }

    validate_angle(config.fajr_angle, "fajr_angle")?;
    validate_angle(config.isha_angle, "isha_angle")?;

    let tolerance = config.tolerance_secs.unwrap_or(DEFAULT_TOLERANCE_SECS);
    if !(MINIMUM_TOLERANCE_SECS..=MAXIMUM_TOLERANCE_SECS).contains(&tolerance) {
        anyhow::bail!(
            "tolerance_secs ({}) must be between {} and {} seconds",
            tolerance,
            MINIMUM_TOLERANCE_SECS,
            MAXIMUM_TOLERANCE_SECS
        );
    }

    let cooldown = config.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS);
    if cooldown > MAXIMUM_COOLDOWN_SECS {
        anyhow::bail!(
            "cooldown_secs ({}) must be at most {} seconds",
            cooldown,
            MAXIMUM_COOLDOWN_SECS
        );
    }
    if cooldown < tolerance {
        anyhow::bail!(
            "cooldown_secs ({}) must not be shorter than tolerance_secs ({}). \
            A shorter cooldown would let the same prayer fire twice.",
            cooldown,
            tolerance
        );
    }

    let poll = config
        .poll_interval_secs
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
    if !(MINIMUM_POLL_INTERVAL_SECS..=MAXIMUM_POLL_INTERVAL_SECS).contains(&poll) {
        anyhow::bail!(
            "poll_interval_secs ({}) must be between {} and {} seconds",
            poll,
            MINIMUM_POLL_INTERVAL_SECS,
            MAXIMUM_POLL_INTERVAL_SECS
        );
    }

    if let Some(ref sound) = config.adhan_sound
        && sound.trim().is_empty()
    {
        anyhow::bail!("adhan_sound must not be empty");
    }

    if let Some(ref player) = config.sound_player
        && player.trim().is_empty()
    {
        anyhow::bail!("sound_player must not be empty (remove it to auto-detect)");
    }

    Ok(())
}

fn validate_angle(angle: Option<f64>, field: &str) -> Result<()> {
    if let Some(angle) = angle
        && !(MINIMUM_ANGLE..=MAXIMUM_ANGLE).contains(&angle)
    {
        anyhow::bail!(
            "{} ({}) must be between {} and {} degrees",
            field,
            angle,
            MINIMUM_ANGLE,
            MAXIMUM_ANGLE
        );
    }
    Ok(())
}
