//! Implementation of --simulate for exercising the monitor on fake time.
//!
//! Installs a simulated time source and returns; the caller then runs the
//! normal monitor, which stops once the simulated end time is reached.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::args::SimulationSpeed;
use crate::common::logger::Log;
use crate::time::source::{self, SimulatedTimeSource};

/// Parse both bounds in `tz` and check that they are ordered.
pub fn parse_bounds(start_time: &str, end_time: &str, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = source::parse_datetime_in_tz(start_time, tz)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?
        .with_timezone(&Utc);
    let end = source::parse_datetime_in_tz(end_time, tz)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?
        .with_timezone(&Utc);

    if end <= start {
        anyhow::bail!("End time must be after start time");
    }
    Ok((start, end))
}

/// Set up the simulated clock.
///
/// Times are read in the configured timezone.
pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    speed: SimulationSpeed,
    debug_enabled: bool,
) -> Result<()> {
    let tz = crate::config::Config::load()
        .map(|config| config.timezone())
        .unwrap_or(chrono_tz::UTC);
    let (start, end) = parse_bounds(start_time, end_time, tz)?;

    // Install before any logging so every line carries a simulated timestamp
    let sim_source = match speed {
        SimulationSpeed::FastForward => SimulatedTimeSource::fast_forward(start, end),
        SimulationSpeed::Multiplier(multiplier) => SimulatedTimeSource::new(start, end, multiplier),
    };
    source::init_time_source(Arc::new(sim_source));
    Log::set_location_timezone(Some(tz));

    log_version!();
    log_block_start!("Simulation Mode");
    log_decorated!(
        "Simulating from {} to {} ({tz})",
        start.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S"),
        end.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S")
    );

    let duration = end - start;
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    match speed {
        SimulationSpeed::FastForward => {
            log_indented!("Time acceleration: fast-forward (instant execution)");
        }
        SimulationSpeed::Multiplier(multiplier) => {
            log_indented!(
                "Time acceleration: {multiplier}x (will complete in ~{:.1} seconds)",
                duration.num_seconds() as f64 / multiplier
            );
        }
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_read_in_timezone() {
        let (start, end) = parse_bounds(
            "2025-01-15 11:50:00",
            "2025-01-15 12:30:00",
            chrono_tz::Asia::Riyadh,
        )
        .unwrap();
        assert_eq!(start.format("%H:%M").to_string(), "08:50");
        assert_eq!((end - start).num_minutes(), 40);
    }

    #[test]
    fn test_bounds_must_be_ordered() {
        assert!(parse_bounds("2025-01-15 12:00:00", "2025-01-15 12:00:00", chrono_tz::UTC).is_err());
        assert!(parse_bounds("2025-01-15", "2025-01-16 00:00:00", chrono_tz::UTC).is_err());
    }
}
