//! Command-line command handlers for adhan-clock.
//!
//! Each one-shot command lives in its own submodule. They share the
//! config-location-provider setup below.

pub mod dashboard;
pub mod help;
pub mod location;
pub mod reload;
pub mod schedule;
pub mod set;
pub mod simulate;

use anyhow::Result;

use crate::config::Config;
use crate::geo::location::{IpApiClient, ResolvedLocation, resolve_location};
use crate::prayer::PrayerTimeProvider;

/// Load the configuration, resolve the location and build the provider.
pub(crate) fn load_schedule_context(
    debug_enabled: bool,
) -> Result<(Config, ResolvedLocation, Box<dyn PrayerTimeProvider>)> {
    let config = Config::load()?;
    if debug_enabled {
        config.log_config();
    }

    let resolved = resolve_location(&config, &IpApiClient::new());
    let provider = crate::core::build_provider(&resolved.location, &config);
    Ok((config, resolved, provider))
}
