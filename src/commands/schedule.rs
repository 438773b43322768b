//! Implementation of the schedule command.
//!
//! Prints the three-day block once and exits, without taking the lock.

use anyhow::Result;
use chrono::NaiveDate;

use crate::display::print_schedule_block;

/// Print yesterday's, today's and tomorrow's times around `date`.
pub fn handle_schedule_command(date: Option<NaiveDate>, debug_enabled: bool) -> Result<()> {
    log_version!();

    let (_config, resolved, provider) = super::load_schedule_context(debug_enabled)?;
    let location = resolved.location;

    let date = date.unwrap_or_else(|| {
        crate::time::source::now()
            .with_timezone(&location.timezone)
            .date_naive()
    });

    log_block_start!("Location: {}", location.label());
    log_indented!("Timezone: {}", location.timezone);

    print_schedule_block(provider.as_ref(), date)?;

    if debug_enabled {
        let schedule = provider.schedule_for(date)?;
        crate::geo::display::log_solar_debug_info(&location, &schedule);
    }

    log_end!();
    Ok(())
}

/// Display detailed help for the schedule command (help subcommand)
pub fn display_help() {
    log_version!();
    log_block_start!("schedule - Print the prayer schedule");
    log_block_start!("Usage: adhan-clock schedule [YYYY-MM-DD]");
    log_block_start!("Arguments:");
    log_indented!("YYYY-MM-DD  Day to centre the schedule on (default: today)");
    log_block_start!("Description:");
    log_indented!("Resolves the location the same way the monitor does and prints");
    log_indented!("Fajr, Dhuhr, Asr, Maghrib and Isha for the day before, the day");
    log_indented!("itself and the day after. With --debug the sunrise is also");
    log_indented!("cross-checked against an independent solar algorithm.");
    log_block_start!("Examples:");
    log_indented!("adhan-clock schedule");
    log_indented!("adhan-clock schedule 2025-03-01");
    log_end!();
}
