//! Implementation of the dashboard command.

use anyhow::Result;

use crate::common::logger::Log;
use crate::display::dashboard;

/// Resolve the location, then hand the terminal to the live dashboard.
pub fn handle_dashboard_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let (_config, resolved, provider) = super::load_schedule_context(debug_enabled)?;
    let signal_state = crate::io::signals::setup_signal_handler(debug_enabled)?;

    // Box-drawing output would land on the alternate screen
    Log::set_enabled(false);
    let result = dashboard::run(provider.as_ref(), &resolved.location, &signal_state.running);
    Log::set_enabled(true);

    result?;
    log_block_start!("Dashboard closed");
    log_end!();
    Ok(())
}

/// Display detailed help for the dashboard command (help subcommand)
pub fn display_help() {
    log_version!();
    log_block_start!("dashboard - Live clock and countdown");
    log_block_start!("Usage: adhan-clock dashboard");
    log_block_start!("Description:");
    log_indented!("Shows the date, city, timezone, a live clock, today's five");
    log_indented!("prayer times and a countdown to the next one. After Isha the");
    log_indented!("countdown points at tomorrow's Fajr. Refreshes every second.");
    log_block_start!("Keys:");
    log_indented!("q, Esc, Ctrl+C  Quit");
    log_end!();
}
