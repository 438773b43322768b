//! Implementation of the reload command.
//!
//! Validates the configuration on disk, then sends SIGUSR2 to the running
//! monitor found through the lock file.

use anyhow::Result;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

/// Handle the reload command by signaling the running instance.
pub fn handle_reload_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    // Fail fast on a broken file instead of letting the monitor reject it
    let config = crate::config::Config::load()?;
    if debug_enabled {
        config.log_config();
    }

    match crate::common::utils::get_running_instance_pid() {
        Ok(pid) => {
            log_block_start!("Signaling running adhan-clock to reload...");
            match kill(Pid::from_raw(pid as i32), Signal::SIGUSR2) {
                Ok(()) => {
                    log_decorated!("Sent reload signal (PID: {pid})");
                    log_indented!("The monitor will re-resolve its location and recompute times");
                }
                Err(e) => {
                    log_pipe!();
                    log_error!("Failed to signal process {pid}: {e}");
                }
            }
        }
        Err(e) => {
            log_pipe!();
            log_warning!("No running instance to reload");
            if debug_enabled {
                log_indented!("{e}");
            }
            log_indented!("Start it with: adhan-clock");
        }
    }

    log_end!();
    Ok(())
}

/// Display detailed help for the reload command (help subcommand)
pub fn display_help() {
    log_version!();
    log_block_start!("reload - Reload the running monitor's configuration");
    log_block_start!("Usage: adhan-clock reload");
    log_block_start!("Description:");
    log_indented!("Checks the configuration file and sends SIGUSR2 to the running");
    log_indented!("monitor. It reloads the file, looks the location up again and");
    log_indented!("reprints the schedule. An alert cooldown in progress is kept.");
    log_block_start!("Examples:");
    log_indented!("adhan-clock reload");
    log_indented!("adhan-clock --debug reload");
    log_end!();
}
