//! Set command implementation for modifying configuration fields.
//!
//! All pairs are applied to the parsed file and validated together; the file
//! is only rewritten when every pair is valid. A running monitor picks the
//! change up through its file watcher.

use anyhow::Result;

use crate::common::utils::{get_running_instance_pid, private_path};
use crate::config::{self, builder};

/// Handle the set command - update configuration fields
pub fn handle_set_command(fields: &[(String, String)]) -> Result<()> {
    log_version!();

    let config_path = config::get_config_path()?;

    match builder::update_config_file(&config_path, fields) {
        Ok(_) => {
            log_block_start!("Updated configuration");
            for (field, value) in fields {
                log_indented!("{field} = {value}");
            }
            log_indented!("in {}", private_path(&config_path));

            if let Ok(pid) = get_running_instance_pid() {
                log_block_start!("Running monitor will reload automatically (PID: {pid})");
            } else {
                log_block_start!("Start adhan-clock to apply the new configuration");
            }
        }
        Err(e) => {
            log_pipe!();
            log_error!("{e:#}");
            log_indented!("Configuration left unchanged");
            anyhow::bail!("Configuration update failed");
        }
    }

    log_end!();
    Ok(())
}

/// Display detailed help for the set command (help subcommand)
pub fn display_help() {
    log_version!();
    log_block_start!("set - Update configuration fields");
    log_block_start!("Usage: adhan-clock set <field> <value> [<field> <value>...]");
    log_block_start!("Fields:");
    for field in builder::SETTABLE_FIELDS {
        log_indented!("{field}");
    }
    log_block_start!("Examples:");
    log_indented!("# Umm al-Qura with Hanafi Asr");
    log_indented!("adhan-clock set method UMM_AL_QURA madhab hanafi");
    log_pipe!();
    log_indented!("# Fixed location without geolocation");
    log_indented!("adhan-clock set latitude 21.4225 longitude 39.8262 timezone Asia/Riyadh location_lookup false");
    log_end!();
}
