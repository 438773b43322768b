//! Help command implementation.
//!
//! Dispatches `adhan-clock help [command]` to the per-command help pages.

use anyhow::Result;

/// Run the help command (dispatcher)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("dashboard") | Some("dash") => super::dashboard::display_help(),
        Some("help") | Some("h") => display_help_help(),
        Some("location") | Some("l") => super::location::display_help(),
        Some("reload") | Some("r") => super::reload::display_help(),
        Some("schedule") | Some("sc") => super::schedule::display_help(),
        Some("set") | Some("s") => super::set::display_help(),
        Some(unknown) => {
            log_pipe!();
            log_warning!("Unknown command: {unknown}");
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("schedule, sc [date]     Print the three-day prayer schedule");
    log_indented!("location, l             Show the detected location");
    log_indented!("dashboard, dash         Live clock with a countdown to the next prayer");
    log_indented!("set, s <field> <value>  Update configuration field(s)");
    log_indented!("reload, r               Make the running monitor reload its configuration");
    log_indented!("help, h [COMMAND]       Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'adhan-clock help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'adhan-clock --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: adhan-clock help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("adhan-clock help");
    log_indented!("adhan-clock help schedule");
    log_end!();
}
