//! Main application entry point.
//!
//! Parses the command line and dispatches to the monitor or a one-shot
//! command. Any error ends the process with exit code 1 after the box-drawn
//! output has been closed.

use adhan_clock::{
    AdhanClock,
    args::{self, CliAction, ParsedArgs},
    commands,
    common::constants::EXIT_FAILURE,
    config,
};
use adhan_clock::{log_error_exit, log_pipe};

fn run(action: CliAction) -> anyhow::Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            AdhanClock::new(debug_enabled).run()
        }
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            speed,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(
                &start_time,
                &end_time,
                speed,
                debug_enabled,
            )?;
            AdhanClock::new(debug_enabled)
                .without_lock()
                .without_headers()
                .run()
        }
        CliAction::ScheduleCommand {
            debug_enabled,
            date,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::schedule::handle_schedule_command(date, debug_enabled)
        }
        CliAction::LocationCommand {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::location::handle_location_command(debug_enabled)
        }
        CliAction::DashboardCommand {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::dashboard::handle_dashboard_command(debug_enabled)
        }
        CliAction::SetCommand {
            debug_enabled: _,
            fields,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::set::handle_set_command(&fields)
        }
        CliAction::ReloadCommand {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::reload::handle_reload_command(debug_enabled)
        }
    }
}

fn main() {
    let parsed_args = ParsedArgs::from_env();

    if let Err(e) = run(parsed_args.action) {
        log_pipe!();
        log_error_exit!("{e:#}");
        std::process::exit(EXIT_FAILURE);
    }
}
