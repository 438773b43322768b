//! Command-line argument parsing and processing.
//!
//! Handles the global flags (`--config`, `--debug`, `--help`, `--version`,
//! `--simulate`) and the subcommands. Parsing never fails: bad input turns
//! into [`CliAction::ShowHelpDueToError`] after a warning has been logged.

use chrono::NaiveDate;

use crate::common::constants::{
    DEFAULT_SIMULATION_MULTIPLIER, MAXIMUM_SIMULATION_MULTIPLIER, MINIMUM_SIMULATION_MULTIPLIER,
};

/// How fast simulated time runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationSpeed {
    /// Simulated seconds per real second
    Multiplier(f64),
    /// Every sleep completes instantly
    FastForward,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the console monitor
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Run the console monitor on simulated time
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        speed: SimulationSpeed,
        config_dir: Option<String>,
    },
    /// Print the three-day schedule around a date (today when absent)
    ScheduleCommand {
        debug_enabled: bool,
        date: Option<NaiveDate>,
        config_dir: Option<String>,
    },
    /// Show the result of the geolocation lookup
    LocationCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Live terminal dashboard
    DashboardCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Update configuration fields
    SetCommand {
        debug_enabled: bool,
        fields: Vec<(String, String)>,
        config_dir: Option<String>,
    },
    /// Ask the running monitor to reload its configuration
    ReloadCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Detailed help for a command
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

const COMMANDS: &[&str] = &[
    "schedule", "sc", "location", "l", "dashboard", "dash", "set", "s", "reload", "r", "help",
    "h",
];

/// Check the `YYYY-MM-DD HH:MM:SS` shape; full parsing needs the timezone.
fn looks_like_datetime(s: &str) -> bool {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

impl ParsedArgs {
    /// Parse command-line arguments (including the program name) into an action.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let action = Self::parse_action(&args_vec);
        ParsedArgs { action }
    }

    fn parse_action(args_vec: &[String]) -> CliAction {
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return CliAction::ShowVersion;
        }

        // Find the first non-flag argument, skipping values of flags that take one
        let mut potential_command_idx = None;
        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = &args_vec[idx];
            if arg.starts_with('-') {
                if matches!(arg.as_str(), "--config" | "-c") {
                    idx += 2;
                } else if matches!(arg.as_str(), "--simulate" | "-S") {
                    break;
                } else {
                    idx += 1;
                }
            } else {
                potential_command_idx = Some(idx);
                break;
            }
        }

        match potential_command_idx {
            Some(cmd_idx) => Self::parse_command(args_vec, cmd_idx),
            None => Self::parse_flags(args_vec),
        }
    }

    fn parse_command(args_vec: &[String], cmd_idx: usize) -> CliAction {
        let command = args_vec[cmd_idx].as_str();
        let rest = &args_vec[cmd_idx + 1..];

        let debug_enabled = args_vec.iter().any(|arg| arg == "--debug" || arg == "-d");
        let config_dir = args_vec
            .iter()
            .position(|arg| arg == "--config" || arg == "-c")
            .and_then(|idx| args_vec.get(idx + 1))
            .cloned();

        if matches!(command, "help" | "h") {
            return CliAction::HelpCommand {
                command: rest.iter().find(|arg| !arg.starts_with('-')).cloned(),
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return CliAction::HelpCommand {
                command: Some(command.to_string()),
            };
        }

        // Positional arguments after the command, minus global flags and their values
        let mut positional = Vec::new();
        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--config" | "-c" => i += 1,
                "--debug" | "-d" => {}
                other if other.starts_with('-') => {
                    log_warning!("Unknown option for {command}: {other}");
                    return CliAction::ShowHelpDueToError;
                }
                other => positional.push(other.to_string()),
            }
            i += 1;
        }

        let expect_no_args = |positional: &[String]| -> bool {
            match positional.first() {
                Some(extra) if COMMANDS.contains(&extra.as_str()) => {
                    log_error!("Cannot use multiple commands at once: '{command}' and '{extra}'");
                    false
                }
                Some(extra) => {
                    log_warning!("Unexpected argument for {command}: {extra}");
                    false
                }
                None => true,
            }
        };

        match command {
            "schedule" | "sc" => match positional.as_slice() {
                [] => CliAction::ScheduleCommand {
                    debug_enabled,
                    date: None,
                    config_dir,
                },
                [date] => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                    Ok(date) => CliAction::ScheduleCommand {
                        debug_enabled,
                        date: Some(date),
                        config_dir,
                    },
                    Err(_) => {
                        log_warning!("Invalid date: '{date}'. Use YYYY-MM-DD");
                        CliAction::ShowHelpDueToError
                    }
                },
                _ => {
                    log_warning!("Too many arguments. Usage: adhan-clock schedule [YYYY-MM-DD]");
                    CliAction::ShowHelpDueToError
                }
            },
            "location" | "l" => {
                if expect_no_args(&positional) {
                    CliAction::LocationCommand {
                        debug_enabled,
                        config_dir,
                    }
                } else {
                    CliAction::ShowHelpDueToError
                }
            }
            "dashboard" | "dash" => {
                if expect_no_args(&positional) {
                    CliAction::DashboardCommand {
                        debug_enabled,
                        config_dir,
                    }
                } else {
                    CliAction::ShowHelpDueToError
                }
            }
            "reload" | "r" => {
                if expect_no_args(&positional) {
                    CliAction::ReloadCommand {
                        debug_enabled,
                        config_dir,
                    }
                } else {
                    CliAction::ShowHelpDueToError
                }
            }
            "set" | "s" => {
                if positional.is_empty() || positional.len() % 2 != 0 {
                    log_warning!(
                        "Missing field or value. Usage: adhan-clock set <field> <value> [<field> <value>...]"
                    );
                    log_indented!("Example: adhan-clock set method MUSLIM_WORLD_LEAGUE");
                    return CliAction::ShowHelpDueToError;
                }
                let fields = positional
                    .chunks(2)
                    .map(|pair| (pair[0].clone(), pair[1].clone()))
                    .collect();
                CliAction::SetCommand {
                    debug_enabled,
                    fields,
                    config_dir,
                }
            }
            unknown => {
                log_warning!("Unknown command: {unknown}");
                CliAction::ShowHelpDueToError
            }
        }
    }

    fn parse_flags(args_vec: &[String]) -> CliAction {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut simulate: Option<(String, String, SimulationSpeed)> = None;

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => {
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--simulate" | "-S" => {
                    // --simulate <start> <end> [multiplier | --fast-forward]
                    if i + 2 >= args_vec.len() {
                        log_warning!(
                            "Missing arguments for --simulate. Usage: --simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier | --fast-forward]"
                        );
                        unknown_arg_found = true;
                        i += 1;
                        continue;
                    }

                    let start = args_vec[i + 1].clone();
                    let end = args_vec[i + 2].clone();
                    i += 2;

                    if !looks_like_datetime(&start) {
                        log_error!("Invalid start time format: '{start}'. Use YYYY-MM-DD HH:MM:SS");
                        unknown_arg_found = true;
                    } else if !looks_like_datetime(&end) {
                        log_error!("Invalid end time format: '{end}'. Use YYYY-MM-DD HH:MM:SS");
                        unknown_arg_found = true;
                    }

                    let mut speed = SimulationSpeed::Multiplier(DEFAULT_SIMULATION_MULTIPLIER);
                    match args_vec.get(i + 1).map(String::as_str) {
                        Some("--fast-forward") => {
                            speed = SimulationSpeed::FastForward;
                            i += 1;
                        }
                        Some(value) if !value.starts_with('-') => {
                            match value.parse::<f64>() {
                                Ok(mult)
                                    if (MINIMUM_SIMULATION_MULTIPLIER
                                        ..=MAXIMUM_SIMULATION_MULTIPLIER)
                                        .contains(&mult) =>
                                {
                                    speed = SimulationSpeed::Multiplier(mult);
                                }
                                _ => {
                                    log_error!(
                                        "Invalid multiplier: {value}. Must be between {MINIMUM_SIMULATION_MULTIPLIER} and {MAXIMUM_SIMULATION_MULTIPLIER}."
                                    );
                                    unknown_arg_found = true;
                                }
                            }
                            i += 1;
                        }
                        _ => {}
                    }

                    simulate = Some((start, end, speed));
                }
                _ => {
                    log_warning!("Unknown option: {arg_str}");
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if let Some((start_time, end_time, speed)) = simulate {
            CliAction::Simulate {
                debug_enabled,
                start_time,
                end_time,
                speed,
                config_dir,
            }
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
            }
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("adhan-clock [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-S, --simulate         Run the monitor on simulated time");
    log_indented!("                       Usage: --simulate <start> <end> [multiplier | --fast-forward]");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("schedule, sc [date]    Print yesterday's, today's and tomorrow's times");
    log_indented!("location, l            Show the detected location");
    log_indented!("dashboard, dash        Live clock with a countdown to the next prayer");
    log_indented!("set, s <field> <value> [...] Update configuration field(s)");
    log_indented!("reload, r              Make the running monitor reload its configuration");
    log_indented!("help, h [command]      Show detailed help for a command");
    log_end!();
}
