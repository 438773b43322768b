//! Structured logging system with visual formatting.
//!
//! This module provides the box-drawing console output used throughout adhan-clock.
//! Every message is routed through [`write_output`], which allows the logger to be
//! silenced at runtime (quiet subcommands, tests) and to prepend simulated
//! timestamps while a simulation is running.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Location timezone used to format simulation timestamps
static LOCATION_TIMEZONE: OnceLock<Option<chrono_tz::Tz>> = OnceLock::new();

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: starts a new conceptual block (`┃` spacer, then `┣ message`).
///   Follow-up lines inside the block use `log_decorated!` or `log_indented!`.
/// - **`log_decorated!`**: a `┣ message` line belonging to the current block.
/// - **`log_indented!`**: nested detail, printed as `┃   message`.
/// - **`log_pipe!`**: a bare `┃` spacer, used before `log_warning!`, `log_error!`,
///   `log_info!`, `log_debug!` or `log_critical!` when they open a block.
/// - **`log_version!`**: the `┏ adhan-clock vX.Y.Z ━━╸` header.
/// - **`log_end!`**: the final `╹` marker.
/// - **`log_error_exit!`**: `┗[ERROR] message`, terminates the visual flow before exiting.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Set the location timezone used for simulation timestamps.
    pub fn set_location_timezone(tz: Option<chrono_tz::Tz>) {
        let _ = LOCATION_TIMEZONE.set(tz);
    }

    fn location_timezone() -> Option<chrono_tz::Tz> {
        LOCATION_TIMEZONE.get().and_then(|tz| *tz)
    }

    /// Timestamp prefix shown while a simulation is running.
    ///
    /// Returns `[HH:MM:SS] ` in the location timezone (or local time when no
    /// location timezone is known), and an empty string for real time.
    pub fn get_timestamp_prefix() -> String {
        if !(crate::time::source::is_initialized() && crate::time::source::is_simulated()) {
            return String::new();
        }

        let now = crate::time::source::now();
        match Self::location_timezone() {
            Some(tz) => format!("[{}] ", now.with_timezone(&tz).format("%H:%M:%S")),
            None => format!("[{}] ", now.format("%H:%M:%S")),
        }
    }
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!("{prefix}┣ {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!("{prefix}┣ {expr}\n"));
        }
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!("{prefix}┃   {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!("{prefix}┃   {expr}\n"));
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            $crate::common::logger::write_output(&format!("{prefix}┃\n"));
        }
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!("{prefix}┃\n{prefix}┣ {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!("{prefix}┃\n{prefix}┣ {expr}\n"));
        }
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let version = env!("CARGO_PKG_VERSION");
            $crate::common::logger::write_output(&format!(
                "{prefix}┏ adhan-clock v{version} ━━╸\n"
            ));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            $crate::common::logger::write_output(&format!("{prefix}╹\n"));
        }
    }};
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[33mWARNING\x1b[0m] {message}\n"
            ));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[33mWARNING\x1b[0m] {expr}\n"
            ));
        }
    }};
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[31mERROR\x1b[0m] {message}\n"
            ));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[31mERROR\x1b[0m] {expr}\n"
            ));
        }
    }};
}

/// Log an error that ends the visual flow, right before the process exits.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!(
                "{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n"
            ));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!(
                "{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {expr}\n"
            ));
        }
    }};
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[32mINFO\x1b[0m] {message}\n"
            ));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[32mINFO\x1b[0m] {expr}\n"
            ));
        }
    }};
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[32mDEBUG\x1b[0m] {message}\n"
            ));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[32mDEBUG\x1b[0m] {expr}\n"
            ));
        }
    }};
}

/// Log a critical message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_critical {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[31mCRITICAL\x1b[0m] {message}\n"
            ));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let expr = $expr;
            $crate::common::logger::write_output(&format!(
                "{prefix}┣[\x1b[31mCRITICAL\x1b[0m] {expr}\n"
            ));
        }
    }};
}
