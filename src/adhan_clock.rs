//! Application coordinator that manages the lifecycle of the console monitor.
//!
//! Handles resource acquisition and hands over to [`Core`]:
//! - Configuration loading
//! - Lock file management for single-instance enforcement
//! - Signal handler and config watcher setup
//! - Location resolution and alert setup
//!
//! - Normal startup: `AdhanClock::new(debug_enabled).run()`
//! - Simulation mode: `AdhanClock::new(debug_enabled).without_lock().without_headers().run()`

use anyhow::Result;

use crate::{
    alert::DesktopAlert,
    common::constants::EXIT_FAILURE,
    common::logger::Log,
    config::{self, Config},
    core::{Core, CoreParams},
    geo::location::{IpApiClient, resolve_location},
    io::lock::{self, LockOutcome},
    io::signals::setup_signal_handler,
};

/// Builder for configuring and running the monitor.
pub struct AdhanClock {
    debug_enabled: bool,
    create_lock: bool,
    show_headers: bool,
}

impl AdhanClock {
    /// Create a new runner with defaults matching normal run
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            create_lock: true,
            show_headers: true,
        }
    }

    /// Skip lock file creation (simulation runs beside a real instance)
    pub fn without_lock(mut self) -> Self {
        self.create_lock = false;
        self
    }

    /// Skip header display
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Run the monitor until shutdown.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
        }

        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_error_exit!("Configuration failed");
                eprintln!("{e:?}");
                std::process::exit(EXIT_FAILURE);
            }
        };

        let lock_info = if self.create_lock {
            match lock::acquire_lock()? {
                LockOutcome::Acquired(file, path) => Some((file, path)),
                LockOutcome::AlreadyRunning(pid) => {
                    log_pipe!();
                    log_error!("adhan-clock is already running (PID: {pid})");
                    log_indented!("Use 'adhan-clock reload' to apply configuration changes");
                    log_end!();
                    return Ok(());
                }
            }
        } else {
            None
        };

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        if let Err(e) =
            config::start_config_watcher(signal_state.signal_sender.clone(), self.debug_enabled)
        {
            log_pipe!();
            log_warning!("Config file watching unavailable: {e}");
            log_indented!("Hot config reload disabled, use 'adhan-clock reload' instead");
        }

        config.log_config();

        let lookup = IpApiClient::new();
        let resolved = resolve_location(&config, &lookup);
        if !crate::time::source::is_simulated() {
            Log::set_location_timezone(Some(resolved.location.timezone));
        }

        if self.debug_enabled {
            let today = crate::time::source::now()
                .with_timezone(&resolved.location.timezone)
                .date_naive();
            let provider = crate::core::build_provider(&resolved.location, &config);
            match provider.schedule_for(today) {
                Ok(schedule) => crate::geo::display::log_solar_debug_info(&resolved.location, &schedule),
                Err(e) => {
                    log_pipe!();
                    log_warning!("Solar debug info unavailable: {e}");
                }
            }
        }

        let alert = DesktopAlert::from_config(&config, signal_state.running.clone());

        if lock_info.is_some() {
            log_block_start!("Lock acquired, starting adhan-clock...");
        }

        let core = Core::new(CoreParams {
            config,
            location: resolved,
            alert: Box::new(alert),
            lookup: Box::new(lookup),
            signal_state,
            debug_enabled: self.debug_enabled,
            lock_info,
        })?;

        core.execute()
    }
}
