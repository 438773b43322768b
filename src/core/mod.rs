//! Core application logic: the prayer-time polling loop.
//!
//! The `Core` struct owns the runtime state of a monitoring session and
//! drives [`monitor::Monitor`] from the active time source. It handles:
//!
//! - Printing the three-day schedule at startup, on rollover and on reload
//! - Firing the alert once per prayer
//! - Signal processing (SIGUSR2 or config file change for reload, shutdown)
//! - Configuration hot-reloading with location re-resolution

pub mod monitor;

use anyhow::{Context, Result};
use std::{fs::File, sync::atomic::Ordering, sync::mpsc::RecvTimeoutError, time::Duration};

use crate::{
    alert::AlertTrigger,
    common::utils,
    config::{self, Config},
    display::{alert_line, print_schedule_block},
    geo::location::{GeoLookup, Location, LocationSource, ResolvedLocation, resolve_location},
    io::lock,
    io::signals::{SignalMessage, SignalState},
    prayer::{PrayerTimeProvider, SolarPrayerTimes},
};
use monitor::{MatchWindow, Monitor, MonitorEvent};

/// Parameters for creating a Core instance.
pub struct CoreParams {
    pub config: Config,
    pub location: ResolvedLocation,
    pub alert: Box<dyn AlertTrigger>,
    pub lookup: Box<dyn GeoLookup>,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
    pub lock_info: Option<(File, String)>,
}

/// Runtime state of the polling loop.
pub struct Core {
    config: Config,
    location: Location,
    alert: Box<dyn AlertTrigger>,
    lookup: Box<dyn GeoLookup>,
    signal_state: SignalState,
    debug_enabled: bool,
    lock_info: Option<(File, String)>,
    monitor: Monitor,
}

/// Provider for a location under the configured calculation parameters.
pub fn build_provider(location: &Location, config: &Config) -> Box<dyn PrayerTimeProvider> {
    Box::new(SolarPrayerTimes::new(
        location.clone(),
        config.calculation_params(),
    ))
}

pub fn match_window(config: &Config) -> MatchWindow {
    MatchWindow {
        tolerance: config.tolerance(),
        cooldown: config.cooldown(),
    }
}

impl Core {
    /// Compute today's schedule and set up the loop.
    pub fn new(params: CoreParams) -> Result<Self> {
        let location = params.location.location;
        let provider = build_provider(&location, &params.config);
        let monitor = Monitor::new(
            provider,
            match_window(&params.config),
            crate::time::source::now(),
        )
        .with_context(|| format!("Cannot compute prayer times for {}", location.label()))?;

        Ok(Self {
            config: params.config,
            location,
            alert: params.alert,
            lookup: params.lookup,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
            lock_info: params.lock_info,
            monitor,
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Run until shutdown (or until a simulation reaches its end time).
    pub fn execute(mut self) -> Result<()> {
        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", utils::private_path(&custom_dir));
        }

        self.print_schedule();
        self.alert.notify_startup();

        log_block_start!("Clock loop started. Press Ctrl+C to stop.");

        let result = self.main_loop();

        if let Some((lock_file, lock_path)) = self.lock_info.take() {
            lock::release_lock(lock_file, &lock_path);
        }
        log_end!();

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let time_source = crate::time::source::handle();

        while self.signal_state.running.load(Ordering::SeqCst) {
            if time_source.is_ended() {
                log_block_start!("Simulation complete");
                break;
            }

            for event in self.monitor.tick(time_source.now()) {
                self.handle_event(event);
            }

            match self.wait(self.config.poll_interval()) {
                Ok(SignalMessage::Reload) => self.handle_config_reload()?,
                Ok(SignalMessage::Shutdown) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if self.signal_state.running.load(Ordering::SeqCst) {
                        log_pipe!();
                        log_error!("Signal handler disconnected unexpectedly");
                        log_indented!("Signals will no longer be processed");
                        // Keep polling without signal support
                        time_source.sleep(self.config.poll_interval());
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Rollover { date } => {
                if self.debug_enabled {
                    log_pipe!();
                    log_debug!("Day rolled over to {date}");
                }
                self.print_schedule();
            }
            MonitorEvent::Unavailable { date, reason } => {
                log_pipe!();
                log_warning!("No prayer times for {date}: {reason}");
                log_indented!("Alerts resume once a schedule can be computed");
            }
            MonitorEvent::Fired { prayer, time } => {
                log_block_start!("{}", alert_line(prayer));
                if self.debug_enabled {
                    log_indented!("Scheduled at {}", time.format("%H:%M:%S %Z"));
                }
                self.alert.fire(prayer, time);
            }
        }
    }

    /// Three-day block around the monitor's date. A neighbouring day without
    /// a schedule only costs the printout.
    fn print_schedule(&self) {
        if let Err(e) = print_schedule_block(self.monitor.provider(), self.monitor.date()) {
            log_pipe!();
            log_warning!("Cannot print the schedule: {e:#}");
        }
    }

    /// Sleep for `duration` on the active time source, waking early on a signal.
    fn wait(&self, duration: Duration) -> Result<SignalMessage, RecvTimeoutError> {
        let receiver = &self.signal_state.signal_receiver;

        if !crate::time::source::is_simulated() {
            return receiver.recv_timeout(duration);
        }

        // Simulated sleeps are scaled by the time source, so run them on a
        // helper thread and keep listening for signals meanwhile
        let sleep_handle = {
            let time_source = crate::time::source::handle();
            std::thread::spawn(move || time_source.sleep(duration))
        };
        loop {
            match receiver.recv_timeout(Duration::from_millis(10)) {
                Ok(msg) => break Ok(msg),
                Err(RecvTimeoutError::Timeout) => {
                    if sleep_handle.is_finished() {
                        break Err(RecvTimeoutError::Timeout);
                    }
                }
                Err(e) => break Err(e),
            }
        }
    }

    /// Reload the configuration, re-resolve the location and rebuild the schedule.
    ///
    /// An invalid file keeps the previous configuration. Alert state survives.
    fn handle_config_reload(&mut self) -> Result<()> {
        let new_config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_pipe!();
                log_error!("Failed to reload configuration: {e:#}");
                log_indented!("Keeping the previous configuration");
                return Ok(());
            }
        };

        if self.debug_enabled {
            new_config.log_config();
        }

        let resolved = resolve_location(&new_config, self.lookup.as_ref());
        if let LocationSource::Fallback { reason } = &resolved.source
            && self.debug_enabled
        {
            log_debug!("Fallback reason: {reason:?}");
        }

        let provider = build_provider(&resolved.location, &new_config);
        if let Err(e) = self.monitor.replace_provider(
            provider,
            match_window(&new_config),
            crate::time::source::now(),
        ) {
            log_pipe!();
            log_error!("Cannot compute prayer times for the new settings: {e}");
            log_indented!("Keeping the previous configuration");
            return Ok(());
        }

        self.alert.reconfigure(&new_config);
        self.config = new_config;
        self.location = resolved.location;

        log_pipe!();
        log_info!("Configuration reloaded successfully");

        self.print_schedule();
        Ok(())
    }
}
