//! File watching for hot config reloading.
//!
//! Watches the config directory (editors often replace files rather than
//! write in place) and posts [`SignalMessage::Reload`] when `config.json`
//! changes.

use crate::common::utils::private_path;
use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use super::Config;
use crate::io::signals::SignalMessage;

/// Editors write in several steps; changes closer together than this reload once.
const DEBOUNCE_MS: u64 = 500;

pub struct ConfigWatcher {
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
    config_path: PathBuf,
}

/// Whether an event path refers to the watched config file or an editor temp copy of it.
pub(crate) fn affects_config(event_path: &Path, config_path: &Path) -> bool {
    if event_path == config_path {
        return true;
    }
    if event_path.parent() != config_path.parent() {
        return false;
    }
    match (
        event_path.file_name().and_then(|n| n.to_str()),
        config_path.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(event_name), Some(config_name)) => event_name.starts_with(config_name),
        _ => false,
    }
}

impl ConfigWatcher {
    pub fn new(signal_sender: Sender<SignalMessage>, debug_enabled: bool) -> Result<Self> {
        Ok(Self {
            signal_sender,
            debug_enabled,
            config_path: Config::get_config_path()?,
        })
    }

    /// Spawn the watcher thread.
    pub fn start(self) -> Result<()> {
        let Some(config_dir) = self.config_path.parent().map(Path::to_path_buf) else {
            return Ok(());
        };
        if !config_dir.is_dir() {
            if self.debug_enabled {
                log_pipe!();
                log_debug!("No configuration directory to watch for hot reload");
            }
            return Ok(());
        }

        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    )
                {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&config_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", config_dir.display()))?;

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Watching for configuration changes:");
            log_indented!("{}", private_path(&self.config_path));
        }

        let Self {
            signal_sender,
            debug_enabled,
            config_path,
        } = self;

        thread::spawn(move || {
            // The watcher stops when dropped
            let _watcher = watcher;
            let mut last_reload: Option<Instant> = None;

            for event in rx {
                if !event.paths.iter().any(|p| affects_config(p, &config_path)) {
                    continue;
                }

                if last_reload.is_some_and(|t| t.elapsed() < Duration::from_millis(DEBOUNCE_MS)) {
                    continue;
                }

                if debug_enabled {
                    log_pipe!();
                    log_info!("Configuration file change detected");
                }

                if signal_sender.send(SignalMessage::Reload).is_err() {
                    break;
                }
                last_reload = Some(Instant::now());
            }
        });

        Ok(())
    }
}

/// Start the configuration file watcher.
pub fn start_config_watcher(
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<()> {
    ConfigWatcher::new(signal_sender, debug_enabled)?.start()
}
