//! Signal handling for the reminder process.
//!
//! A background thread turns Unix signals into [`SignalMessage`]s on an mpsc
//! channel. The configuration watcher sends into the same channel, so the main
//! loop has a single place to wait on.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc::{Receiver, Sender},
    thread,
};

/// Messages delivered to the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Configuration reload (SIGUSR2 or file change)
    Reload,
    /// Shutdown (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Cleared when the application should stop
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Kept so the config watcher can post reloads
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// State backed by a plain channel with no OS signal thread.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = std::sync::mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Register signal handlers and spawn the signal thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGUSR2 => {
                    if sender.send(SignalMessage::Reload).is_err() {
                        break;
                    }
                    log_pipe!();
                    log_info!("Received configuration reload signal");
                }
                SIGHUP => {
                    // Terminal is gone, nothing left to print to
                    running.store(false, Ordering::SeqCst);
                    let _ = sender.send(SignalMessage::Shutdown);
                    break;
                }
                _ => {
                    let message = match sig {
                        SIGINT if debug_enabled => {
                            "Received SIGINT (Ctrl+C), initiating graceful shutdown..."
                        }
                        SIGINT => "Received interrupt signal, initiating graceful shutdown...",
                        SIGTERM => "Received termination request, initiating graceful shutdown...",
                        _ => "Received shutdown signal, initiating graceful shutdown...",
                    };
                    log_pipe!();
                    log_info!("{}", message);

                    if let Err(e) = sender.send(SignalMessage::Shutdown) {
                        log_warning!("Failed to send shutdown message: {e}");
                    }
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    });

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_state_delivers_messages() {
        let state = SignalState::detached();
        assert!(state.is_running());

        state.signal_sender.send(SignalMessage::Reload).unwrap();
        assert_eq!(state.signal_receiver.recv().unwrap(), SignalMessage::Reload);
    }
}
