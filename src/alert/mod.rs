//! Alerting when a prayer time arrives.
//!
//! An alert is a desktop notification followed by the adhan audio. Each half
//! fails independently and only gets logged: a broken speaker must never stop
//! the monitor.

pub mod notification;
pub mod sound;

use chrono::DateTime;
use chrono_tz::Tz;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::config::Config;
use crate::prayer::Prayer;
use notification::{DesktopNotifier, Notifier};
use sound::{Playback, resolve_player};

pub const ALERT_TITLE: &str = "Adhan Clock";
pub const STARTUP_TITLE: &str = "Adhan Clock Started";
pub const STARTUP_BODY: &str = "Prayer times loaded successfully.";

pub fn alert_body(prayer: Prayer) -> String {
    format!("Time for {prayer}")
}

/// Whatever happens when a prayer becomes due.
pub trait AlertTrigger {
    fn fire(&mut self, prayer: Prayer, time: DateTime<Tz>);

    /// One-off notice that monitoring has started.
    fn notify_startup(&self) {}

    /// Pick up changed settings after a configuration reload.
    fn reconfigure(&mut self, _config: &Config) {}
}

/// Notification plus audio, as configured.
pub struct DesktopAlert {
    notifier: Option<Box<dyn Notifier>>,
    sound: Option<(Option<String>, PathBuf)>,
    running: Arc<AtomicBool>,
}

impl DesktopAlert {
    pub fn new(
        notifier: Option<Box<dyn Notifier>>,
        sound: Option<(Option<String>, PathBuf)>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            notifier,
            sound,
            running,
        }
    }

    /// Build from config. A missing session bus disables notifications with a warning.
    pub fn from_config(config: &Config, running: Arc<AtomicBool>) -> Self {
        let notifier: Option<Box<dyn Notifier>> = if config.notifications_enabled() {
            match DesktopNotifier::connect() {
                Ok(notifier) => Some(Box::new(notifier)),
                Err(e) => {
                    log_pipe!();
                    log_warning!("Desktop notifications unavailable: {e}");
                    None
                }
            }
        } else {
            None
        };

        let sound = config
            .sound_enabled()
            .then(|| (config.sound_player.clone(), config.adhan_sound_path()));

        Self::new(notifier, sound, running)
    }

    fn play_adhan(&self) -> anyhow::Result<()> {
        let Some((player, path)) = &self.sound else {
            return Ok(());
        };

        let player = resolve_player(player.as_deref())?;
        log_indented!("Playing adhan");
        let playback = Playback::play(&player, path)?;
        if let Some(status) = playback.wait(&self.running)?
            && !status.success()
        {
            anyhow::bail!("Sound player exited with {status}");
        }
        Ok(())
    }
}

impl AlertTrigger for DesktopAlert {
    fn fire(&mut self, prayer: Prayer, _time: DateTime<Tz>) {
        if let Some(notifier) = &self.notifier
            && let Err(e) = notifier.notify(ALERT_TITLE, &alert_body(prayer))
        {
            log_warning!("Failed to send notification: {e}");
        }

        if let Err(e) = self.play_adhan() {
            log_error!("Error playing sound: {e}");
        }
    }

    fn notify_startup(&self) {
        if let Some(notifier) = &self.notifier
            && let Err(e) = notifier.notify(STARTUP_TITLE, STARTUP_BODY)
        {
            log_warning!("Failed to send startup notification: {e}");
        }
    }

    fn reconfigure(&mut self, config: &Config) {
        *self = Self::from_config(config, self.running.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, summary: &str, body: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((summary.to_string(), body.to_string()));
            if self.fail {
                anyhow::bail!("daemon went away");
            }
            Ok(())
        }
    }

    fn at_noon() -> DateTime<Tz> {
        use chrono::TimeZone;
        chrono_tz::UTC.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fire_sends_prayer_notification() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            sent: sent.clone(),
            fail: false,
        };
        let mut alert = DesktopAlert::new(Some(Box::new(notifier)), None, Arc::new(AtomicBool::new(true)));

        alert.fire(Prayer::Maghrib, at_noon());
        alert.notify_startup();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0], ("Adhan Clock".to_string(), "Time for Maghrib".to_string()));
        assert_eq!(
            sent[1],
            ("Adhan Clock Started".to_string(), "Prayer times loaded successfully.".to_string())
        );
    }

    #[test]
    fn test_failures_do_not_propagate() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            sent: sent.clone(),
            fail: true,
        };
        let sound = Some((None, PathBuf::from("/nonexistent/makkah_adhan.mp3")));
        let mut alert = DesktopAlert::new(Some(Box::new(notifier)), sound, Arc::new(AtomicBool::new(true)));

        // Both the notification and the sound fail; fire still returns
        alert.fire(Prayer::Fajr, at_noon());
        assert_eq!(sent.lock().unwrap().len(), 1);
    }
}
