//! Desktop notifications over the session bus.

use anyhow::{Context, Result};
use std::collections::HashMap;
use zbus::blocking::Connection;
use zbus::zvariant::Value;

use crate::common::constants::{
    NOTIFICATION_APP_NAME, NOTIFICATION_SOUND_NAME, NOTIFICATION_TIMEOUT_MS,
};

/// D-Bus proxy for the freedesktop notification daemon.
#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Sends a titled message to the user.
pub trait Notifier {
    fn notify(&self, summary: &str, body: &str) -> Result<()>;
}

/// Hints sent with every notification: normal urgency plus a themed sound.
pub fn notification_hints() -> HashMap<&'static str, Value<'static>> {
    let mut hints = HashMap::new();
    hints.insert("urgency", Value::U8(1));
    hints.insert("sound-name", Value::from(NOTIFICATION_SOUND_NAME));
    hints
}

/// Notifier backed by `org.freedesktop.Notifications`.
pub struct DesktopNotifier {
    connection: Connection,
}

impl DesktopNotifier {
    pub fn connect() -> Result<Self> {
        let connection = Connection::session().context("Failed to connect to the session bus")?;
        Ok(Self { connection })
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) -> Result<()> {
        let proxy = NotificationsProxyBlocking::new(&self.connection)
            .context("Failed to reach the notification daemon")?;

        let hints = notification_hints();

        proxy
            .notify(
                NOTIFICATION_APP_NAME,
                0,
                "",
                summary,
                body,
                &[],
                hints,
                NOTIFICATION_TIMEOUT_MS,
            )
            .context("Notification request failed")?;
        Ok(())
    }
}
