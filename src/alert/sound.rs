//! Audio playback through an external player process.
//!
//! [`Playback`] owns the child process. Dropping it stops and reaps the
//! player, so no early return or panic can leave audio running.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::common::constants::{PLAYBACK_POLL_MS, SOUND_PLAYERS};

/// Find an executable on `PATH`.
fn find_in_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|full| full.is_file())
}

/// Resolve the player command: the configured one, else the first known player installed.
pub fn resolve_player(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(player) = configured {
        return find_in_path(player).with_context(|| format!("Sound player `{player}` not found"));
    }

    SOUND_PLAYERS
        .iter()
        .find_map(|player| find_in_path(player))
        .with_context(|| {
            format!(
                "No sound player found (tried {}). Set sound_player in the config",
                SOUND_PLAYERS.join(", ")
            )
        })
}

/// A running player process.
#[derive(Debug)]
pub struct Playback {
    child: Option<Child>,
}

impl Playback {
    /// Start `player <file>` with its output silenced.
    pub fn play(player: &Path, file: &Path) -> Result<Self> {
        if !file.is_file() {
            anyhow::bail!("Audio file not found: {}", file.display());
        }

        let mut command = Command::new(player);
        command.arg(file);
        Self::spawn(command)
            .with_context(|| format!("Failed to start sound player {}", player.display()))
    }

    pub fn spawn(mut command: Command) -> Result<Self> {
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(Self { child: Some(child) })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Block until the player exits or `running` is cleared.
    ///
    /// Returns `None` when playback was cut short.
    pub fn wait(mut self, running: &AtomicBool) -> Result<Option<ExitStatus>> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };

        loop {
            if let Some(status) = child.try_wait().context("Failed to poll sound player")? {
                self.child = None;
                return Ok(Some(status));
            }
            if !running.load(Ordering::SeqCst) {
                // Drop stops the player
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(PLAYBACK_POLL_MS));
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && matches!(child.try_wait(), Ok(None))
        {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
