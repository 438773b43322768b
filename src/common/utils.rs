//! Shared helpers for path display, process checks and duration formatting.

use anyhow::{Context, Result};
use std::path::Path;

/// Display a path with the home directory replaced by `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

/// Check whether a process with the given PID is alive.
///
/// Sends the null signal, which performs permission and existence checks
/// without delivering anything.
pub fn is_process_running(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        // The process exists but belongs to someone else
        Err(nix::errno::Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Read the PID of the running instance from the lock file.
pub fn get_running_instance_pid() -> Result<u32> {
    let lock_path = crate::io::lock::get_lock_path();
    let content = std::fs::read_to_string(&lock_path)
        .with_context(|| format!("No lock file at {lock_path}"))?;

    let pid = content
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<u32>().ok())
        .context("Lock file does not contain a valid PID")?;

    if is_process_running(pid) {
        Ok(pid)
    } else {
        anyhow::bail!("Process {pid} from lock file is no longer running")
    }
}

/// Format a duration as `HH:MM:SS`, clamping negatives to zero.
pub fn format_countdown(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Format a duration in words, e.g. `2h 05m` or `14m`.
pub fn format_duration_words(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let hours = minutes / 60;
    if hours > 0 {
        format!("{hours}h {:02}m", minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::seconds(0)), "00:00:00");
        assert_eq!(format_countdown(Duration::seconds(59)), "00:00:59");
        assert_eq!(format_countdown(Duration::seconds(3661)), "01:01:01");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn test_format_duration_words() {
        assert_eq!(format_duration_words(Duration::minutes(14)), "14m");
        assert_eq!(format_duration_words(Duration::minutes(125)), "2h 05m");
    }

    #[test]
    fn test_current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }
}
