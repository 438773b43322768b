//! Lock file management for single-instance enforcement.
//!
//! The lock file lives in `$XDG_RUNTIME_DIR` and holds the PID of the running
//! monitor, which is how `adhan-clock reload` finds the process to signal.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use crate::common::utils;

/// Path of the lock file.
pub fn get_lock_path() -> String {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    format!("{runtime_dir}/adhan-clock.lock")
}

/// Outcome of a lock attempt.
#[derive(Debug)]
pub enum LockOutcome {
    /// We hold the lock; keep the file open for the lifetime of the process.
    Acquired(File, String),
    /// Another live instance holds it.
    AlreadyRunning(u32),
}

/// Acquire an exclusive lock, clearing stale locks left by dead processes.
pub fn acquire_lock() -> Result<LockOutcome> {
    let lock_path = get_lock_path();

    for _ in 0..2 {
        let mut lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {lock_path}"))?;

        if lock_file.try_lock_exclusive().is_ok() {
            lock_file.set_len(0)?;
            lock_file.seek(SeekFrom::Start(0))?;
            writeln!(&lock_file, "{}", std::process::id())?;
            lock_file.flush()?;
            return Ok(LockOutcome::Acquired(lock_file, lock_path));
        }

        match read_lock_pid(&lock_path) {
            Some(pid) if utils::is_process_running(pid) => {
                return Ok(LockOutcome::AlreadyRunning(pid));
            }
            Some(pid) => {
                log_warning!("Removing stale lock file (process {pid} no longer running)");
                let _ = std::fs::remove_file(&lock_path);
            }
            None => {
                log_warning!("Lock file contains invalid PID, removing stale lock");
                let _ = std::fs::remove_file(&lock_path);
            }
        }
    }

    anyhow::bail!("Failed to acquire lock at {lock_path} after cleanup attempt")
}

/// Remove the lock file on clean shutdown.
pub fn release_lock(lock_file: File, lock_path: &str) {
    let _ = lock_file.unlock();
    drop(lock_file);
    let _ = std::fs::remove_file(lock_path);
}

fn read_lock_pid(lock_path: &str) -> Option<u32> {
    std::fs::read_to_string(lock_path)
        .ok()?
        .lines()
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_lock_path_uses_runtime_dir() {
        let dir = tempdir().unwrap();
        let original = std::env::var("XDG_RUNTIME_DIR").ok();
        unsafe { std::env::set_var("XDG_RUNTIME_DIR", dir.path()) };

        assert_eq!(
            get_lock_path(),
            format!("{}/adhan-clock.lock", dir.path().display())
        );

        unsafe {
            match original {
                Some(value) => std::env::set_var("XDG_RUNTIME_DIR", value),
                None => std::env::remove_var("XDG_RUNTIME_DIR"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_acquire_writes_pid_and_release_removes_file() {
        let dir = tempdir().unwrap();
        let original = std::env::var("XDG_RUNTIME_DIR").ok();
        unsafe { std::env::set_var("XDG_RUNTIME_DIR", dir.path()) };

        let outcome = acquire_lock().unwrap();
        let LockOutcome::Acquired(file, path) = outcome else {
            panic!("expected lock to be acquired");
        };
        assert_eq!(read_lock_pid(&path), Some(std::process::id()));

        release_lock(file, &path);
        assert!(!std::path::Path::new(&path).exists());

        unsafe {
            match original {
                Some(value) => std::env::set_var("XDG_RUNTIME_DIR", value),
                None => std::env::remove_var("XDG_RUNTIME_DIR"),
            }
        }
    }
}
