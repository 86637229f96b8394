//! The process-exclusive advisory lock serializing database writers.

use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default time to wait for the lock before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(15);

/// How often acquisition retries the non-blocking lock attempt.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The advisory lock guarding all four database files.
///
/// This is one serialization domain per database family, not one lock per
/// file: the lock file is the same `/etc/.pwd.lock` that the system
/// password tools use, so writers here and external tools observe the
/// same discipline. The lock is advisory — it excludes only processes
/// that check it.
///
/// The state machine is two states: unlocked and locked. Acquiring while
/// already held is an idempotent no-op; releasing while unlocked is too.
/// The lock is released on drop.
#[derive(Debug)]
pub struct PasswdLock {
    path: PathBuf,
    handle: Option<File>,
}

impl PasswdLock {
    /// Creates an unlocked manager for the given lock file path.
    ///
    /// The file itself is only created on the first acquire.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: None,
        }
    }

    /// Returns the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if this manager currently holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.handle.is_some()
    }

    /// Acquires the lock, waiting up to `timeout`.
    ///
    /// The lock file is created `0600` if absent. Acquisition polls a
    /// non-blocking exclusive lock every 100 ms; a holder that never
    /// releases makes this fail after `timeout` with [`CoreError::Lock`].
    /// Calling acquire while already holding the lock succeeds
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Lock`] on timeout, or [`CoreError::Io`] if
    /// the lock file cannot be opened.
    pub fn acquire(&mut self, timeout: Duration) -> CoreResult<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let file = open_lock_file(&self.path)?;
        let deadline = Instant::now() + timeout;

        loop {
            if file.try_lock_exclusive().is_ok() {
                debug!(path = %self.path.display(), "acquired password file lock");
                self.handle = Some(file);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(CoreError::Lock {
                    path: self.path.clone(),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL.min(timeout));
        }
    }

    /// Releases the lock. A no-op when not held.
    pub fn release(&mut self) {
        if let Some(file) = self.handle.take() {
            // Unlock errors are unrecoverable here; closing the handle
            // drops the lock regardless.
            let _ = FileExt::unlock(&file);
            debug!(path = %self.path.display(), "released password file lock");
        }
    }
}

impl Drop for PasswdLock {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(unix)]
fn open_lock_file(path: &Path) -> CoreResult<File> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o600)
        .open(path)?)
}

#[cfg(not(unix))]
fn open_lock_file(path: &Path) -> CoreResult<File> {
    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}
