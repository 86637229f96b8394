//! Backup and atomic file replacement.
//!
//! The replace procedure writes the new content to a temporary file in
//! the target's own directory (a rename is only atomic within one
//! filesystem), applies the requested mode and the existing file's
//! ownership, and swaps it in with a single rename. A failure at any
//! point before the rename removes the temporary file and leaves the
//! target untouched, so a concurrent reader observes either the old or
//! the new content, never a partial write.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Returns the backup path for a target: the path with `-` appended.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push("-");
    PathBuf::from(name)
}

/// Copies `path` to `<path>-`, preserving its permission bits.
///
/// A missing target is a no-op (`Ok(None)`): there is nothing to back up
/// on first write. A failing copy is an error — callers abort the write
/// before any destructive step.
///
/// # Errors
///
/// Returns [`CoreError::Io`] if the copy fails.
pub fn create_backup(path: &Path) -> CoreResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    debug!(path = %path.display(), backup = %backup.display(), "created backup");
    Ok(Some(backup))
}

/// Atomically replaces `path` with `content`, applying `mode`.
///
/// If the target already exists, its owning user and group are copied to
/// the replacement before the swap so the file's identity survives the
/// rewrite.
///
/// # Errors
///
/// Returns [`CoreError::Io`] if any step fails; the target file is left
/// exactly as it was and no temporary file remains.
pub fn atomic_replace(path: &Path, content: &str, mode: u32) -> CoreResult<()> {
    let temp = write_temp(path, content, mode)?;
    copy_ownership(path, temp.path())?;
    temp.persist(path).map_err(|e| CoreError::Io(e.error))?;
    debug!(path = %path.display(), bytes = content.len(), "replaced file");
    Ok(())
}

/// Writes `content` to a temporary file next to `path` with `mode` set.
///
/// The temporary file is deleted on drop unless persisted; the replace
/// step persists it via rename. Exposed within the crate so the abort
/// path is testable.
pub(crate) fn write_temp(path: &Path, content: &str, mode: u32) -> CoreResult<NamedTempFile> {
    let dir = path.parent().ok_or_else(|| {
        CoreError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("target has no parent directory: {}", path.display()),
        ))
    })?;

    let mut temp = tempfile::Builder::new()
        .prefix(".etcfiles-")
        .tempfile_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    set_mode(temp.path(), mode)?;
    Ok(temp)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> CoreResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> CoreResult<()> {
    Ok(())
}

#[cfg(unix)]
fn copy_ownership(target: &Path, temp: &Path) -> CoreResult<()> {
    use std::os::unix::fs::MetadataExt;
    match fs::metadata(target) {
        Ok(meta) => {
            std::os::unix::fs::chown(temp, Some(meta.uid()), Some(meta.gid()))?;
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoreError::Io(e)),
    }
}

#[cfg(not(unix))]
fn copy_ownership(_target: &Path, _temp: &Path) -> CoreResult<()> {
    Ok(())
}
