//! The transactional write engine for one database family.

use crate::atomic::{atomic_replace, create_backup};
use crate::changeset::ChangeSet;
use crate::config::{file_mode, FilesConfig};
use crate::dry_run::DryRunResult;
use crate::error::{CoreError, CoreResult};
use crate::lock::{PasswdLock, DEFAULT_LOCK_TIMEOUT};
use etcfiles_codec::Record;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Options for a write operation.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to copy the target to `<path>-` before replacing it.
    pub backup: bool,
    /// Whether to compute and return the result without writing.
    pub dry_run: bool,
    /// How long to wait for the serialization lock.
    pub lock_timeout: Duration,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            backup: true,
            dry_run: false,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl WriteOptions {
    /// Creates options with the defaults: backup on, dry run off, 15 s
    /// lock timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create a backup first.
    #[must_use]
    pub const fn backup(mut self, value: bool) -> Self {
        self.backup = value;
        self
    }

    /// Sets whether this is a dry run.
    #[must_use]
    pub const fn dry_run(mut self, value: bool) -> Self {
        self.dry_run = value;
        self
    }

    /// Sets the lock acquisition timeout.
    #[must_use]
    pub const fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }
}

/// Orchestrates permission check, change-set computation, locking, backup,
/// and atomic replacement for the four database files.
///
/// One engine serializes all four databases through a single
/// [`PasswdLock`]; writes are full-replace — the caller supplies the
/// complete desired record set each call, and the change set is purely
/// diagnostic.
///
/// The call sequence per write is fixed: permission check, change-set
/// computation, dry-run short circuit, lock acquisition, drift re-check,
/// backup, atomic replace, lock release. The permission check precedes
/// the lock so a permission failure never leaves a dangling lock, and the
/// lock is released on every exit path.
#[derive(Debug)]
pub struct WriteEngine {
    config: FilesConfig,
    lock: Mutex<PasswdLock>,
}

impl WriteEngine {
    /// Creates an engine for the given file layout.
    #[must_use]
    pub fn new(config: FilesConfig) -> Self {
        let lock = Mutex::new(PasswdLock::new(config.lock.clone()));
        Self { config, lock }
    }

    /// Returns the file layout this engine writes.
    #[must_use]
    pub fn config(&self) -> &FilesConfig {
        &self.config
    }

    /// Returns true if this engine currently holds the serialization lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.lock().is_locked()
    }

    /// Replaces the database for `R`'s kind with `records`.
    ///
    /// Returns `Ok(Some(result))` for a dry run and `Ok(None)` for a
    /// completed write.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Permission`] if the target's directory is not
    ///   writable (checked before the lock is taken)
    /// - [`CoreError::Validation`] if the proposed set has duplicate keys
    /// - [`CoreError::Lock`] if the lock is not acquired within the
    ///   timeout; no mutation has happened at that point
    /// - [`CoreError::ConcurrentModification`] if the file changed
    ///   between the change-set computation and the locked replace
    /// - [`CoreError::Io`] for backup or replace failures; the target is
    ///   left as it was
    pub fn write<R: Record>(
        &self,
        records: &[R],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        let kind = R::KIND;
        let path = self.config.path(kind);
        let mode = file_mode(kind);

        check_write_permission(path)?;

        let current = read_current(path)?;
        let content = render(records);
        let changes = ChangeSet::diff(&current, records);
        let (warnings, errors) = validate(records);

        if options.dry_run {
            return Ok(Some(DryRunResult::new(
                content,
                path.to_path_buf(),
                changes,
                warnings,
                errors,
                records.len(),
            )));
        }

        if !errors.is_empty() {
            return Err(CoreError::validation(errors.join("; ")));
        }
        for warning in &warnings {
            warn!(db = %kind, "{warning}");
        }

        let mut lock = self.lock.lock();
        lock.acquire(options.lock_timeout)?;
        let result = replace_locked(path, mode, &current, &content, options.backup);
        lock.release();

        if result.is_ok() {
            let summary = changes.summary();
            info!(
                db = %kind,
                path = %path.display(),
                entries = records.len(),
                added = summary.added,
                modified = summary.modified,
                removed = summary.removed,
                "replaced database file"
            );
        }
        result.map(|()| None)
    }
}

/// The locked portion of a write: drift re-check, backup, atomic replace.
fn replace_locked(
    path: &Path,
    mode: u32,
    expected_current: &str,
    content: &str,
    backup: bool,
) -> CoreResult<()> {
    // The change set was computed before the lock was held; abort if the
    // file drifted in between rather than clobber someone else's write.
    let reread = read_current(path)?;
    if reread != expected_current {
        return Err(CoreError::concurrent_modification(path));
    }

    if backup {
        create_backup(path)?;
    }
    atomic_replace(path, content, mode)
}

/// Fails fast when the containing directory is not writable, before any
/// lock is taken.
fn check_write_permission(path: &Path) -> CoreResult<()> {
    let dir = path.parent().ok_or_else(|| {
        CoreError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("target has no parent directory: {}", path.display()),
        ))
    })?;

    // Probe with a short-lived temp file; access(2)-style mode-bit checks
    // misreport under ACLs and capabilities.
    match tempfile::Builder::new()
        .prefix(".etcfiles-probe-")
        .tempfile_in(dir)
    {
        Ok(_probe) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(CoreError::permission(path, "write"))
        }
        Err(e) => Err(CoreError::Io(e)),
    }
}

/// Reads the current file content; a missing file is an empty database.
fn read_current(path: &Path) -> CoreResult<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(CoreError::permission(path, "read"))
        }
        Err(e) => Err(CoreError::Io(e)),
    }
}

/// Renders the full file content for a record set.
fn render<R: Record>(records: &[R]) -> String {
    let mut content = String::new();
    for record in records {
        content.push_str(&record.to_line());
        content.push('\n');
    }
    content
}

/// Validates a proposed record set, returning warnings and errors.
fn validate<R: Record>(records: &[R]) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    if records.is_empty() {
        warnings.push(format!("record set for {} is empty", R::KIND));
    }

    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.key()) {
            errors.push(format!("duplicate key: {}", record.key()));
        }
    }

    (warnings, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::ChangeKind;
    use etcfiles_codec::{Group, Shadow, User};
    use std::thread;
    use tempfile::tempdir;

    fn engine_in(dir: &Path) -> WriteEngine {
        WriteEngine::new(FilesConfig::in_dir(dir))
    }

    fn user(name: &str, uid: u32) -> User {
        User::new(name, "x", uid, uid, "", format!("/home/{name}"), "/bin/sh")
    }

    #[test]
    fn write_creates_file_with_rendered_lines() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = engine
            .write(&[user("root", 0), user("alice", 1000)], &WriteOptions::new())
            .unwrap();
        assert!(result.is_none());

        let content = fs::read_to_string(dir.path().join("passwd")).unwrap();
        assert_eq!(
            content,
            "root:x:0:0::/home/root:/bin/sh\nalice:x:1000:1000::/home/alice:/bin/sh\n"
        );
        assert!(!engine.is_locked());
    }

    #[cfg(unix)]
    #[test]
    fn write_applies_kind_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        engine.write(&[user("root", 0)], &WriteOptions::new()).unwrap();
        engine
            .write(
                &[Shadow::parse("root:*:19000:0:99999:7:::").unwrap()],
                &WriteOptions::new(),
            )
            .unwrap();

        let mode = |name: &str| {
            fs::metadata(dir.path().join(name))
                .unwrap()
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode("passwd"), 0o644);
        assert_eq!(mode("shadow"), 0o640);
    }

    #[test]
    fn dry_run_reports_without_mutating() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let passwd = dir.path().join("passwd");
        fs::write(&passwd, "root:x:0:0::/home/root:/bin/sh\n").unwrap();
        let before = fs::read(&passwd).unwrap();

        let result = engine
            .write(
                &[user("root", 0), user("alice", 1000)],
                &WriteOptions::new().dry_run(true),
            )
            .unwrap()
            .unwrap();

        assert!(result.is_valid());
        assert_eq!(result.entry_count(), 2);
        assert_eq!(result.changes().summary().added, 1);
        assert_eq!(fs::read(&passwd).unwrap(), before);
        // The lock was never touched.
        assert!(!dir.path().join(".pwd.lock").exists());
        assert!(!engine.is_locked());
    }

    #[test]
    fn dry_run_add_and_remove_scenario() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        fs::write(
            dir.path().join("passwd"),
            "root:x:0:0::/home/root:/bin/sh\nbob:x:1001:1001::/home/bob:/bin/sh\n",
        )
        .unwrap();

        let result = engine
            .write(
                &[user("root", 0), user("alice", 1000)],
                &WriteOptions::new().dry_run(true),
            )
            .unwrap()
            .unwrap();

        let kinds: Vec<_> = result.changes().iter().map(|c| (c.kind, c.key.as_str())).collect();
        assert_eq!(
            kinds,
            vec![(ChangeKind::Added, "alice"), (ChangeKind::Removed, "bob")]
        );
    }

    #[test]
    fn backup_holds_previous_content() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let group = dir.path().join("group");
        fs::write(&group, "wheel:x:0:root\n").unwrap();

        engine
            .write(
                &[Group::new("wheel", "x", 0, vec!["root".into(), "admin".into()])],
                &WriteOptions::new(),
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("group-")).unwrap(),
            "wheel:x:0:root\n"
        );
        assert_eq!(
            fs::read_to_string(&group).unwrap(),
            "wheel:x:0:root,admin\n"
        );
    }

    #[test]
    fn backup_can_be_disabled() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        fs::write(dir.path().join("group"), "wheel:x:0:\n").unwrap();

        engine
            .write(
                &[Group::new("wheel", "x", 0, vec![])],
                &WriteOptions::new().backup(false),
            )
            .unwrap();

        assert!(!dir.path().join("group-").exists());
    }

    #[test]
    fn duplicate_keys_fail_a_real_write() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let err = engine
            .write(&[user("alice", 1000), user("alice", 1001)], &WriteOptions::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(!dir.path().join("passwd").exists());
    }

    #[test]
    fn duplicate_keys_surface_in_dry_run() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = engine
            .write(
                &[user("alice", 1000), user("alice", 1001)],
                &WriteOptions::new().dry_run(true),
            )
            .unwrap()
            .unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.errors(), ["duplicate key: alice"]);
    }

    #[test]
    fn empty_set_warns_in_dry_run() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = engine
            .write::<User>(&[], &WriteOptions::new().dry_run(true))
            .unwrap()
            .unwrap();
        assert!(result.is_valid());
        assert!(result.has_warnings());
        assert_eq!(result.content(), "");
    }

    #[test]
    fn lock_timeout_performs_no_mutation() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        fs::write(dir.path().join("passwd"), "root:x:0:0::/root:/bin/sh\n").unwrap();

        let mut holder = PasswdLock::new(dir.path().join(".pwd.lock"));
        holder.acquire(DEFAULT_LOCK_TIMEOUT).unwrap();

        let err = engine
            .write(
                &[user("alice", 1000)],
                &WriteOptions::new().lock_timeout(Duration::from_millis(200)),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Lock { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("passwd")).unwrap(),
            "root:x:0:0::/root:/bin/sh\n"
        );
        assert!(!engine.is_locked());
    }

    #[test]
    fn drift_between_diff_and_lock_is_rejected() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let passwd = dir.path().join("passwd");
        fs::write(&passwd, "root:x:0:0::/root:/bin/sh\n").unwrap();

        let mut holder = PasswdLock::new(dir.path().join(".pwd.lock"));
        holder.acquire(DEFAULT_LOCK_TIMEOUT).unwrap();

        thread::scope(|scope| {
            let writer = scope.spawn(|| {
                engine.write(
                    &[user("root", 0)],
                    &WriteOptions::new().lock_timeout(Duration::from_secs(10)),
                )
            });

            // The engine computed its change set and is now waiting on the
            // lock; change the file out from under it, then let it in.
            thread::sleep(Duration::from_millis(400));
            fs::write(&passwd, "root:x:0:0::/root:/bin/sh\nsneaky:x:99:99::/:/bin/sh\n")
                .unwrap();
            holder.release();

            let err = writer.join().unwrap().unwrap_err();
            assert!(matches!(err, CoreError::ConcurrentModification { .. }));
        });

        // The drifted content is preserved.
        assert_eq!(
            fs::read_to_string(&passwd).unwrap(),
            "root:x:0:0::/root:/bin/sh\nsneaky:x:99:99::/:/bin/sh\n"
        );
        assert!(!engine.is_locked());
    }

    #[test]
    fn lock_is_released_after_failed_replace() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        fs::write(dir.path().join("passwd"), "root:x:0:0::/root:/bin/sh\n").unwrap();

        // Force a ConcurrentModification failure, then verify a following
        // write acquires the lock and succeeds.
        let mut holder = PasswdLock::new(dir.path().join(".pwd.lock"));
        holder.acquire(DEFAULT_LOCK_TIMEOUT).unwrap();
        thread::scope(|scope| {
            let writer = scope.spawn(|| {
                engine.write(
                    &[user("root", 0)],
                    &WriteOptions::new().lock_timeout(Duration::from_secs(10)),
                )
            });
            thread::sleep(Duration::from_millis(400));
            fs::write(dir.path().join("passwd"), "drifted:x:1:1::/:/bin/sh\n").unwrap();
            holder.release();
            assert!(writer.join().unwrap().is_err());
        });

        engine
            .write(&[user("fresh", 500)], &WriteOptions::new())
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("passwd")).unwrap(),
            "fresh:x:500:500::/home/fresh:/bin/sh\n"
        );
    }
}
