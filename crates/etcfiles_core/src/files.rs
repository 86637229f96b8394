//! The flat-file backend: full read/write access through the write engine.

use crate::backend::AccountBackend;
use crate::capabilities::Capabilities;
use crate::config::FilesConfig;
use crate::dry_run::DryRunResult;
use crate::engine::{WriteEngine, WriteOptions};
use crate::error::{CoreError, CoreResult};
use crate::platform::Platform;
use etcfiles_codec::{GShadow, Group, Record, Shadow, User};
use std::fs;
use std::io;
use std::path::Path;

/// The backend for platforms whose account database is the flat files
/// themselves.
///
/// Reads scan the configured file on every call — there is no caching, so
/// a reader always sees the file as of its own call. Blank lines and
/// lines starting with `#` are skipped; any other malformed line is a
/// parse error surfaced to the caller. Writes go through the
/// [`WriteEngine`] and share its one serialization lock.
#[derive(Debug)]
pub struct FilesBackend {
    engine: WriteEngine,
}

impl FilesBackend {
    /// Creates a backend over the given file layout.
    #[must_use]
    pub fn new(config: FilesConfig) -> Self {
        Self {
            engine: WriteEngine::new(config),
        }
    }

    /// Returns the file layout this backend reads and writes.
    #[must_use]
    pub fn config(&self) -> &FilesConfig {
        self.engine.config()
    }

    fn scan<R: Record>(&self) -> CoreResult<Vec<R>> {
        let path = self.config().path(R::KIND);
        read_records(path)
    }
}

/// Parses every entry line of a database file, in file order.
///
/// A missing file reads as empty. A permission failure is reported as
/// [`CoreError::Permission`] with the read operation named.
pub(crate) fn read_records<R: Record>(path: &Path) -> CoreResult<Vec<R>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(CoreError::permission(path, "read"))
        }
        Err(e) => return Err(CoreError::Io(e)),
    };

    let mut records = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(R::parse(line)?);
    }
    Ok(records)
}

impl AccountBackend for FilesBackend {
    fn platform(&self) -> Platform {
        Platform::current()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::full(self.platform())
    }

    fn users(&self) -> CoreResult<Vec<User>> {
        self.scan()
    }

    fn groups(&self) -> CoreResult<Vec<Group>> {
        self.scan()
    }

    fn shadow(&self) -> CoreResult<Vec<Shadow>> {
        self.scan()
    }

    fn gshadow(&self) -> CoreResult<Vec<GShadow>> {
        self.scan()
    }

    fn write_passwd(
        &self,
        records: &[User],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        self.engine.write(records, options)
    }

    fn write_group(
        &self,
        records: &[Group],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        self.engine.write(records, options)
    }

    fn write_shadow(
        &self,
        records: &[Shadow],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        self.engine.write(records, options)
    }

    fn write_gshadow(
        &self,
        records: &[GShadow],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        self.engine.write(records, options)
    }

    fn is_locked(&self) -> bool {
        self.engine.is_locked()
    }
}
