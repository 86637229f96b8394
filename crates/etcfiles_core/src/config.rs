//! Database file layout configuration.

use etcfiles_codec::RecordKind;
use std::path::{Path, PathBuf};

/// Paths of the four database files and the shared lock file.
///
/// Defaults to the conventional `/etc` layout. Tests and tools operating
/// on alternate roots (chroots, container images) build a layout with
/// [`FilesConfig::in_dir`] or the individual setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesConfig {
    /// Path of the user database.
    pub passwd: PathBuf,
    /// Path of the shadow password database.
    pub shadow: PathBuf,
    /// Path of the group database.
    pub group: PathBuf,
    /// Path of the group shadow database.
    pub gshadow: PathBuf,
    /// Path of the lock file guarding all four databases.
    pub lock: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            passwd: PathBuf::from("/etc/passwd"),
            shadow: PathBuf::from("/etc/shadow"),
            group: PathBuf::from("/etc/group"),
            gshadow: PathBuf::from("/etc/gshadow"),
            lock: PathBuf::from("/etc/.pwd.lock"),
        }
    }
}

impl FilesConfig {
    /// Creates the default `/etc` layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layout with all five files under `dir`, using the
    /// conventional file names.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            passwd: dir.join("passwd"),
            shadow: dir.join("shadow"),
            group: dir.join("group"),
            gshadow: dir.join("gshadow"),
            lock: dir.join(".pwd.lock"),
        }
    }

    /// Sets the user database path.
    #[must_use]
    pub fn passwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd = path.into();
        self
    }

    /// Sets the shadow database path.
    #[must_use]
    pub fn shadow(mut self, path: impl Into<PathBuf>) -> Self {
        self.shadow = path.into();
        self
    }

    /// Sets the group database path.
    #[must_use]
    pub fn group(mut self, path: impl Into<PathBuf>) -> Self {
        self.group = path.into();
        self
    }

    /// Sets the group shadow database path.
    #[must_use]
    pub fn gshadow(mut self, path: impl Into<PathBuf>) -> Self {
        self.gshadow = path.into();
        self
    }

    /// Sets the lock file path.
    #[must_use]
    pub fn lock(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock = path.into();
        self
    }

    /// Returns the file path for a database kind.
    #[must_use]
    pub fn path(&self, kind: RecordKind) -> &Path {
        match kind {
            RecordKind::Passwd => &self.passwd,
            RecordKind::Shadow => &self.shadow,
            RecordKind::Group => &self.group,
            RecordKind::Gshadow => &self.gshadow,
        }
    }
}

/// Returns the permission bits written for a database kind.
///
/// The world-readable databases get `0644`; the shadow databases are
/// restricted to `0640`.
#[must_use]
pub const fn file_mode(kind: RecordKind) -> u32 {
    match kind {
        RecordKind::Passwd | RecordKind::Group => 0o644,
        RecordKind::Shadow | RecordKind::Gshadow => 0o640,
    }
}
