//! Test fixtures: sample database content and temp-directory layouts.

use etcfiles_core::{FilesBackend, FilesConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A small but realistic user database.
pub const PASSWD_SAMPLE: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
bin:x:2:2:bin:/bin:/usr/sbin/nologin
alice:x:1000:1000:Alice,,,:/home/alice:/bin/bash
bob:x:1001:1001::/home/bob:/bin/zsh
";

/// Groups matching [`PASSWD_SAMPLE`].
pub const GROUP_SAMPLE: &str = "\
root:x:0:
daemon:x:1:
wheel:x:10:root,alice
alice:x:1000:
bob:x:1001:
nogroup:x:65534:
";

/// Shadow entries matching [`PASSWD_SAMPLE`].
pub const SHADOW_SAMPLE: &str = "\
root:*:19000:0:99999:7:::
daemon:*:19000:0:99999:7:::
bin:*:19000:0:99999:7:::
alice:$6$rounds=656000$salt$hash:19400:0:99999:7:::
bob:!locked:19400:0:99999:7:::
";

/// Group shadow entries matching [`GROUP_SAMPLE`].
pub const GSHADOW_SAMPLE: &str = "\
root:!::
wheel:!:root:root,alice
nogroup:!::
";

/// A temporary account database directory with automatic cleanup.
///
/// Holds the [`TempDir`] alive for the fixture's lifetime; the four
/// database files use the conventional names so backups and lock files
/// land next to them exactly as they would under `/etc`.
pub struct TestFiles {
    dir: TempDir,
    config: FilesConfig,
}

impl TestFiles {
    /// Creates an empty database directory: no files exist yet.
    #[must_use]
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp directory");
        let config = FilesConfig::in_dir(dir.path());
        Self { dir, config }
    }

    /// Creates a database directory seeded with the sample content.
    #[must_use]
    pub fn seeded() -> Self {
        let fixture = Self::empty();
        fs::write(&fixture.config.passwd, PASSWD_SAMPLE).expect("failed to seed passwd");
        fs::write(&fixture.config.group, GROUP_SAMPLE).expect("failed to seed group");
        fs::write(&fixture.config.shadow, SHADOW_SAMPLE).expect("failed to seed shadow");
        fs::write(&fixture.config.gshadow, GSHADOW_SAMPLE).expect("failed to seed gshadow");
        fixture
    }

    /// Returns the directory holding the database files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the file layout for this fixture.
    #[must_use]
    pub fn config(&self) -> &FilesConfig {
        &self.config
    }

    /// Creates a flat-file backend over this fixture.
    #[must_use]
    pub fn backend(&self) -> FilesBackend {
        FilesBackend::new(self.config.clone())
    }

    /// Reads a database file's raw content; missing reads as empty.
    #[must_use]
    pub fn raw(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }
}
