//! Platform identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system families relevant to account database access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux: full flat-file read/write access.
    Linux,
    /// macOS: directory services own the account database.
    MacOs,
    /// Windows: accounts live in SAM, not flat files.
    Windows,
    /// Anything else.
    Unknown,
}

impl Platform {
    /// Returns the platform this process is running on.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Returns the conventional lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        }
    }

    /// Returns an operator-facing hint for resolving permission failures
    /// on this platform.
    #[must_use]
    pub const fn permission_hint(self) -> &'static str {
        match self {
            Self::Linux => "try running with sudo or as root",
            Self::MacOs => "try running with sudo; user management may require dscl",
            Self::Windows => "run as Administrator; flat-file writes are not supported",
            Self::Unknown => "check your permissions",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
