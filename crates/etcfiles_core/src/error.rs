//! Error types for core operations.

use crate::platform::Platform;
use etcfiles_codec::ParseError;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while reading or writing account databases.
///
/// Callers are expected to match on the variant, not inspect message text:
/// `NotFound` is an expected, recoverable outcome of a lookup;
/// `Unsupported` is a platform/configuration mismatch; `Permission` is
/// operator-actionable. Nothing is retried automatically — every failure
/// is terminal for the call, and no partial write is ever visible.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A database line failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A proposed record set failed validation.
    #[error("validation failed: {message}")]
    Validation {
        /// What was wrong with the record set.
        message: String,
    },

    /// A lookup found no matching entry.
    #[error("{entity} not found: {identifier}")]
    NotFound {
        /// Entity kind searched ("user", "group", ...).
        entity: &'static str,
        /// The name or id that was looked up.
        identifier: String,
    },

    /// Insufficient filesystem privilege for an operation.
    #[error("permission denied: cannot {operation} {path} (requires {privilege}); {hint}")]
    Permission {
        /// The file the operation targeted.
        path: PathBuf,
        /// The attempted operation ("read" or "write").
        operation: &'static str,
        /// The privilege that would allow it.
        privilege: &'static str,
        /// Platform-specific remediation hint.
        hint: &'static str,
    },

    /// The serialization lock could not be acquired within the timeout.
    #[error("could not acquire lock on {path} within {timeout:?}")]
    Lock {
        /// The lock file path.
        path: PathBuf,
        /// How long acquisition was attempted.
        timeout: Duration,
    },

    /// The operation is not available on the current backend.
    #[error("{operation} is not supported on {platform}")]
    Unsupported {
        /// The attempted operation.
        operation: &'static str,
        /// The platform that lacks it.
        platform: Platform,
    },

    /// The target file changed underneath a write between the change-set
    /// computation and the locked replace.
    #[error("{path} was modified by another process during the write")]
    ConcurrentModification {
        /// The file that drifted.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error for a named lookup.
    pub fn not_found(entity: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            identifier: identifier.into(),
        }
    }

    /// Creates a permission error with the current platform's hint.
    pub fn permission(path: &Path, operation: &'static str) -> Self {
        Self::Permission {
            path: path.to_path_buf(),
            operation,
            privilege: "root",
            hint: Platform::current().permission_hint(),
        }
    }

    /// Creates an unsupported-operation error.
    pub fn unsupported(operation: &'static str, platform: Platform) -> Self {
        Self::Unsupported {
            operation,
            platform,
        }
    }

    /// Creates a concurrent-modification error.
    pub fn concurrent_modification(path: &Path) -> Self {
        Self::ConcurrentModification {
            path: path.to_path_buf(),
        }
    }
}
