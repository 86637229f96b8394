//! The per-kind capability surface backends expose.

use crate::platform::Platform;
use etcfiles_codec::RecordKind;
use serde::Serialize;

/// Read/write availability for one database kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capability {
    /// Whether entries can be read.
    pub read: bool,
    /// Whether the database can be rewritten.
    pub write: bool,
}

impl Capability {
    /// Full read/write access.
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
    };
    /// Read-only access.
    pub const READ_ONLY: Self = Self {
        read: true,
        write: false,
    };
    /// No access.
    pub const NONE: Self = Self {
        read: false,
        write: false,
    };
}

/// A queryable feature of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Reading one database kind.
    Read(RecordKind),
    /// Writing one database kind.
    Write(RecordKind),
    /// The shared advisory lock.
    Locking,
}

/// What one backend can do, consulted before any operation is attempted.
///
/// The write engine fails fast with a typed `Unsupported` error when a
/// capability is absent instead of attempting the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// The backend's platform.
    pub platform: Platform,
    /// User database access.
    pub users: Capability,
    /// Group database access.
    pub groups: Capability,
    /// Shadow database access.
    pub shadow: Capability,
    /// Group shadow database access.
    pub gshadow: Capability,
    /// Whether the shared advisory lock is available.
    pub locking: bool,
}

impl Capabilities {
    /// Full flat-file access: everything readable and writable, locking
    /// available.
    #[must_use]
    pub const fn full(platform: Platform) -> Self {
        Self {
            platform,
            users: Capability::READ_WRITE,
            groups: Capability::READ_WRITE,
            shadow: Capability::READ_WRITE,
            gshadow: Capability::READ_WRITE,
            locking: true,
        }
    }

    /// Read-only user/group access, no shadow databases, no locking.
    /// The shape of the directory-service platforms.
    #[must_use]
    pub const fn read_only(platform: Platform) -> Self {
        Self {
            platform,
            users: Capability::READ_ONLY,
            groups: Capability::READ_ONLY,
            shadow: Capability::NONE,
            gshadow: Capability::NONE,
            locking: false,
        }
    }

    /// Returns the capability for one database kind.
    #[must_use]
    pub const fn for_kind(&self, kind: RecordKind) -> Capability {
        match kind {
            RecordKind::Passwd => self.users,
            RecordKind::Group => self.groups,
            RecordKind::Shadow => self.shadow,
            RecordKind::Gshadow => self.gshadow,
        }
    }

    /// Returns whether a feature is available.
    #[must_use]
    pub const fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Read(kind) => self.for_kind(kind).read,
            Feature::Write(kind) => self.for_kind(kind).write,
            Feature::Locking => self.locking,
        }
    }
}
