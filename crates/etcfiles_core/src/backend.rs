//! The backend trait all platform implementations provide.

use crate::capabilities::Capabilities;
use crate::dry_run::DryRunResult;
use crate::engine::WriteOptions;
use crate::error::{CoreError, CoreResult};
use crate::platform::Platform;
use etcfiles_codec::{GShadow, Group, Shadow, User};
use std::fmt;

/// A user lookup, by login name or numeric id. First match in file order
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// Look up by login name.
    Name(String),
    /// Look up by uid.
    Uid(u32),
}

impl fmt::Display for UserQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Uid(uid) => write!(f, "uid {uid}"),
        }
    }
}

impl From<&str> for UserQuery {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<u32> for UserQuery {
    fn from(uid: u32) -> Self {
        Self::Uid(uid)
    }
}

/// A group lookup, by name or numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupQuery {
    /// Look up by group name.
    Name(String),
    /// Look up by gid.
    Gid(u32),
}

impl fmt::Display for GroupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Gid(gid) => write!(f, "gid {gid}"),
        }
    }
}

impl From<&str> for GroupQuery {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<u32> for GroupQuery {
    fn from(gid: u32) -> Self {
        Self::Gid(gid)
    }
}

/// Access to one platform's account databases.
///
/// Reads re-scan the underlying store on every call — nothing is cached,
/// so staleness is bounded by the caller's own call cadence. Lookups
/// return [`CoreError::NotFound`] when nothing matches, which callers
/// treat as an expected outcome, distinct from [`CoreError::Unsupported`]
/// (this platform cannot do that at all) and [`CoreError::Permission`].
///
/// The shadow, gshadow, write, and locking operations default to
/// `Unsupported` so read-only platform backends only implement the four
/// required methods. Implementors with write support must consult their
/// own [`Capabilities`] and keep the two in agreement.
pub trait AccountBackend: Send + Sync + std::fmt::Debug {
    /// Returns the platform this backend serves.
    fn platform(&self) -> Platform;

    /// Returns what this backend can do, per database kind.
    fn capabilities(&self) -> Capabilities;

    /// Reads all user entries, in file order.
    fn users(&self) -> CoreResult<Vec<User>>;

    /// Reads all group entries, in file order.
    fn groups(&self) -> CoreResult<Vec<Group>>;

    /// Reads all shadow entries.
    fn shadow(&self) -> CoreResult<Vec<Shadow>> {
        Err(CoreError::unsupported("shadow access", self.platform()))
    }

    /// Reads all gshadow entries.
    fn gshadow(&self) -> CoreResult<Vec<GShadow>> {
        Err(CoreError::unsupported("gshadow access", self.platform()))
    }

    /// Finds a user by name or uid; first match in file order wins.
    fn find_user(&self, query: &UserQuery) -> CoreResult<User> {
        let users = self.users()?;
        users
            .into_iter()
            .find(|u| match query {
                UserQuery::Name(name) => u.name == *name,
                UserQuery::Uid(uid) => u.uid == *uid,
            })
            .ok_or_else(|| CoreError::not_found("user", query.to_string()))
    }

    /// Finds a group by name or gid; first match in file order wins.
    fn find_group(&self, query: &GroupQuery) -> CoreResult<Group> {
        let groups = self.groups()?;
        groups
            .into_iter()
            .find(|g| match query {
                GroupQuery::Name(name) => g.name == *name,
                GroupQuery::Gid(gid) => g.gid == *gid,
            })
            .ok_or_else(|| CoreError::not_found("group", query.to_string()))
    }

    /// Finds a shadow entry by login name.
    fn find_shadow(&self, name: &str) -> CoreResult<Shadow> {
        let entries = self.shadow()?;
        entries
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CoreError::not_found("shadow entry", name))
    }

    /// Finds a gshadow entry by group name.
    fn find_gshadow(&self, name: &str) -> CoreResult<GShadow> {
        let entries = self.gshadow()?;
        entries
            .into_iter()
            .find(|g| g.name == name)
            .ok_or_else(|| CoreError::not_found("gshadow entry", name))
    }

    /// Replaces the user database with `records`.
    fn write_passwd(
        &self,
        records: &[User],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        let _ = (records, options);
        Err(CoreError::unsupported("passwd writes", self.platform()))
    }

    /// Replaces the group database with `records`.
    fn write_group(
        &self,
        records: &[Group],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        let _ = (records, options);
        Err(CoreError::unsupported("group writes", self.platform()))
    }

    /// Replaces the shadow database with `records`.
    fn write_shadow(
        &self,
        records: &[Shadow],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        let _ = (records, options);
        Err(CoreError::unsupported("shadow writes", self.platform()))
    }

    /// Replaces the gshadow database with `records`.
    fn write_gshadow(
        &self,
        records: &[GShadow],
        options: &WriteOptions,
    ) -> CoreResult<Option<DryRunResult>> {
        let _ = (records, options);
        Err(CoreError::unsupported("gshadow writes", self.platform()))
    }

    /// Returns true if this backend currently holds the serialization
    /// lock.
    fn is_locked(&self) -> bool {
        false
    }
}
