//! User account records (`/etc/passwd` format).

use crate::error::ParseResult;
use crate::record::{fmt_opt_i64, parse_id, parse_opt_i64, split_fields, Record, RecordKind};
use crate::ParseError;
use serde::{Deserialize, Serialize};

/// One user account entry.
///
/// The standard POSIX line carries seven fields:
///
/// ```text
/// name:passwd:uid:gid:gecos:dir:shell
/// ```
///
/// macOS extends the format to ten fields, inserting the login class and
/// two password-aging timestamps before the gecos field. That variant is
/// modeled as a tagged [`UserExtension`] rather than a flat struct of
/// fields that are meaningless elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name (the primary key).
    pub name: String,
    /// Password placeholder, usually `x` on systems with shadow files.
    pub passwd: String,
    /// Numeric user id.
    pub uid: u32,
    /// Numeric primary group id.
    pub gid: u32,
    /// User information field (full name, contact, ...).
    pub gecos: String,
    /// Home directory path.
    pub dir: String,
    /// Login shell path.
    pub shell: String,
    /// Platform-specific extension fields, if the source line carried them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<UserExtension>,
}

/// Platform-specific user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum UserExtension {
    /// The macOS ten-field form: login class and password aging times.
    MacOs {
        /// Login class; empty on most entries.
        class: String,
        /// Last password change time, seconds since epoch; empty means unset.
        change: Option<i64>,
        /// Account expiration time, seconds since epoch; empty means unset.
        expire: Option<i64>,
    },
}

impl User {
    /// Creates a standard seven-field user with no platform extension.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        passwd: impl Into<String>,
        uid: u32,
        gid: u32,
        gecos: impl Into<String>,
        dir: impl Into<String>,
        shell: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passwd: passwd.into(),
            uid,
            gid,
            gecos: gecos.into(),
            dir: dir.into(),
            shell: shell.into(),
            extension: None,
        }
    }

    /// Returns the home directory (alias for the `dir` field).
    #[must_use]
    pub fn home(&self) -> &str {
        &self.dir
    }
}

impl Record for User {
    const KIND: RecordKind = RecordKind::Passwd;
    const MIN_FIELDS: usize = 7;

    fn parse(line: &str) -> ParseResult<Self> {
        let parts = split_fields(Self::KIND, line)?;

        if parts.len() >= 10 {
            // macOS extended form:
            // name:passwd:uid:gid:class:change:expire:gecos:dir:shell
            Ok(Self {
                name: parts[0].to_string(),
                passwd: parts[1].to_string(),
                uid: parse_id(Self::KIND, "uid", parts[2])?,
                gid: parse_id(Self::KIND, "gid", parts[3])?,
                extension: Some(UserExtension::MacOs {
                    class: parts[4].to_string(),
                    change: parse_opt_i64(Self::KIND, "change", parts[5])?,
                    expire: parse_opt_i64(Self::KIND, "expire", parts[6])?,
                }),
                gecos: parts[7].to_string(),
                dir: parts[8].to_string(),
                shell: parts[9].to_string(),
            })
        } else if parts.len() >= Self::MIN_FIELDS {
            Ok(Self {
                name: parts[0].to_string(),
                passwd: parts[1].to_string(),
                uid: parse_id(Self::KIND, "uid", parts[2])?,
                gid: parse_id(Self::KIND, "gid", parts[3])?,
                gecos: parts[4].to_string(),
                dir: parts[5].to_string(),
                shell: parts[6].to_string(),
                extension: None,
            })
        } else {
            Err(ParseError::field_count(
                Self::KIND,
                Self::MIN_FIELDS,
                parts.len(),
            ))
        }
    }

    fn to_line(&self) -> String {
        match &self.extension {
            Some(UserExtension::MacOs {
                class,
                change,
                expire,
            }) => format!(
                "{}:{}:{}:{}:{}:{}:{}:{}:{}:{}",
                self.name,
                self.passwd,
                self.uid,
                self.gid,
                class,
                fmt_opt_i64(*change),
                fmt_opt_i64(*expire),
                self.gecos,
                self.dir,
                self.shell
            ),
            None => format!(
                "{}:{}:{}:{}:{}:{}:{}",
                self.name, self.passwd, self.uid, self.gid, self.gecos, self.dir, self.shell
            ),
        }
    }

    fn key(&self) -> &str {
        &self.name
    }
}
