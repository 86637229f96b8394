//! Group records (`/etc/group` format).

use crate::error::ParseResult;
use crate::record::{parse_id, parse_list, split_fields, Record, RecordKind};
use crate::ParseError;
use serde::{Deserialize, Serialize};

/// One group entry.
///
/// Line format: `name:passwd:gid:member1,member2,...`. The member list is
/// comma-joined; an empty fourth field is an empty member list. Member
/// order is preserved exactly as found in the source line and is never
/// normalized on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name (the primary key).
    pub name: String,
    /// Group password placeholder, usually `x` or empty.
    pub passwd: String,
    /// Numeric group id.
    pub gid: u32,
    /// Member login names, in source order.
    pub members: Vec<String>,
}

impl Group {
    /// Creates a group with the given members.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        passwd: impl Into<String>,
        gid: u32,
        members: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passwd: passwd.into(),
            gid,
            members,
        }
    }

    /// Returns true if `user` is listed as a member.
    #[must_use]
    pub fn has_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }
}

impl Record for Group {
    const KIND: RecordKind = RecordKind::Group;
    const MIN_FIELDS: usize = 4;

    fn parse(line: &str) -> ParseResult<Self> {
        let parts = split_fields(Self::KIND, line)?;
        if parts.len() < Self::MIN_FIELDS {
            return Err(ParseError::field_count(
                Self::KIND,
                Self::MIN_FIELDS,
                parts.len(),
            ));
        }

        Ok(Self {
            name: parts[0].to_string(),
            passwd: parts[1].to_string(),
            gid: parse_id(Self::KIND, "gid", parts[2])?,
            members: parse_list(parts[3]),
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.name,
            self.passwd,
            self.gid,
            self.members.join(",")
        )
    }

    fn key(&self) -> &str {
        &self.name
    }
}
