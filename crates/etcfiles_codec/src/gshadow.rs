//! Group shadow records (`/etc/gshadow` format).

use crate::error::ParseResult;
use crate::record::{parse_list, split_fields, Record, RecordKind};
use crate::ParseError;
use serde::{Deserialize, Serialize};

/// One group shadow entry.
///
/// Line format: `name:passwd:admin1,admin2:member1,member2`. Both lists
/// are comma-joined; empty fields are empty lists. List order is preserved
/// as found in the source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GShadow {
    /// Group name (the primary key).
    pub name: String,
    /// Encrypted group password, or a locking marker.
    pub passwd: String,
    /// Group administrator login names, in source order.
    pub admins: Vec<String>,
    /// Member login names, in source order.
    pub members: Vec<String>,
}

impl GShadow {
    /// Returns true if the group password is locked or disabled
    /// (`!` prefix, bare `!`, or `*`).
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.passwd.starts_with('!') || self.passwd == "*"
    }
}

impl Record for GShadow {
    const KIND: RecordKind = RecordKind::Gshadow;
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
            admins: parse_list(parts[2]),
            members: parse_list(parts[3]),
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.name,
            self.passwd,
            self.admins.join(","),
            self.members.join(",")
        )
    }

    fn key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_both_lists() {
        let gshadow = GShadow::parse("wheel:!:root:root,admin").unwrap();
        assert_eq!(gshadow.admins, vec!["root"]);
        assert_eq!(gshadow.members, vec!["root", "admin"]);
    }

    #[test]
    fn empty_lists_round_trip() {
        let line = "nogroup:!::";
        let gshadow = GShadow::parse(line).unwrap();
        assert!(gshadow.admins.is_empty());
        assert!(gshadow.members.is_empty());
        assert_eq!(gshadow.to_line(), line);
    }

    #[test]
    fn list_order_is_preserved() {
        let line = "staff:!:carol,alice:zed,bob";
        assert_eq!(GShadow::parse(line).unwrap().to_line(), line);
    }

    #[test]
    fn short_line_is_an_error() {
        assert_eq!(
            GShadow::parse("wheel:!:root").unwrap_err(),
            ParseError::FieldCount {
                kind: RecordKind::Gshadow,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn locked_detection() {
        assert!(GShadow::parse("a:!::").unwrap().is_locked());
        assert!(GShadow::parse("a:!hash::").unwrap().is_locked());
        assert!(GShadow::parse("a:*::").unwrap().is_locked());
        assert!(!GShadow::parse("a:hash::").unwrap().is_locked());
    }
}
