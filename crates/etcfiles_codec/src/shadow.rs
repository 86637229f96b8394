//! Shadow password records (`/etc/shadow` format).

use crate::error::ParseResult;
use crate::record::{fmt_opt_i64, parse_opt_i64, split_fields, Record, RecordKind};
use crate::ParseError;
use serde::{Deserialize, Serialize};

/// Password-aging value meaning "never expires".
const NEVER_EXPIRES_DAYS: i64 = 99_999;

/// One shadow password entry.
///
/// Line format (nine fields):
///
/// ```text
/// name:passwd:last_change:min:max:warn:inactive:expire:reserved
/// ```
///
/// The day-counter fields are days since the epoch or day counts, and any
/// of them may be empty in the source file. An empty field is *absent*
/// (`None`), which is distinct from `0`: both must survive a rewrite
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shadow {
    /// Login name (the primary key).
    pub name: String,
    /// Encrypted password, or a locking marker such as `!` or `*`.
    pub passwd: String,
    /// Days since epoch of the last password change.
    pub last_change: Option<i64>,
    /// Minimum days between password changes.
    pub min_days: Option<i64>,
    /// Maximum days between password changes.
    pub max_days: Option<i64>,
    /// Days before expiry at which to warn the user.
    pub warn_days: Option<i64>,
    /// Days after expiry until the account is disabled.
    pub inactive_days: Option<i64>,
    /// Days since epoch when the account expires.
    pub expire_date: Option<i64>,
    /// Reserved field; empty in the source parses to `None`.
    pub reserved: Option<String>,
}

impl Shadow {
    /// Returns true if the password is locked (`!` prefix or `*`).
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.passwd.starts_with('!') || self.passwd == "*"
    }

    /// Returns whether the password is expired as of `today_days` (days
    /// since the epoch), or `None` when the entry carries no aging data.
    ///
    /// A `max_days` of 99999 means the password never expires.
    #[must_use]
    pub fn is_expired(&self, today_days: i64) -> Option<bool> {
        let (last_change, max_days) = (self.last_change?, self.max_days?);
        if max_days == NEVER_EXPIRES_DAYS {
            return Some(false);
        }
        Some(last_change + max_days < today_days)
    }
}

impl Record for Shadow {
    const KIND: RecordKind = RecordKind::Shadow;
    const MIN_FIELDS: usize = 9;

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
            last_change: parse_opt_i64(Self::KIND, "last_change", parts[2])?,
            min_days: parse_opt_i64(Self::KIND, "min_days", parts[3])?,
            max_days: parse_opt_i64(Self::KIND, "max_days", parts[4])?,
            warn_days: parse_opt_i64(Self::KIND, "warn_days", parts[5])?,
            inactive_days: parse_opt_i64(Self::KIND, "inactive_days", parts[6])?,
            expire_date: parse_opt_i64(Self::KIND, "expire_date", parts[7])?,
            reserved: if parts[8].is_empty() {
                None
            } else {
                Some(parts[8].to_string())
            },
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.name,
            self.passwd,
            fmt_opt_i64(self.last_change),
            fmt_opt_i64(self.min_days),
            fmt_opt_i64(self.max_days),
            fmt_opt_i64(self.warn_days),
            fmt_opt_i64(self.inactive_days),
            fmt_opt_i64(self.expire_date),
            self.reserved.as_deref().unwrap_or("")
        )
    }

    fn key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_full_entry() {
        let shadow = Shadow::parse("alice:$6$salt$hash:19000:0:99999:7:::").unwrap();
        assert_eq!(shadow.name, "alice");
        assert_eq!(shadow.last_change, Some(19000));
        assert_eq!(shadow.min_days, Some(0));
        assert_eq!(shadow.max_days, Some(99999));
        assert_eq!(shadow.warn_days, Some(7));
        assert_eq!(shadow.inactive_days, None);
        assert_eq!(shadow.expire_date, None);
        assert_eq!(shadow.reserved, None);
    }

    #[test]
    fn empty_numeric_fields_round_trip_empty() {
        let line = "daemon:*:18474:0:99999:7:::";
        let shadow = Shadow::parse(line).unwrap();
        assert_eq!(shadow.to_line(), line);
    }

    #[test]
    fn zero_and_absent_are_distinct() {
        let with_zero = Shadow::parse("a:x:0:0:0:0:0:0:").unwrap();
        let absent = Shadow::parse("a:x:::::::").unwrap();
        assert_ne!(with_zero, absent);
        assert_eq!(with_zero.to_line(), "a:x:0:0:0:0:0:0:");
        assert_eq!(absent.to_line(), "a:x:::::::");
    }

    #[test]
    fn short_line_is_an_error() {
        assert_eq!(
            Shadow::parse("alice:x:19000").unwrap_err(),
            ParseError::FieldCount {
                kind: RecordKind::Shadow,
                expected: 9,
                actual: 3,
            }
        );
    }

    #[test]
    fn malformed_day_counter_is_an_error() {
        let err = Shadow::parse("alice:x:soon:0:99999:7:::").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                field: "last_change",
                ..
            }
        ));
    }

    #[test]
    fn locked_detection() {
        assert!(Shadow::parse("a:!hash:::::::").unwrap().is_locked());
        assert!(Shadow::parse("a:*:::::::").unwrap().is_locked());
        assert!(!Shadow::parse("a:$6$x:::::::").unwrap().is_locked());
    }

    #[test]
    fn expiry_detection() {
        let shadow = Shadow::parse("a:x:19000:0:30:7:::").unwrap();
        assert_eq!(shadow.is_expired(19031), Some(true));
        assert_eq!(shadow.is_expired(19010), Some(false));

        let never = Shadow::parse("a:x:19000:0:99999:7:::").unwrap();
        assert_eq!(never.is_expired(999_999), Some(false));

        let unknown = Shadow::parse("a:x:::::::").unwrap();
        assert_eq!(unknown.is_expired(19031), None);
    }

    #[test]
    fn reserved_field_survives() {
        let line = "a:x:19000:0:99999:7:::flag";
        let shadow = Shadow::parse(line).unwrap();
        assert_eq!(shadow.reserved.as_deref(), Some("flag"));
        assert_eq!(shadow.to_line(), line);
    }

    fn opt_day() -> impl Strategy<Value = Option<i64>> {
        prop_oneof![Just(None), (0i64..200_000).prop_map(Some)]
    }

    proptest! {
        #[test]
        fn round_trip_any_valid_line(
            name in "[a-z][a-z0-9_-]{0,15}",
            passwd in "[!*]?[a-zA-Z0-9$./]{0,20}",
            last_change in opt_day(),
            min_days in opt_day(),
            max_days in opt_day(),
            warn_days in opt_day(),
            inactive_days in opt_day(),
            expire_date in opt_day(),
        ) {
            let shadow = Shadow {
                name,
                passwd,
                last_change,
                min_days,
                max_days,
                warn_days,
                inactive_days,
                expire_date,
                reserved: None,
            };
            let reparsed = Shadow::parse(&shadow.to_line()).unwrap();
            prop_assert_eq!(reparsed, shadow);
        }
    }
}
