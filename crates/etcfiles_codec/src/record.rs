//! The record trait and shared parsing helpers.

use crate::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four account database kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// User accounts (`/etc/passwd`).
    Passwd,
    /// Groups (`/etc/group`).
    Group,
    /// Shadow password entries (`/etc/shadow`).
    Shadow,
    /// Group shadow entries (`/etc/gshadow`).
    Gshadow,
}

impl RecordKind {
    /// Returns the conventional name of this database kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passwd => "passwd",
            Self::Group => "group",
            Self::Shadow => "shadow",
            Self::Gshadow => "gshadow",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured entry of an account database.
///
/// Implementors provide bidirectional conversion between the structured
/// form and the colon-delimited on-disk line. `to_line` is the exact
/// inverse of `parse`: an unmutated record reproduces its source line
/// byte-for-byte.
pub trait Record: Sized {
    /// The database kind this record belongs to.
    const KIND: RecordKind;

    /// Minimum number of colon-separated fields a valid line must have.
    const MIN_FIELDS: usize;

    /// Parses one line into a record.
    ///
    /// The trailing newline, if present, is ignored. Trailing empty fields
    /// are significant: `"a:b:"` has three fields, not two.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is empty, has fewer than
    /// [`Self::MIN_FIELDS`] fields, or a numeric field holds a non-empty,
    /// non-numeric value.
    fn parse(line: &str) -> ParseResult<Self>;

    /// Serializes this record to its on-disk line, without a trailing
    /// newline.
    fn to_line(&self) -> String;

    /// Returns the primary key of this record (the entry name).
    fn key(&self) -> &str;
}

/// Splits a line into colon-separated fields, preserving trailing empties.
///
/// Fails on empty input so callers never mistake a blank line for a record.
pub(crate) fn split_fields(kind: RecordKind, line: &str) -> ParseResult<Vec<&str>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(ParseError::EmptyLine { kind });
    }
    // str::split keeps trailing empty substrings, which the formats require.
    Ok(line.split(':').collect())
}

/// Parses an optional numeric field: empty means "absent", not zero.
pub(crate) fn parse_opt_i64(
    kind: RecordKind,
    field: &'static str,
    value: &str,
) -> ParseResult<Option<i64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ParseError::invalid_number(kind, field, value))
}

/// Parses a required numeric id field (uid/gid).
pub(crate) fn parse_id(kind: RecordKind, field: &'static str, value: &str) -> ParseResult<u32> {
    value
        .parse::<u32>()
        .map_err(|_| ParseError::invalid_number(kind, field, value))
}

/// Serializes an optional numeric field: absent serializes to empty.
pub(crate) fn fmt_opt_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Parses a comma-joined list field.
///
/// An empty field is an empty list, never a list of one empty string.
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split(',').map(str::to_string).collect()
    }
}
