//! Error types for record parsing.

use crate::record::RecordKind;
use thiserror::Error;

/// Result type for codec operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while parsing a database line.
///
/// An empty input line and a structurally short line are distinct
/// conditions: callers that scan whole files skip blank lines before
/// parsing, so `EmptyLine` reaching a caller means a single-record parse
/// was handed no data at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input line was empty.
    #[error("cannot parse empty {kind} line")]
    EmptyLine {
        /// The record kind being parsed.
        kind: RecordKind,
    },

    /// The line has fewer fields than the format requires.
    #[error("invalid {kind} line: expected at least {expected} fields, got {actual}")]
    FieldCount {
        /// The record kind being parsed.
        kind: RecordKind,
        /// Minimum number of fields for this kind.
        expected: usize,
        /// Number of fields actually present.
        actual: usize,
    },

    /// A numeric field holds a non-empty, non-numeric value.
    ///
    /// Empty numeric fields are not an error: they parse to "absent".
    #[error("invalid {kind} line: field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        /// The record kind being parsed.
        kind: RecordKind,
        /// Name of the offending field.
        field: &'static str,
        /// The value that failed to parse.
        value: String,
    },
}

impl ParseError {
    /// Creates a field-count error.
    pub(crate) fn field_count(kind: RecordKind, expected: usize, actual: usize) -> Self {
        Self::FieldCount {
            kind,
            expected,
            actual,
        }
    }

    /// Creates an invalid-number error for a named field.
    pub(crate) fn invalid_number(kind: RecordKind, field: &'static str, value: &str) -> Self {
        Self::InvalidNumber {
            kind,
            field,
            value: value.to_string(),
        }
    }
}
