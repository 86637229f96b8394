//! The result of a dry-run write.

use crate::changeset::ChangeSet;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// An immutable summary of a would-be write.
///
/// Produced when a write is requested with `dry_run` set: the engine
/// renders the content, computes the change set, and runs validation, but
/// acquires no lock and mutates no file. Everything a caller needs to
/// decide whether to proceed is captured here.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunResult {
    content: String,
    path: PathBuf,
    changes: ChangeSet,
    warnings: Vec<String>,
    errors: Vec<String>,
    entry_count: usize,
}

impl DryRunResult {
    /// Creates a result. Used by the write engine.
    #[must_use]
    pub(crate) fn new(
        content: String,
        path: PathBuf,
        changes: ChangeSet,
        warnings: Vec<String>,
        errors: Vec<String>,
        entry_count: usize,
    ) -> Self {
        Self {
            content,
            path,
            changes,
            warnings,
            errors,
            entry_count,
        }
    }

    /// The exact content the write would produce.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The file the write would replace.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The computed change set.
    #[must_use]
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Non-fatal validation findings.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Fatal validation findings. A real write with any of these would
    /// have been rejected.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of entries the write would contain.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Returns true if validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there are warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// A human-readable summary of the would-be write.
    #[must_use]
    pub fn summary(&self) -> String {
        let status = if self.is_valid() { "VALID" } else { "INVALID" };
        let counts = self.changes.summary();
        let mut parts = vec![
            format!(
                "[{status}] would write {} entries to {}",
                self.entry_count,
                self.path.display()
            ),
            format!(
                "changes: {} added, {} modified, {} removed",
                counts.added, counts.modified, counts.removed
            ),
        ];
        if self.has_warnings() {
            parts.push(format!("warnings: {}", self.warnings.len()));
        }
        if !self.is_valid() {
            parts.push(format!("errors: {}", self.errors.len()));
        }
        parts.join("\n")
    }

    /// The would-be content with line numbers, truncated to `limit` lines
    /// when given.
    #[must_use]
    pub fn preview(&self, limit: Option<usize>) -> String {
        self.content
            .lines()
            .take(limit.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(i, line)| format!("{}: {line}\n", i + 1))
            .collect()
    }
}

impl fmt::Display for DryRunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
