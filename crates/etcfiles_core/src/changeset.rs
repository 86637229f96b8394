//! Change-set computation between the on-disk file and a proposed record set.

use etcfiles_codec::Record;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// How one entry differs between the current file and the proposed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The key exists only in the proposed set.
    Added,
    /// The key exists in both, with different rendered lines.
    Modified,
    /// The key exists only in the current file.
    Removed,
}

/// One entry of a change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// The kind of difference.
    pub kind: ChangeKind,
    /// The primary key (entry name) affected.
    pub key: String,
}

/// Per-kind counts of a change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    /// Number of added entries.
    pub added: usize,
    /// Number of modified entries.
    pub modified: usize,
    /// Number of removed entries.
    pub removed: usize,
}

/// The diff between current file content and a proposed record set.
///
/// Entries are ordered: proposed-set insertion order first (added and
/// modified), then removals in current-file order. The order is for human
/// display only and carries no further guarantee. The change set is
/// diagnostic — writes are full-replace and are never driven by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Computes the diff between `current` (raw file content) and
    /// `proposed` records.
    ///
    /// Blank lines and lines starting with `#` in the current content are
    /// skipped. Proposed records are rendered with the same codec the
    /// write path uses, so diffing and writing cannot disagree. For
    /// duplicate keys, the first occurrence wins on both sides.
    pub fn diff<R: Record>(current: &str, proposed: &[R]) -> Self {
        let current_entries = scan_lines(current);
        let current_index: HashMap<&str, &str> = current_entries.iter().copied().collect();

        let mut proposed_index: HashMap<&str, String> = HashMap::new();
        let mut changes = Vec::new();

        for record in proposed {
            let key = record.key();
            if proposed_index.contains_key(key) {
                continue;
            }
            let line = record.to_line();
            match current_index.get(key) {
                None => changes.push(Change {
                    kind: ChangeKind::Added,
                    key: key.to_string(),
                }),
                Some(existing) if *existing != line.as_str() => changes.push(Change {
                    kind: ChangeKind::Modified,
                    key: key.to_string(),
                }),
                Some(_) => {}
            }
            proposed_index.insert(key, line);
        }

        for (key, _) in current_entries {
            if !proposed_index.contains_key(key) {
                changes.push(Change {
                    kind: ChangeKind::Removed,
                    key: key.to_string(),
                });
            }
        }

        Self { changes }
    }

    /// Returns true if nothing differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of differing entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterates the changes in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    /// Returns per-kind counts.
    #[must_use]
    pub fn summary(&self) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        for change in &self.changes {
            match change.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Modified => summary.modified += 1,
                ChangeKind::Removed => summary.removed += 1,
            }
        }
        summary
    }
}

/// Extracts `(key, line)` pairs from file content, in file order, skipping
/// blanks and comments. Duplicate keys keep only the first occurrence.
fn scan_lines(content: &str) -> Vec<(&str, &str)> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let key = line.split(':').next().unwrap_or(line);
        if seen.insert(key) {
            entries.push((key, line));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use etcfiles_codec::{Group, User};

    fn user(name: &str, uid: u32) -> User {
        User::new(name, "x", uid, uid, "", format!("/home/{name}"), "/bin/sh")
    }

    const CURRENT: &str = "root:x:0:0:root:/root:/bin/bash\n\
                           daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin\n";

    #[test]
    fn identical_sets_produce_no_changes() {
        let proposed = vec![
            User::parse("root:x:0:0:root:/root:/bin/bash").unwrap(),
            User::parse("daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin").unwrap(),
        ];
        let set = ChangeSet::diff(CURRENT, &proposed);
        assert!(set.is_empty());
        assert_eq!(set.summary(), ChangeSummary::default());
    }

    #[test]
    fn add_modify_remove() {
        let proposed = vec![
            // root's shell changed
            User::parse("root:x:0:0:root:/root:/bin/zsh").unwrap(),
            // alice is new
            user("alice", 1000),
            // daemon is gone
        ];
        let set = ChangeSet::diff(CURRENT, &proposed);
        let changes: Vec<_> = set.iter().cloned().collect();
        assert_eq!(
            changes,
            vec![
                Change {
                    kind: ChangeKind::Modified,
                    key: "root".into()
                },
                Change {
                    kind: ChangeKind::Added,
                    key: "alice".into()
                },
                Change {
                    kind: ChangeKind::Removed,
                    key: "daemon".into()
                },
            ]
        );
        assert_eq!(
            set.summary(),
            ChangeSummary {
                added: 1,
                modified: 1,
                removed: 1
            }
        );
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let current = "# header comment\n\nroot:x:0:0:root:/root:/bin/bash\n";
        let set = ChangeSet::diff::<User>(current, &[]);
        let changes: Vec<_> = set.iter().cloned().collect();
        assert_eq!(
            changes,
            vec![Change {
                kind: ChangeKind::Removed,
                key: "root".into()
            }]
        );
    }

    #[test]
    fn empty_current_marks_everything_added() {
        let proposed = vec![user("a", 1), user("b", 2)];
        let set = ChangeSet::diff("", &proposed);
        assert_eq!(
            set.summary(),
            ChangeSummary {
                added: 2,
                modified: 0,
                removed: 0
            }
        );
    }

    #[test]
    fn duplicate_current_keys_first_wins() {
        let current = "g:x:1:root\ng:x:1:admin\n";
        let proposed = vec![Group::new("g", "x", 1, vec!["root".into()])];
        let set = ChangeSet::diff(current, &proposed);
        assert!(set.is_empty());
    }

    #[test]
    fn serializes_for_reporting() {
        let set = ChangeSet::diff("", &[user("a", 1)]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["changes"][0]["kind"], "added");
        assert_eq!(json["changes"][0]["key"], "a");
    }
}
