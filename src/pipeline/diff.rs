//! Diff between the entries on the page and the keys already processed.
//!
//! Only additions matter: keys never leave the seen-set, and an entry that
//! disappears from the page is simply no longer reported.

use crate::models::{DetectedEntry, SeenSet};

/// Entries split by whether their key was processed before.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Entries whose key is not in the seen-set, in page order
    pub added: Vec<DetectedEntry>,
    /// Number of entries skipped because their key was already seen
    pub already_seen: usize,
}

impl DiffResult {
    /// Check if there are any new entries.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
    }

    /// Total entries considered.
    pub fn total(&self) -> usize {
        self.added.len() + self.already_seen
    }
}

/// Calculate which of the page entries are new.
///
/// Page order is preserved and entries are not deduplicated against each
/// other: the same key listed twice on one page is reported twice.
pub fn calculate_diff(current: Vec<DetectedEntry>, seen: &SeenSet) -> DiffResult {
    let mut result = DiffResult::default();
    for entry in current {
        if seen.contains(&entry.key) {
            result.already_seen += 1;
        } else {
            result.added.push(entry);
        }
    }
    result
}
