// src/models/entry.rs

//! Detected list entries and the set of keys already processed.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one list entry: `"{display name} ({article id})"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenKey(String);

impl SeenKey {
    /// Build the key from a display name and an article identifier.
    pub fn new(name: &str, article_id: &str) -> Self {
        Self(format!("{name} ({article_id})"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SeenKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for SeenKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for SeenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every key processed so far for one monitored page.
///
/// Keys are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    keys: HashSet<SeenKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &SeenKey) -> bool {
        self.keys.contains(key)
    }

    /// Record a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: SeenKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeenKey> {
        self.keys.iter()
    }

    /// Keys in lexical order, for stable on-disk output.
    pub fn sorted(&self) -> Vec<&SeenKey> {
        let mut keys: Vec<&SeenKey> = self.keys.iter().collect();
        keys.sort();
        keys
    }
}

impl FromIterator<SeenKey> for SeenSet {
    fn from_iter<I: IntoIterator<Item = SeenKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl Extend<SeenKey> for SeenSet {
    fn extend<I: IntoIterator<Item = SeenKey>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

/// One list item found on the monitored page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedEntry {
    /// Item text up to the first citation bracket
    pub name: String,

    /// Article path segment after `/wiki/`
    pub article_id: String,

    /// Absolute URL of the linked article
    pub source_url: String,

    pub key: SeenKey,
}

impl DetectedEntry {
    pub fn new(name: impl Into<String>, article_id: impl Into<String>, source_url: impl Into<String>) -> Self {
        let name = name.into();
        let article_id = article_id.into();
        let key = SeenKey::new(&name, &article_id);
        Self {
            name,
            article_id,
            source_url: source_url.into(),
            key,
        }
    }
}

/// Lookup results attached to an entry before it is announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSummary {
    /// Target-language article URL if one exists, else the source URL
    pub url: String,

    /// Canonical article title, or the display name as fallback
    pub title: String,

    /// Short plain-text excerpt or the placeholder text
    pub summary: String,
}
