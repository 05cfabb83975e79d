//! Local filesystem storage implementation.
//!
//! The seen-set is stored as a pretty-printed JSON array of strings, sorted
//! so that successive writes produce small textual diffs. Writes go to a
//! sibling temp file first and are renamed into place, so a reader never
//! sees a half-written file in the common case.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{SeenKey, SeenSet};
use crate::storage::{StateStore, state_file_path};

/// JSON file storage backend.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for a monitored page inside `state_dir`.
    pub fn for_page(state_dir: &Path, page_url: &str) -> Self {
        Self::new(state_file_path(state_dir, page_url))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<SeenSet> {
        let Some(bytes) = self.read_bytes().await? else {
            log::info!(
                "No state file at {}, starting with an empty set",
                self.path.display()
            );
            return Ok(SeenSet::new());
        };

        let keys: Vec<String> = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::state_corrupt(&self.path, e))?;

        Ok(keys.into_iter().map(SeenKey::from).collect())
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&seen.sorted())?;
        self.write_bytes(&bytes).await?;
        log::debug!("Saved {} keys to {}", seen.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_set() -> SeenSet {
        [
            "Jane Doe (Jane_Doe)",
            "Иван Петров (Ivan_Petrov)",
            "François Dupont (Fran%C3%A7ois_Dupont)",
        ]
        .into_iter()
        .map(SeenKey::from)
        .collect()
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("nope.json"));

        let seen = store.load().await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));
        let seen = sample_set();

        store.save(&seen).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, seen);
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));

        store.save(&sample_set()).await.unwrap();
        let smaller: SeenSet = ["Only (Only)"].into_iter().map(SeenKey::from).collect();
        store.save(&smaller).await.unwrap();

        assert_eq!(store.load().await.unwrap(), smaller);
        assert!(!tmp.path().join("state.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::for_page(
            &tmp.path().join("nested/state"),
            "https://en.wikipedia.org/wiki/Deaths_in_August_2023",
        );

        store.save(&sample_set()).await.unwrap();
        assert!(
            tmp.path()
                .join("nested/state/deaths_in_august_2023.json")
                .exists()
        );
    }

    #[tokio::test]
    async fn test_file_is_sorted_json_array() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStateStore::new(tmp.path().join("state.json"));
        let seen: SeenSet = ["b (b)", "a (a)"].into_iter().map(SeenKey::from).collect();

        store.save(&seen).await.unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let keys: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(keys, vec!["a (a)", "b (b)"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let err = JsonStateStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, AppError::StateCorrupt { .. }));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, br#"{"keys": []}"#).unwrap();

        let err = JsonStateStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, AppError::StateCorrupt { .. }));
    }
}
