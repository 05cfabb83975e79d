//! Persistence of the seen-set.
//!
//! One JSON file per monitored page, holding every key already processed:
//!
//! ```text
//! {state_dir}/
//! └── deaths_in_august_2023.json   # ["Jane Doe (Jane_Doe)", ...]
//! ```

pub mod local;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::models::SeenSet;

// Re-export for convenience
pub use local::JsonStateStore;

/// Trait for seen-set storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted set.
    ///
    /// A store that has never been written yields an empty set.
    async fn load(&self) -> Result<SeenSet>;

    /// Replace the persisted set with `seen`.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

/// State file name for a monitored page.
///
/// Uses the last path segment of the page URL, lowercased, with a `.json`
/// extension. Falls back to the host name, then to `state.json`.
pub fn state_file_name(page_url: &str) -> String {
    let parsed = Url::parse(page_url).ok();

    let segment = parsed
        .as_ref()
        .and_then(|u| u.path_segments())
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| s.to_string())
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|u| u.host_str())
                .map(|s| s.to_string())
        });

    match segment {
        Some(stem) => format!("{}.json", sanitize_stem(&stem.to_lowercase())),
        None => "state.json".to_string(),
    }
}

/// Full state file path for a monitored page inside `state_dir`.
pub fn state_file_path(state_dir: &Path, page_url: &str) -> PathBuf {
    state_dir.join(state_file_name(page_url))
}

fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}
