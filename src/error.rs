// src/error.rs

//! Unified error handling for the tracker.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted state exists but cannot be read back
    #[error("Corrupt state file {path}: {message}")]
    StateCorrupt { path: String, message: String },

    /// Mail composition or delivery failed
    #[error("Mail error: {0}")]
    Mail(String),

    /// A remote API answered with something unusable
    #[error("API error for {context}: {message}")]
    Api { context: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a state corruption error for the given file.
    pub fn state_corrupt(path: &Path, message: impl fmt::Display) -> Self {
        Self::StateCorrupt {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a mail error.
    pub fn mail(message: impl fmt::Display) -> Self {
        Self::Mail(message.to_string())
    }

    /// Create an API error with context.
    pub fn api(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Api {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_corrupt_message() {
        let err = AppError::state_corrupt(Path::new("state/x.json"), "expected array");
        assert_eq!(
            err.to_string(),
            "Corrupt state file state/x.json: expected array"
        );
    }

    #[test]
    fn test_api_message() {
        let err = AppError::api("langlinks", "missing query");
        assert_eq!(err.to_string(), "API error for langlinks: missing query");
    }
}
