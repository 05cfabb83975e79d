// src/config.rs

//! Configuration loading utilities.
//!
//! Reads the TOML file, layers environment overrides on top and validates
//! the result before anything touches the network.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load, override and validate the configuration.
///
/// A missing file falls back to the built-in defaults; a file that exists
/// but cannot be read or parsed is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        log::info!("No config file at {}, using defaults", path.display());
        Config::default()
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}
