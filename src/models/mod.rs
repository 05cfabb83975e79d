// src/models/mod.rs

//! Domain models for the tracker.
//!
//! This module contains the data structures shared by the services and
//! the polling pipeline.

mod config;
mod entry;
mod report;

// Re-export all public types
pub use config::{
    Config, EnrichmentConfig, HttpConfig, LoggingConfig, MailConfig, MailSecurity, MonitorConfig,
    StorageConfig, ENV_SMTP_PASSWORD, ENV_SMTP_USERNAME,
};
pub use entry::{DetectedEntry, EnrichedSummary, SeenKey, SeenSet};
pub use report::CycleReport;
