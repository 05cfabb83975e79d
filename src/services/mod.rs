//! Service layer for the tracker.
//!
//! This module contains the I/O wrappers driven by the polling loop:
//! - Page fetching (`PageFetcher`)
//! - List item extraction (`ListExtractor`)
//! - Translation and summary lookup (`Enricher`)
//! - Notification delivery (`Notifier`)

mod enricher;
mod extractor;
mod fetcher;
pub mod notifier;

pub use enricher::{Enricher, SummaryLookup};
pub use extractor::ListExtractor;
pub use fetcher::PageFetcher;
pub use notifier::{LogNotifier, Notification, Notifier, SmtpNotifier, compose};
