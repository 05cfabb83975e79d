//! Per-cycle statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What one polling cycle did.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// The page could not be fetched at all
    pub fetch_failed: bool,

    /// New entries detected on the page
    pub found: usize,

    /// Notifications handed to the relay successfully
    pub notified: usize,

    /// Notifications that failed to send
    pub failed: usize,

    /// The seen-set was written to disk
    pub persisted: bool,
}

impl CycleReport {
    pub(crate) fn begin() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            fetch_failed: false,
            found: 0,
            notified: 0,
            failed: 0,
            persisted: false,
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Wall time spent in the cycle, in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
