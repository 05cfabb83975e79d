//! Pipeline entry points for tracker operations.
//!
//! - `run_watch`: Poll the monitored page until interrupted
//! - `Tracker::run_cycle`: One fetch, extract, enrich, notify, persist pass

pub mod cycle;
pub mod diff;
pub mod schedule;
pub mod watch;

pub use cycle::Tracker;
pub use diff::{DiffResult, calculate_diff};
pub use schedule::CycleRunner;
pub use watch::run_watch;
