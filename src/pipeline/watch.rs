// src/pipeline/watch.rs

//! Tracker entry point.

use std::time::Duration;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::cycle::Tracker;
use crate::pipeline::schedule;
use crate::utils::log as banner;

/// Start watching the configured page.
///
/// Returns an error only when the tracker cannot start, e.g. a corrupt
/// state file. With `max_cycles` set, returns after that many cycles.
pub async fn run_watch(config: &Config, max_cycles: Option<usize>) -> Result<()> {
    banner::header("Deaths list tracker starting");
    banner::sub_item(&format!("Monitored URL: {}", config.monitor.page_url));
    banner::sub_item(&format!(
        "Check interval: {} s",
        config.monitor.poll_interval_secs
    ));
    banner::sub_item(&format!(
        "Preferred language: {}",
        config.enrichment.target_lang
    ));

    let mut tracker = Tracker::from_config(config).await?;
    let interval = Duration::from_secs(config.monitor.poll_interval_secs);
    let cycles = schedule::run(&mut tracker, interval, max_cycles).await;

    banner::separator();
    log::info!(
        "Stopped after {} cycles, {} entries known",
        cycles,
        tracker.seen().len()
    );

    Ok(())
}
