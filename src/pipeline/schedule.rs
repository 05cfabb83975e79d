// src/pipeline/schedule.rs

//! Tick-driven polling loop.
//!
//! A `tokio::time::interval` decides when the next cycle starts; the first
//! tick fires immediately. The loop ends after `max_cycles` cycles when a
//! limit is given, or on Ctrl-C. A Ctrl-C received mid-cycle takes effect
//! once that cycle finishes.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, MissedTickBehavior};

use crate::models::CycleReport;
use crate::utils::log as banner;

/// Something that can run one polling cycle.
#[async_trait]
pub trait CycleRunner: Send {
    async fn run_cycle(&mut self) -> CycleReport;
}

/// Drive `runner` every `interval` until `max_cycles` or Ctrl-C.
/// Returns the number of cycles run.
pub async fn run<R>(runner: &mut R, interval: Duration, max_cycles: Option<usize>) -> usize
where
    R: CycleRunner + ?Sized,
{
    run_until(runner, interval, max_cycles, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Drive `runner` every `interval` until `max_cycles` or `shutdown` resolves.
///
/// `shutdown` lives for the whole loop, so a signal that arrives while a
/// cycle is running stops the loop before the next one starts.
pub async fn run_until<R, F>(
    runner: &mut R,
    interval: Duration,
    max_cycles: Option<usize>,
    shutdown: F,
) -> usize
where
    R: CycleRunner + ?Sized,
    F: Future<Output = ()>,
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                log::info!("Interrupted, stopping after {} cycles", cycles);
                break;
            }
            _ = ticker.tick() => {}
        }

        let report = runner.run_cycle().await;
        cycles += 1;
        log_report(cycles, &report);

        if max_cycles.is_some_and(|max| cycles >= max) {
            break;
        }
        log::info!("Next check in {} seconds", interval.as_secs());
    }

    cycles
}

fn log_report(cycle: usize, report: &CycleReport) {
    if report.found == 0 && !report.fetch_failed {
        log::debug!("Cycle {} finished in {} ms", cycle, report.elapsed_ms());
        return;
    }

    banner::summary(
        &format!("Cycle {cycle}"),
        &[
            ("Fetch failed", report.fetch_failed.to_string()),
            ("New entries", report.found.to_string()),
            ("Notified", report.notified.to_string()),
            ("Failed", report.failed.to_string()),
            ("State saved", report.persisted.to_string()),
            ("Elapsed", format!("{} ms", report.elapsed_ms())),
        ],
    );
}
