//! deathwatch CLI
//!
//! Polls a deaths list page and mails a summary for every new entry.
//! Runs with no arguments; every flag has a default.

use std::path::PathBuf;

use clap::Parser;
use deathwatch::{config::load_config, error::Result, models::Config, pipeline};

/// deathwatch - Deaths list tracker
#[derive(Parser, Debug)]
#[command(
    name = "deathwatch",
    version,
    about = "Watches a deaths list page and mails new entries"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "deathwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    validate: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up before the full load so config warnings are visible.
    let level = Config::load(&cli.config)
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
    };

    if cli.validate {
        log::info!("✓ Config OK ({})", cli.config.display());
        log::info!("State file: {}", config.state_path().display());
        log::info!(
            "Mail delivery: {}",
            if config.mail.enabled {
                "enabled"
            } else {
                "disabled (log only)"
            }
        );
        return Ok(());
    }

    let max_cycles = cli.once.then_some(1);
    if let Err(e) = pipeline::run_watch(&config, max_cycles).await {
        log::error!("Tracker could not start: {}", e);
        return Err(e);
    }

    Ok(())
}
