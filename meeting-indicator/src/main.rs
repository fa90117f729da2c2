use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meeting_indicator::display::SimulatedLcd;
use meeting_indicator::shutdown::{self, ShutdownHooks};
use meeting_indicator::{build_evaluator, IndicatorConfig, IndicatorScheduler};

#[derive(Debug, Parser)]
#[command(name = "meeting-indicator", about = "Show calendar busy/free status on a desk display")]
struct Cli {
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, env = "MEETING_INDICATOR_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meeting_indicator=debug,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }
    let config = IndicatorConfig::from_env()?;

    tracing::info!(
        "Starting meeting indicator (hours {}-{} {}, lookahead {} min)",
        config.working_hours.start,
        config.working_hours.end,
        config.working_hours.timezone,
        config.lookahead.num_minutes()
    );

    let display = Arc::new(SimulatedLcd::new());
    let evaluator = Arc::new(
        build_evaluator(&config, display.clone()).context("Failed to build status evaluator")?,
    );
    let hooks = ShutdownHooks::new().power_off_on_exit(display);

    if cli.once {
        let report = evaluator.tick().await;
        tracing::info!("Single cycle finished: {:?}", report);
        hooks.run().await;
        return Ok(());
    }

    let scheduler = IndicatorScheduler::new(evaluator, config.tick_interval);

    // Start the periodic trigger
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run().await;
    });

    // Wait for shutdown signal
    tracing::info!("Meeting indicator running. Press Ctrl+C to stop.");
    shutdown::wait_for_signal().await?;
    tracing::info!("Shutdown signal received, stopping...");

    // Graceful shutdown: stop ticking before anything else touches the display
    scheduler_handle.abort();
    let _ = scheduler_handle.await;
    hooks.run().await;

    tracing::info!("Meeting indicator stopped");
    Ok(())
}
