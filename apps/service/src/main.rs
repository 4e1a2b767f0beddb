use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{debug, error, info};

mod config;
mod endpoints;
mod error;
mod monitoring;
mod validation;

use config::Settings;
use error::ConfigError;
use monitoring::{HttpProber, MonitoringScheduler, RoundExecutor};

#[derive(Parser)]
#[command(name = "uppe-monitor")]
#[command(about = "Monitor the availability of endpoints based on a YAML configuration file.")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file.
    config_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = Settings::load();
    match &settings {
        Ok(settings) => logger::init_with(settings.log_format(), settings.log_level()),
        Err(_) => logger::init(),
    }

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: Result<Settings, ConfigError>) -> Result<()> {
    let settings = settings?;
    debug!("{settings}");

    let endpoints = endpoints::load_endpoints(&cli.config_file)?;
    info!(count = endpoints.len(), "Monitoring endpoints from {}", cli.config_file.display());

    let prober = HttpProber::new(settings.request_timeout())?;
    let scheduler =
        MonitoringScheduler::new(RoundExecutor::new(Arc::new(prober)), settings.interval());

    let aggregator = scheduler.run(&endpoints, shutdown_signal()).await?;

    info!("Monitoring stopped by user.");
    if aggregator.is_empty() {
        info!("No round completed before shutdown");
    }
    for line in aggregator.report() {
        if let Some(stats) = aggregator.stats(line.domain) {
            info!(domain = line.domain, up = stats.up, total = stats.total, "Final: {line}");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C, monitoring until killed: {e}");
        std::future::pending::<()>().await;
    }
}
