#![warn(clippy::all)]

mod cli;
mod config;
mod error;
mod monitoring;
mod notification;
mod validation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use cli::{Cli, Command, ConfigArgs, RunArgs};
use config::{Config, Settings};
use monitoring::{HttpChecker, MonitoringExecutor, MonitoringScheduler};
use notification::Dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    env_file_loaded(dotenvy::dotenv())?;

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Config(args) => config_command(args),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let file = Config::from_config(args.config.as_deref())?;
    let (level, format) = file.logging.resolve()?;
    logger::init(level, format);

    let settings = Settings::resolve(args.into(), &file.global).context("invalid configuration")?;
    announce(&settings);

    let executor = MonitoringExecutor::new(
        Arc::new(HttpChecker::new()?),
        Dispatcher::from_config(&settings.notifications, settings.notify_timeout)?,
        settings.target.clone(),
        settings.policy.clone(),
    );
    let mut scheduler = MonitoringScheduler::new(executor, settings.interval);

    // Signals are watched on their own task; the scheduler sees them between cycles.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    scheduler
        .run(async {
            let _ = shutdown_rx.await;
        })
        .await;

    info!(cycles = scheduler.cycles(), state = ?scheduler.state(), "Health checker stopped");
    Ok(())
}

/// A missing `.env` file is fine; a malformed one is not.
fn env_file_loaded<T>(result: Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("failed to load .env file"),
    }
}

fn announce(settings: &Settings) {
    info!(
        "Starting health check for {} (interval: {:?}, timeout: {:?})",
        settings.target,
        settings.interval,
        settings.target.timeout()
    );
    if !settings.notifications.has_any_channel() {
        info!("No notification channels configured, results are only logged");
    } else if let Some(status) = settings.notifications.status_line() {
        info!("{status}");
    }
    if let Some(threshold) = settings.policy.latency_threshold() {
        info!("Latency threshold enabled: {threshold:?}");
    }
    if settings.policy.test_mode() {
        info!("Test mode: notifications will be sent for every check, including healthy ones");
    }
    debug!("Resolved settings:\n{settings}");
    info!("Press Ctrl+C to stop");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received"),
        _ = terminate => info!("SIGTERM received"),
    }
}

fn config_command(args: ConfigArgs) -> Result<()> {
    if args.init {
        let path = config::config_path(args.path.as_deref())?;
        Config::default().write_config(&path)?;
        println!("Wrote default configuration to {}", path.display());
    } else {
        let file = Config::from_config(args.path.as_deref())?;
        print!("{file}");
    }
    Ok(())
}
