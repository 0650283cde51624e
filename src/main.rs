//! Polls a 3D printer server and reports its status.

#![deny(missing_docs)]

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use printer_monitor::{config::Config, metrics::Metrics, Monitor};
use prometheus_client::{encoding::text::encode, registry::Registry};
use tracing_subscriber::prelude::*;

/// This doc string acts as a help message when the user runs '--help'
/// as do all doc strings on fields.
#[derive(Parser, Debug, Clone)]
#[clap(version = clap::crate_version!(), author = clap::crate_authors!("\n"))]
pub struct Opts {
    /// Print debug info
    #[clap(short, long)]
    pub debug: bool,

    /// Print logs as json
    #[clap(short, long)]
    pub json: bool,

    /// The subcommand to run.
    #[clap(subcommand)]
    pub subcmd: SubCommand,

    /// Path to config file.
    #[clap(short, long, default_value = "printer-monitor.toml")]
    pub config: PathBuf,
}

/// A subcommand for our cli.
#[derive(Parser, Debug, Clone)]
pub enum SubCommand {
    /// Fetch the status once and print it as json.
    Status {
        /// Also print the collected metrics.
        #[clap(long)]
        metrics: bool,
    },

    /// Keep polling the printer until interrupted.
    Watch {
        /// Seconds between two updates, overriding the config file.
        #[clap(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let level = if opts.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (json, plain) = if opts.json {
        (Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
    };

    // Initialize tracing.
    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();

    let config = Config::from_file(&opts.config)?;

    run_cmd(&opts, &config)
        .await
        .with_context(|| format!("running cmd `{:?}` failed", &opts.subcmd))
}

async fn run_cmd(opts: &Opts, config: &Config) -> Result<()> {
    let mut registry = Registry::default();
    let metrics = Metrics::register(&mut registry);
    let mut monitor = Monitor::new(config.endpoint())?.with_metrics(metrics);

    match &opts.subcmd {
        SubCommand::Status { metrics } => {
            monitor.update().await;
            println!("{}", serde_json::to_string_pretty(monitor.status())?);

            if *metrics {
                let mut out = String::new();
                encode(&mut out, &registry)?;
                print!("{}", out);
            }
        }
        SubCommand::Watch { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.poll.interval())
                .max(Duration::from_secs(1));
            watch(&mut monitor, interval).await?;
        }
    }

    Ok(())
}

async fn watch(monitor: &mut Monitor, interval: Duration) -> Result<()> {
    let endpoint = monitor.endpoint();
    tracing::info!(
        host = %endpoint.host,
        port = endpoint.port,
        dialect = %endpoint.dialect,
        interval_secs = interval.as_secs(),
        "watching printer"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                monitor.update().await;
                let status = monitor.snapshot();
                tracing::info!(
                    job_valid = status.job.valid,
                    loaded = status.job.loaded,
                    file = %status.job.file_name,
                    progress = status.job.percent_complete,
                    remaining = status.job.print_time_remaining,
                    printer_valid = status.printer.valid,
                    state = %status.printer.print_state,
                    tool0 = status.printer.tool0_temp,
                    bed = status.printer.bed_temp,
                    flags = status.printer.flags.bits(),
                    "status"
                );
            }
            result = &mut shutdown => {
                result?;
                tracing::info!("shutting down");
                return Ok(());
            }
        }
    }
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("received SIGINT");
            }
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("received Ctrl+C (SIGINT)");
    }

    Ok(())
}
