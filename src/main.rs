//! agrimon - farm store and procurement demo services
//!
//! Usage:
//!     agrimon [--config <path>] [--service <agri-store|procurement>]
//!
//! See --help for more options.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use agrimon::api::ApiServer;
use agrimon::config::{load_config, validate_log_level, Config, ServiceKind};
use agrimon::metrics::MetricsServer;
use agrimon::random;
use agrimon::util::{init_logging, ShutdownSignal};
use agrimon::AppState;

/// Demo HTTP services that publish Prometheus counters and gauges.
#[derive(Parser, Debug)]
#[command(name = "agrimon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Service profile to mount (overrides config)
    #[arg(short, long, value_enum)]
    service: Option<ServiceKind>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; every field has a default
    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| {
            format!("failed to load configuration from '{}'", path.display())
        })?,
        None => Config::default(),
    };

    if let Some(service) = cli.service {
        config.api.service = service;
    }

    // Determine log level (CLI overrides config)
    if let Some(level) = cli.log_level.as_deref() {
        validate_log_level(level).map_err(anyhow::Error::msg)?;
    }
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.global.log_level);

    init_logging(log_level, &config.global.log_format)
        .context("failed to initialize logging")?;

    if cli.validate {
        info!("Configuration is valid");
        println!("Configuration is valid.");
        println!("  Service: {}", config.api.service);
        println!("  API: {}", config.api.listen);
        println!(
            "  Metrics: {}{}",
            config.global.metrics.address,
            config.global.metrics.path.as_deref().unwrap_or(" (any path)")
        );
        return Ok(());
    }

    info!(
        config_path = ?cli.config,
        service = %config.api.service,
        seeded = config.api.random_seed.is_some(),
        "agrimon starting"
    );

    run(config)
}

/// Run both servers with the given configuration.
fn run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async { run_async(config).await })
}

/// Async entry point.
async fn run_async(config: Config) -> Result<()> {
    let shutdown = ShutdownSignal::new();

    let state = AppState::new(config.api.service, random::from_seed(config.api.random_seed))
        .with_context(|| format!("failed to assemble service '{}'", config.api.service))?;

    for route in state.routes().iter() {
        info!(method = %route.method(), path = route.path(), "registered route");
    }
    for (name, kind) in state.metrics().metrics() {
        info!(metric = name, kind = %kind, "registered metric");
    }

    // Bind both ports before serving anything; either failure is fatal
    let metrics_server = MetricsServer::bind(
        config.global.metrics.address,
        config.global.metrics.path.clone(),
        state.metrics().clone(),
    )
    .await
    .with_context(|| {
        format!(
            "failed to bind metrics server on {}",
            config.global.metrics.address
        )
    })?;

    let api_server = ApiServer::bind(config.api.listen, state)
        .await
        .with_context(|| format!("failed to bind API listener on {}", config.api.listen))?;

    let handles = vec![
        tokio::spawn(metrics_server.run(shutdown.subscribe())),
        tokio::spawn(api_server.run(shutdown.subscribe())),
    ];

    info!("agrimon is running");
    info!("press Ctrl+C to stop");

    shutdown.trigger_on_ctrl_c().await;

    for handle in handles {
        let _ = handle.await;
    }

    info!("agrimon shut down complete");
    Ok(())
}
