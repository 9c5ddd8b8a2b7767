//! ADS Router Service
//!
//! Runs a TCP router engine with a single static route and keeps it
//! supervised until the process is asked to stop.
//!
//! # Architecture Overview
//!
//! ```text
//!  AMSConfiguration.json
//!         │
//!         ▼
//!  ┌──────────────┐   ┌──────────────┐   ┌─────────────────────┐
//!  │ config       │──▶│ routing      │──▶│ supervisor          │
//!  │ load+validate│   │ Target route │   │ LifecycleController │
//!  └──────────────┘   └──────────────┘   └─────────┬───────────┘
//!                                                  │ construct / add_route / start
//!                                                  ▼
//!                     ┌──────────────┐   ┌─────────────────────┐
//!   log / metrics ◀───│ StatusMonitor│◀──│ engine (TCP router) │
//!                     └──────────────┘   └─────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use ads_router_service::config::loader::load_config_with_env;
use ads_router_service::engine::TcpEngineFactory;
use ads_router_service::error::EXIT_CONFIG;
use ads_router_service::lifecycle::{run_service, signals};
use ads_router_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "ads-router-service")]
#[command(about = "Supervised ADS/TCP router with a single static route", long_about = None)]
struct Args {
    /// Configuration file (.json or .toml)
    #[arg(short, long, default_value = "AMSConfiguration.json")]
    config: PathBuf,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = load_config_with_env(&args.config);
    let mut observability = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_default();
    if let Some(level) = args.log_level {
        observability.log_level = level;
    }
    logging::init_logging(&observability);

    tracing::info!("ADS router service starting");

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %args.config.display(), error = %e, "Failed to load configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = CancellationToken::new();
    signals::spawn_shutdown_listener(shutdown.clone());

    match run_service(&config, Arc::new(TcpEngineFactory), shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = e.as_label(), error = %e, "ADS router service failed");
            ExitCode::from(e.exit_code())
        }
    }
}
