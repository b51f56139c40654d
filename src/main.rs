//! Harvest API server.
//!
//! A REST front end for the theHarvester OSINT tool, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                     HARVEST API                      │
//!                        │                                                      │
//!     Client Request     │  ┌──────────┐   ┌────────────┐   ┌────────────┐      │
//!     ───────────────────┼─▶│  http    │──▶│ user-agent │──▶│ rate limit │      │
//!                        │  │ server   │   │  filter    │   │ (per IP)   │      │
//!                        │  └──────────┘   └─────┬──────┘   └─────┬──────┘      │
//!                        │                       │ scanner        │             │
//!                        │                       ▼                ▼             │
//!                        │                 ┌──────────┐    ┌────────────┐       │
//!                        │                 │ /nicebot │    │  handlers  │       │
//!                        │                 └──────────┘    │ + params   │       │
//!                        │                                 └─────┬──────┘       │
//!                        │                                       ▼              │
//!     Client Response    │                               ┌──────────────┐       │
//!     ◀──────────────────┼───────────────────────────────│ServerContext │       │
//!                        │                               │  (timeout)   │       │
//!                        │                               └──────┬───────┘       │
//!                        │                                      ▼               │
//!                        │                               ┌──────────────┐       │
//!                        │                               │ CommandEngine│───────┼──▶ theHarvester
//!                        │                               └──────────────┘       │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use harvest_api::config::{load_config, validate_config, ApiConfig, ConfigError};
use harvest_api::lifecycle::{signals, startup, Shutdown};
use harvest_api::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "harvest-api")]
#[command(about = "REST API for theHarvester", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ApiConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    let log = init_logging(&config.observability)?;

    tracing::info!("harvest-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit_enabled = config.rate_limit.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        log_file = %config.observability.log_file,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let context = startup::build_context(config, log)?;

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    startup::serve(context, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
