//! Link shortener gateway.
//!
//! One public port in front of the link, redirect and statistics services.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                   GATEWAY                    │
//!                          │                                              │
//!   Client Request         │  ┌──────────┐   ┌──────┐   ┌─────────────┐   │
//!   ───────────────────────┼─▶│ axum     │──▶│ CORS │──▶│  routing    │   │
//!                          │  │ server   │   │      │   │  classifier │   │
//!                          │  └──────────┘   └──┬───┘   └──────┬──────┘   │
//!                          │       OPTIONS → 204│              │          │
//!                          │                    │    /health → OK         │
//!                          │                    │    no match → 404       │
//!                          │                    │              ▼          │
//!   Client Response        │                    │       ┌─────────────┐   │      link :8001
//!   ◀──────────────────────┼────────────────────┴───────│   proxy     │◀──┼────▶ redirect :8002
//!                          │        (CORS on every      │  forwarder  │   │      stats :8003
//!                          │         response)          └─────────────┘   │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use shortlink_gateway::config::{self, GatewayConfig};
use shortlink_gateway::lifecycle::startup;
use shortlink_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "shortlink-gateway")]
#[command(about = "Routing gateway for the link shortener services", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus environment overrides when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config: GatewayConfig = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_from_env()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        config::validation::validate_config(&config)
            .map_err(config::ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!("shortlink-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        connect_timeout_secs = config.timeouts.connect_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
