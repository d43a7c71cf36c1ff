//! cep-weather: postal code → temperature, across two traced services.
//!
//! # Architecture Overview
//!
//! ```text
//!   client                 gateway (A)                 orchestrator (B)
//!     │   POST /cep          │                            │
//!     ├─────────────────────▶│ validate                   │
//!     │                      │ GET /tempo?cep= ──────────▶│ validate
//!     │                      │   traceparent              │ ViaCEP      ──▶ city
//!     │                      │                            │ geocoding   ──▶ lat/lon
//!     │                      │                            │ forecast    ──▶ °C
//!     │                      │◀────────── status + body ──┤ convert
//!     │◀─────── relayed ─────┤                            │
//!
//!   Both processes export spans to the same OTLP collector.
//! ```
//!
//! Run one binary per hop: `cep-weather gateway` or `cep-weather orchestrator`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cep_weather::config::{load_config, Role};
use cep_weather::lifecycle::startup;
use cep_weather::observability::logging;

#[derive(Parser)]
#[command(name = "cep-weather", version)]
#[command(about = "Postal code to temperature lookup services", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run Service A (POST /cep)
    Gateway,
    /// Run Service B (GET /tempo)
    Orchestrator,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let role = match cli.command {
        Commands::Gateway => Role::Gateway,
        Commands::Orchestrator => Role::Orchestrator,
    };

    let config = load_config(cli.config.as_deref(), role)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        role = %role,
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.bind_address(role),
        tracing_enabled = config.observability.tracing_enabled,
        "cep-weather starting"
    );

    startup::run(role, config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
