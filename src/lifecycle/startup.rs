//! Startup orchestration.
//!
//! # Responsibilities
//! - Build telemetry for the selected role
//! - Start the metrics endpoint when enabled
//! - Bind the listener and serve until a signal arrives
//! - Flush spans on the way out
//!
//! Any startup error is fatal.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{Role, ServiceConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{metrics, Telemetry, TelemetryError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run `role` until SIGINT/SIGTERM.
pub async fn run(role: Role, config: ServiceConfig) -> Result<(), StartupError> {
    let service_name = config.service_name(role);
    let telemetry = Arc::new(Telemetry::init(&config.observability, &service_name)?);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.bind_address(role).to_string();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(role, &config, telemetry.clone());
    let served = server.run(listener, server_shutdown).await;

    telemetry.shutdown().await;
    served.map_err(StartupError::Serve)
}
