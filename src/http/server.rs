//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the selected role
//! - Build the outbound clients each role needs
//! - Wire up middleware (request logging)
//! - Serve on a listener until shutdown

use std::sync::Arc;

use axum::{body::Body, routing::any, Router};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{OrchestratorConfig, Role, ServiceConfig};
use crate::http::gateway::{handle_postal_lookup, GatewayState};
use crate::http::orchestrator::{handle_weather_by_postal_code, OrchestratorState};
use crate::lookup::{DirectoryClient, ForecastClient, GeocodingClient, WeatherPipeline};
use crate::observability::Telemetry;

/// HTTP server for one hop of the pipeline.
pub struct HttpServer {
    router: Router,
    role: Role,
}

impl HttpServer {
    /// Create a server for `role` with the given configuration.
    pub fn new(role: Role, config: &ServiceConfig, telemetry: Arc<Telemetry>) -> Self {
        let router = match role {
            Role::Gateway => gateway_router(config.gateway.orchestrator_url.clone(), telemetry),
            Role::Orchestrator => orchestrator_router(&config.orchestrator, telemetry),
        };
        Self { router, role }
    }

    /// Serve an already-built router, e.g. one from
    /// [`orchestrator_router_with_client`].
    pub fn with_router(role: Role, router: Router) -> Self {
        Self { router, role }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(role = %self.role, address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!(role = %self.role, "HTTP server stopped");
        Ok(())
    }
}

/// Service A routes: `/cep` for every method; the handler rejects non-POST.
pub fn gateway_router(orchestrator_url: String, telemetry: Arc<Telemetry>) -> Router {
    let client: Client<HttpConnector, Body> =
        Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let state = GatewayState {
        telemetry,
        client,
        orchestrator_url,
    };

    Router::new()
        .route("/cep", any(handle_postal_lookup))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Service B routes: `/tempo`.
pub fn orchestrator_router(config: &OrchestratorConfig, telemetry: Arc<Telemetry>) -> Router {
    orchestrator_router_with_client(config, reqwest::Client::new(), telemetry)
}

/// Like [`orchestrator_router`] with a caller-supplied HTTP client.
pub fn orchestrator_router_with_client(
    config: &OrchestratorConfig,
    client: reqwest::Client,
    telemetry: Arc<Telemetry>,
) -> Router {
    let pipeline = WeatherPipeline::new(
        DirectoryClient::new(client.clone(), &config.directory_url, telemetry.clone()),
        GeocodingClient::new(client.clone(), &config.geocoding_url, telemetry.clone()),
        ForecastClient::new(client, &config.forecast_url, telemetry.clone()),
    );
    let state = OrchestratorState { telemetry, pipeline };

    Router::new()
        .route("/tempo", any(handle_weather_by_postal_code))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
