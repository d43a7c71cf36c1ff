//! Shared utilities for integration tests: collaborator mocks and servers on
//! ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use cep_weather::config::{OrchestratorConfig, Role};
use cep_weather::http::gateway_router;
use cep_weather::http::server::orchestrator_router_with_client;
use cep_weather::{HttpServer, Shutdown, Telemetry};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The three external APIs the orchestrator calls.
pub struct Collaborators {
    pub directory: MockServer,
    pub geocoding: MockServer,
    pub forecast: MockServer,
}

impl Collaborators {
    pub async fn start() -> Self {
        Self {
            directory: MockServer::start().await,
            geocoding: MockServer::start().await,
            forecast: MockServer::start().await,
        }
    }

    pub fn config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            bind_address: "127.0.0.1:0".into(),
            directory_url: self.directory.uri(),
            geocoding_url: self.geocoding.uri(),
            forecast_url: self.forecast.uri(),
        }
    }

    /// `cep` resolves to `city`.
    pub async fn mount_location(&self, cep: &str, city: &str, uf: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/ws/{}/json/", cep)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": cep,
                "localidade": city,
                "uf": uf
            })))
            .mount(&self.directory)
            .await;
    }

    /// Every other code is unknown to the directory.
    pub async fn mount_unknown_codes(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/ws/[0-9]{8}/json/$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": true })))
            .mount(&self.directory)
            .await;
    }

    pub async fn mount_coordinates(&self, city: &str, latitude: f64, longitude: f64) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "name": city, "latitude": latitude, "longitude": longitude }]
            })))
            .mount(&self.geocoding)
            .await;
    }

    pub async fn mount_no_coordinates(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generationtime_ms": 0.2
            })))
            .mount(&self.geocoding)
            .await;
    }

    pub async fn mount_temperature(&self, celsius: f64) {
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current_weather": { "temperature": celsius, "windspeed": 5.0 }
            })))
            .mount(&self.forecast)
            .await;
    }

    /// São Paulo at `celsius`, reachable through CEP 01001000.
    pub async fn mount_sao_paulo(&self, celsius: f64) {
        self.mount_location("01001000", "São Paulo", "SP").await;
        self.mount_coordinates("São Paulo", -23.5475, -46.63611).await;
        self.mount_temperature(celsius).await;
    }
}

/// Base URL of a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn telemetry(service: &str) -> Arc<Telemetry> {
    Arc::new(Telemetry::without_export(service, "test"))
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A running server; stops when dropped.
pub struct Running {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

async fn serve(server: HttpServer) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    Running { addr, shutdown }
}

pub async fn start_orchestrator(collaborators: &Collaborators) -> Running {
    start_orchestrator_with(&collaborators.config()).await
}

pub async fn start_orchestrator_with(config: &OrchestratorConfig) -> Running {
    let router = orchestrator_router_with_client(config, http_client(), telemetry("servico-b"));
    serve(HttpServer::with_router(Role::Orchestrator, router)).await
}

pub async fn start_gateway(orchestrator: &Running) -> Running {
    let router = gateway_router(orchestrator.url(""), telemetry("servico-a"));
    serve(HttpServer::with_router(Role::Gateway, router)).await
}

/// Trace ID field of a `traceparent` header value.
pub fn trace_id_of(traceparent: &str) -> &str {
    traceparent.split('-').nth(1).unwrap_or_default()
}

/// Trace IDs carried by every request a mock server received.
pub async fn received_trace_ids(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            let header = request
                .headers
                .get("traceparent")
                .expect("outbound call without traceparent")
                .to_str()
                .unwrap();
            trace_id_of(header).to_string()
        })
        .collect()
}
