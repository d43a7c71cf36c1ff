//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which hop of the pipeline this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Service A: accepts `POST /cep` and forwards to the orchestrator.
    Gateway,
    /// Service B: answers `GET /tempo?cep=` using the external collaborators.
    Orchestrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Gateway => "gateway",
            Role::Orchestrator => "orchestrator",
        }
    }

    /// Service name reported to the collector when none is configured.
    pub fn default_service_name(&self) -> &'static str {
        match self {
            Role::Gateway => "servico-a",
            Role::Orchestrator => "servico-b",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration shared by both hops.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service A settings.
    pub gateway: GatewayConfig,

    /// Service B settings.
    pub orchestrator: OrchestratorConfig,

    /// Logging, tracing export and metrics.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Listener address for the given role.
    pub fn bind_address(&self, role: Role) -> &str {
        match role {
            Role::Gateway => &self.gateway.bind_address,
            Role::Orchestrator => &self.orchestrator.bind_address,
        }
    }

    /// Service name attached to exported spans.
    pub fn service_name(&self, role: Role) -> String {
        self.observability
            .service_name
            .clone()
            .unwrap_or_else(|| role.default_service_name().to_string())
    }
}

/// Gateway (Service A) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,

    /// Base URL of the orchestrator. Plain HTTP only.
    pub orchestrator_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
            orchestrator_url: "http://servico-b:8080".to_string(),
        }
    }
}

/// Orchestrator (Service B) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the postal-code directory (ViaCEP).
    pub directory_url: String,

    /// Base URL of the geocoding API (Open-Meteo).
    pub geocoding_url: String,

    /// Base URL of the forecast API (Open-Meteo).
    pub forecast_url: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            directory_url: "https://viacep.com.br".to_string(),
            geocoding_url: "https://geocoding-api.open-meteo.com".to_string(),
            forecast_url: "https://api.open-meteo.com".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Export spans to the OTLP collector.
    pub tracing_enabled: bool,

    /// OTLP/HTTP traces endpoint, including the `/v1/traces` path.
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` holds the collector base instead.
    pub otlp_endpoint: String,

    /// Overrides the role's default service name.
    pub service_name: Option<String>,

    /// Reported as the `service.version` resource attribute.
    pub service_version: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tracing_enabled: true,
            otlp_endpoint: "http://otel-collector:4318/v1/traces".to_string(),
            service_name: None,
            service_version: "1.0.0".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
