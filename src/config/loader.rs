//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{Role, ServiceConfig};

const OTLP_TRACES_PATH: &str = "/v1/traces";
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration for `role`: file (if any), then process environment,
/// then validation.
pub fn load_config(path: Option<&Path>, role: Role) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, role, |var| std::env::var(var).ok())?;
    validate_config(&config, role).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `BIND_ADDRESS` targets the section of the running role only. The lookup is
/// injected so callers can supply something other than the process env.
pub fn apply_env_overrides<F>(
    config: &mut ServiceConfig,
    role: Role,
    env: F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = env("BIND_ADDRESS") {
        match role {
            Role::Gateway => config.gateway.bind_address = addr,
            Role::Orchestrator => config.orchestrator.bind_address = addr,
        }
    }
    if let Some(url) = env("ORCHESTRATOR_URL") {
        config.gateway.orchestrator_url = url;
    }
    if let Some(url) = env("VIACEP_URL") {
        config.orchestrator.directory_url = url;
    }
    if let Some(url) = env("GEOCODING_URL") {
        config.orchestrator.geocoding_url = url;
    }
    if let Some(url) = env("FORECAST_URL") {
        config.orchestrator.forecast_url = url;
    }

    let obs = &mut config.observability;
    // Same precedence and path handling as the OTLP exporter, which reads
    // these variables itself: the signal variable is a full URL, the generic
    // one a base that gets `/v1/traces` appended.
    if let Some(endpoint) = env("OTEL_EXPORTER_OTLP_TRACES_ENDPOINT") {
        obs.otlp_endpoint = endpoint;
    } else if let Some(base) = env("OTEL_EXPORTER_OTLP_ENDPOINT") {
        obs.otlp_endpoint = traces_endpoint(&base);
    }
    if let Some(name) = env("OTEL_SERVICE_NAME") {
        obs.service_name = Some(name);
    }
    if let Some(version) = env("SERVICE_VERSION") {
        obs.service_version = version;
    }
    if let Some(level) = env("LOG_LEVEL") {
        obs.log_level = level;
    }
    if let Some(value) = env("TRACING_ENABLED") {
        obs.tracing_enabled = parse_bool("TRACING_ENABLED", value)?;
    }
    if let Some(value) = env("METRICS_ENABLED") {
        obs.metrics_enabled = parse_bool("METRICS_ENABLED", value)?;
    }
    if let Some(addr) = env("METRICS_ADDRESS") {
        obs.metrics_address = addr;
    }

    Ok(())
}

/// Traces URL under an OTLP/HTTP collector base URL.
fn traces_endpoint(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), OTLP_TRACES_PATH)
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { var, value }),
    }
}
