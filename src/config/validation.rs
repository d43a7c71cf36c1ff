//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate listener addresses and collaborator URLs
//! - Only check the sections the running role actually uses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: (ServiceConfig, Role) → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{Role, ServiceConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: {value:?} is not a valid URL ({reason})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: scheme {scheme:?} is not supported")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

pub fn validate_config(config: &ServiceConfig, role: Role) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match role {
        Role::Gateway => {
            check_address(&mut errors, "gateway.bind_address", &config.gateway.bind_address);
            // The gateway's connector speaks plain HTTP only.
            check_url(
                &mut errors,
                "gateway.orchestrator_url",
                &config.gateway.orchestrator_url,
                &["http"],
            );
        }
        Role::Orchestrator => {
            let orch = &config.orchestrator;
            check_address(&mut errors, "orchestrator.bind_address", &orch.bind_address);
            check_url(&mut errors, "orchestrator.directory_url", &orch.directory_url, &["http", "https"]);
            check_url(&mut errors, "orchestrator.geocoding_url", &orch.geocoding_url, &["http", "https"]);
            check_url(&mut errors, "orchestrator.forecast_url", &orch.forecast_url, &["http", "https"]);
        }
    }

    let obs = &config.observability;
    if obs.tracing_enabled {
        check_url(&mut errors, "observability.otlp_endpoint", &obs.otlp_endpoint, &["http", "https"]);
    }
    if obs.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &obs.metrics_address);
    }
    if config.service_name(role).trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "observability.service_name",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, schemes: &[&str]) {
    match Url::parse(value) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::UnsupportedScheme {
            field,
            scheme: url.scheme().to_string(),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
