//! Postal-code to temperature lookup.
//!
//! # Data Flow
//! ```text
//! pipeline.rs drives, per request:
//! cep (8 digits)
//!     → cep.rs        (format check)
//!     → directory.rs  (ViaCEP: cep → city/state)
//!     → geocoding.rs  (Open-Meteo: city → latitude/longitude)
//!     → forecast.rs   (Open-Meteo: coordinates → current °C)
//!     → temperature.rs (°C → °F/K report)
//! ```
//!
//! Every outbound call runs inside its own client span, a child of the
//! caller's context, and carries that span in its `traceparent` header.

pub mod cep;
pub mod directory;
pub mod forecast;
pub mod geocoding;
pub mod pipeline;
pub mod temperature;

use std::time::Instant;

use opentelemetry::{Context, KeyValue};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::observability::{metrics, tracing as otel, Telemetry};

pub use cep::is_valid_cep;
pub use directory::{DirectoryClient, LocationResult};
pub use forecast::{CurrentTemperature, ForecastClient};
pub use geocoding::{Coordinates, GeocodingClient};
pub use pipeline::{PipelineError, WeatherPipeline};
pub use temperature::TemperatureReport;

/// Failure of one outbound lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {stage} failed: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} answered with status {status}")]
    UnexpectedStatus { stage: &'static str, status: StatusCode },

    #[error("could not decode {stage} response: {source}")]
    Decode {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("coordinates not found for city {city}")]
    CoordinatesNotFound { city: String },
}

impl LookupError {
    /// True when the collaborator could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// GET `url` inside a client span named `span_name`, injecting that span into
/// the request headers, and decode a JSON body.
pub(crate) async fn traced_get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    telemetry: &Telemetry,
    parent: &Context,
    stage: &'static str,
    span_name: &'static str,
    url: &str,
) -> Result<T, LookupError> {
    let cx = telemetry.start_client_span(span_name, parent);
    otel::set_attribute(&cx, KeyValue::new("http.request.method", "GET"));
    otel::set_attribute(&cx, KeyValue::new("url.full", url.to_string()));

    let start = Instant::now();
    let result = send(client, telemetry, &cx, stage, url).await;
    metrics::record_stage(stage, result.is_ok(), start);

    if let Err(e) = &result {
        otel::record_failure(&cx, e);
    }
    result
}

async fn send<T: DeserializeOwned>(
    client: &reqwest::Client,
    telemetry: &Telemetry,
    cx: &Context,
    stage: &'static str,
    url: &str,
) -> Result<T, LookupError> {
    let mut headers = HeaderMap::new();
    telemetry.inject(cx, &mut headers);

    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|source| LookupError::Transport { stage, source })?;

    let status = response.status();
    otel::set_attribute(
        cx,
        KeyValue::new("http.response.status_code", i64::from(status.as_u16())),
    );
    if !status.is_success() {
        return Err(LookupError::UnexpectedStatus { stage, status });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| LookupError::Decode { stage, source })
}
