//! Service B: `GET /tempo?cep=<8 digits>`.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::KeyValue;
use url::form_urlencoded;

use crate::http::response::ApiError;
use crate::lookup::{PipelineError, WeatherPipeline};
use crate::observability::{metrics, tracing as otel, Telemetry};

const SERVER_SPAN: &str = "Processar tempo por CEP";
const ROLE: &str = "orchestrator";

#[derive(Clone)]
pub struct OrchestratorState {
    pub telemetry: Arc<Telemetry>,
    pub pipeline: WeatherPipeline,
}

pub async fn handle_weather_by_postal_code(
    State(state): State<OrchestratorState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let parent = state.telemetry.extract(&headers);
    let cx = state.telemetry.start_server_span(SERVER_SPAN, &parent);

    let (trace_id, span_id) = otel::trace_ids(&cx);
    tracing::info!(%trace_id, %span_id, "Processing weather request");

    let cep = cep_param(&uri);
    let response = match state.pipeline.report_for(&cx, &cep).await {
        Ok(report) => {
            tracing::info!(%trace_id, city = %report.city, temp_c = report.temp_c, "Temperature resolved");
            Json(report).into_response()
        }
        Err(e) => {
            let api_error = ApiError::from(&e);
            log_failure(&trace_id, &cep, &e);
            if api_error.status().is_server_error() {
                otel::record_failure(&cx, &e);
            }
            api_error.into_response()
        }
    };

    otel::set_attribute(
        &cx,
        KeyValue::new("http.response.status_code", i64::from(response.status().as_u16())),
    );
    metrics::record_request(ROLE, response.status().as_u16(), start);
    response
}

/// First `cep` value of the query string, or empty when absent.
fn cep_param(uri: &Uri) -> String {
    uri.query()
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "cep")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

fn log_failure(trace_id: &str, cep: &str, err: &PipelineError) {
    match err {
        PipelineError::InvalidCep => {
            tracing::debug!(%trace_id, cep, "Invalid zipcode");
        }
        PipelineError::CepNotFound(source) => match source {
            Some(e) => tracing::warn!(%trace_id, cep, error = %e, "Zipcode lookup failed"),
            None => tracing::warn!(%trace_id, cep, "Zipcode not found"),
        },
        PipelineError::Weather(e) => {
            tracing::error!(%trace_id, cep, error = %e, "Failed to fetch temperature");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_cep_value() {
        let uri: Uri = "/tempo?cep=01001000&cep=99999999".parse().unwrap();
        assert_eq!(cep_param(&uri), "01001000");
    }

    #[test]
    fn missing_cep_is_empty() {
        assert_eq!(cep_param(&"/tempo".parse().unwrap()), "");
        assert_eq!(cep_param(&"/tempo?city=x".parse().unwrap()), "");
    }

    #[test]
    fn decodes_percent_escapes() {
        let uri: Uri = "/tempo?cep=%2001001000".parse().unwrap();
        assert_eq!(cep_param(&uri), " 01001000");
    }
}
