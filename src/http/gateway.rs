//! Service A: `POST /cep`.
//!
//! Validates the body, forwards the code to the orchestrator and relays its
//! answer byte for byte. The status and body are not interpreted.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use opentelemetry::{Context, KeyValue};
use serde_json::Value;

use crate::http::response::ApiError;
use crate::lookup::is_valid_cep;
use crate::observability::{metrics, tracing as otel, Telemetry};

const SERVER_SPAN: &str = "Processar CEP";
const FORWARD_SPAN: &str = "Serviço B";
const ROLE: &str = "gateway";

/// Inbound body.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PostalCodeRequest {
    pub cep: String,
}

impl PostalCodeRequest {
    /// Decode a `{"cep": "..."}` object.
    ///
    /// Anything but an object or `null` is rejected. A missing or `null`
    /// field reads as empty and fails the format check later (422). The key
    /// matches case-insensitively, an exact `cep` winning over `CEP`.
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            Ok(Value::Null) => return Ok(Self::default()),
            _ => return Err(ApiError::BadRequest),
        };

        let value = fields.get("cep").or_else(|| {
            fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("cep"))
                .map(|(_, value)| value)
        });

        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(cep)) => Ok(Self { cep: cep.clone() }),
            Some(_) => Err(ApiError::BadRequest),
        }
    }
}

#[derive(Clone)]
pub struct GatewayState {
    pub telemetry: Arc<Telemetry>,
    pub client: Client<HttpConnector, Body>,
    pub orchestrator_url: String,
}

pub async fn handle_postal_lookup(
    State(state): State<GatewayState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let parent = state.telemetry.extract(&headers);
    let cx = state.telemetry.start_server_span(SERVER_SPAN, &parent);

    let (trace_id, span_id) = otel::trace_ids(&cx);
    tracing::info!(%trace_id, %span_id, method = %method, "Processing CEP request");

    let response = match forward(&state, &cx, &method, &body).await {
        Ok(response) => response,
        Err(e) => {
            if e.status().is_server_error() {
                otel::record_failure(&cx, &e);
            }
            tracing::warn!(%trace_id, error = %e, status = %e.status(), "CEP request rejected");
            e.into_response()
        }
    };

    otel::set_attribute(
        &cx,
        KeyValue::new("http.response.status_code", i64::from(response.status().as_u16())),
    );
    metrics::record_request(ROLE, response.status().as_u16(), start);
    response
}

async fn forward(
    state: &GatewayState,
    cx: &Context,
    method: &Method,
    body: &[u8],
) -> Result<Response, ApiError> {
    if *method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let request = PostalCodeRequest::from_json(body)?;

    if !is_valid_cep(&request.cep) {
        return Err(ApiError::ValidationFailed);
    }

    let uri = format!(
        "{}/tempo?cep={}",
        state.orchestrator_url.trim_end_matches('/'),
        request.cep
    );

    let forward_cx = state.telemetry.start_client_span(FORWARD_SPAN, cx);
    otel::set_attribute(&forward_cx, KeyValue::new("url.full", uri.clone()));

    let mut outbound = Request::builder()
        .method(Method::GET)
        .uri(uri.as_str())
        .body(Body::empty())
        .map_err(|e| {
            tracing::error!(uri = %uri, error = %e, "Failed to build orchestrator request");
            ApiError::ForwardFailed
        })?;
    state.telemetry.inject(&forward_cx, outbound.headers_mut());

    let upstream = state.client.request(outbound).await.map_err(|e| {
        tracing::error!(uri = %uri, error = %e, "Orchestrator unreachable");
        otel::record_failure(&forward_cx, &e);
        ApiError::UpstreamUnavailable
    })?;

    let (parts, upstream_body) = upstream.into_parts();
    let bytes = axum::body::to_bytes(Body::new(upstream_body), usize::MAX)
        .await
        .map_err(|e| {
            tracing::error!(uri = %uri, error = %e, "Failed to read orchestrator response");
            otel::record_failure(&forward_cx, &e);
            ApiError::UpstreamUnavailable
        })?;

    otel::set_attribute(
        &forward_cx,
        KeyValue::new("http.response.status_code", i64::from(parts.status.as_u16())),
    );
    Ok(relay(parts.status, bytes))
}

/// Orchestrator status and body, unchanged, as JSON.
fn relay(status: StatusCode, body: Bytes) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
