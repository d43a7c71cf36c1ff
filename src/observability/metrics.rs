//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_weather_requests_total` (counter): requests by role, status
//! - `cep_weather_request_duration_seconds` (histogram): handler latency by role
//! - `cep_weather_stage_duration_seconds` (histogram): outbound call latency by stage, outcome
//!
//! Recording is a no-op until a recorder is installed, so handlers call these
//! unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(role: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "cep_weather_requests_total",
        "role" => role,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cep_weather_request_duration_seconds", "role" => role)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_stage(stage: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::histogram!(
        "cep_weather_stage_duration_seconds",
        "stage" => stage,
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());
}
