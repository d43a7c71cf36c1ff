//! Distributed tracing support.
//!
//! # Responsibilities
//! - Extract W3C trace context (and baggage) from incoming requests
//! - Start server and client spans nested under that context
//! - Inject the active span context into outbound requests
//! - Export finished spans to an OTLP collector
//!
//! # Design Decisions
//! - One `Telemetry` value per process, passed by `Arc` through router state
//! - Spans are carried as `opentelemetry::Context` values, never attached to a
//!   thread or task, so every hand-off is visible in the function signatures
//! - A provider without an exporter still issues valid IDs, which keeps
//!   propagation identical when export is disabled

use std::borrow::Cow;

use axum::http::HeaderMap;
use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator};
use opentelemetry::trace::{
    SpanKind, Status, TraceContextExt, Tracer as _, TracerProvider as _,
};
use opentelemetry::{Context, KeyValue};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{Tracer, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use thiserror::Error;

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to build OTLP exporter: {0}")]
    Exporter(String),
}

/// Tracing context shared by every handler and outbound call of one process.
pub struct Telemetry {
    provider: TracerProvider,
    tracer: Tracer,
    propagator: TextMapCompositePropagator,
}

impl Telemetry {
    /// Build from configuration. Exports over OTLP/HTTP when tracing is
    /// enabled, otherwise spans are created but dropped on end.
    ///
    /// Must be called inside a Tokio runtime when export is enabled.
    pub fn init(config: &ObservabilityConfig, service_name: &str) -> Result<Self, TelemetryError> {
        if !config.tracing_enabled {
            tracing::info!(service = %service_name, "Span export disabled");
            return Ok(Self::without_export(service_name, &config.service_version));
        }

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(config.otlp_endpoint.clone())
            .build()
            .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_resource(resource(service_name, &config.service_version))
            .build();

        tracing::info!(
            service = %service_name,
            endpoint = %config.otlp_endpoint,
            "OTLP span exporter configured"
        );

        Ok(Self::from_provider(provider, service_name))
    }

    /// Telemetry with a provider that has no span processor.
    pub fn without_export(service_name: &str, service_version: &str) -> Self {
        let provider = TracerProvider::builder()
            .with_resource(resource(service_name, service_version))
            .build();
        Self::from_provider(provider, service_name)
    }

    fn from_provider(provider: TracerProvider, service_name: &str) -> Self {
        let tracer = provider.tracer(service_name.to_string());
        let propagator = TextMapCompositePropagator::new(vec![
            Box::new(TraceContextPropagator::new()),
            Box::new(BaggagePropagator::new()),
        ]);

        Self {
            provider,
            tracer,
            propagator,
        }
    }

    /// Parent context carried by inbound `traceparent`/`tracestate`/`baggage`.
    /// Returns an empty context when the headers are missing or malformed.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Write the span context of `cx` into outbound `headers`.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator.inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Start a server span as a child of `parent` and return the context
    /// holding it. The span ends when the last clone of that context drops.
    pub fn start_server_span(&self, name: impl Into<Cow<'static, str>>, parent: &Context) -> Context {
        self.start_span(name, SpanKind::Server, parent)
    }

    /// Start a client span for an outbound call.
    pub fn start_client_span(&self, name: impl Into<Cow<'static, str>>, parent: &Context) -> Context {
        self.start_span(name, SpanKind::Client, parent)
    }

    fn start_span(&self, name: impl Into<Cow<'static, str>>, kind: SpanKind, parent: &Context) -> Context {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(&self.tracer, parent);
        parent.with_span(span)
    }

    /// Flush pending spans and stop the exporter. Errors are logged only.
    pub async fn shutdown(&self) {
        let provider = self.provider.clone();
        // The batch processor's shutdown blocks until its export task finishes.
        match tokio::task::spawn_blocking(move || provider.shutdown()).await {
            Ok(Ok(())) => tracing::info!("Tracer provider shut down"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Tracer provider shutdown failed"),
            Err(e) => tracing::warn!(error = %e, "Tracer provider shutdown task failed"),
        }
    }
}

fn resource(service_name: &str, service_version: &str) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", service_name.to_string()),
        KeyValue::new("service.version", service_version.to_string()),
    ])
}

/// Hex trace and span IDs of the span active in `cx`, for log correlation.
pub fn trace_ids(cx: &Context) -> (String, String) {
    let span = cx.span();
    let sc = span.span_context();
    (sc.trace_id().to_string(), sc.span_id().to_string())
}

/// Mark the span active in `cx` as failed.
pub fn record_failure(cx: &Context, error: &(dyn std::error::Error + 'static)) {
    let span = cx.span();
    span.record_error(error);
    span.set_status(Status::error(error.to_string()));
}

/// Attach an attribute to the span active in `cx`.
pub fn set_attribute(cx: &Context, attribute: KeyValue) {
    cx.span().set_attribute(attribute);
}
