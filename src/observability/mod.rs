//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and resolvers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (OpenTelemetry spans, W3C context in/out)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape (optional)
//!     → OTLP collector
//! ```
//!
//! # Design Decisions
//! - `Telemetry` is built once in main and handed to the router state; nothing
//!   reads a global tracer provider or propagator
//! - Export is best effort: a collector outage never fails a request

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{Telemetry, TelemetryError};
