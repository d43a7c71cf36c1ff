//! CEP → temperature pipeline, as two traced HTTP services.
//!
//! The gateway (Service A) validates `POST /cep` and forwards to the
//! orchestrator (Service B), which resolves the postal code to a city, the
//! city to coordinates, and the coordinates to the current temperature. One
//! W3C trace spans both hops and every outbound call.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;

pub use config::{Role, ServiceConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;
