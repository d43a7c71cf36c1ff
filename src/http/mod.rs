//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client ── POST /cep ──▶ gateway.rs (Service A)
//!                             │ validate, GET /tempo?cep=, traceparent
//!                             ▼
//!                         orchestrator.rs (Service B)
//!                             │ lookup::WeatherPipeline
//!                             ▼
//!                         response.rs (errors → status + body)
//! ```
//!
//! `server.rs` builds the router for whichever role the process runs.

pub mod gateway;
pub mod orchestrator;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::{gateway_router, orchestrator_router, HttpServer};
