//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, overlay environment)
//!     → validation.rs (semantic checks for the selected role)
//!     → ServiceConfig (validated, immutable)
//!     → copied into the router state at startup
//! ```
//!
//! # Design Decisions
//! - One file can describe both hops; the CLI picks which one runs
//! - All fields have defaults matching the container deployment
//! - Environment variables win over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{GatewayConfig, ObservabilityConfig, OrchestratorConfig, Role, ServiceConfig};
