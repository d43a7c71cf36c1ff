//! Structured logging.
//!
//! Uses the tracing crate; `RUST_LOG` wins over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global fmt subscriber. Call once, before anything logs.
pub fn init_logging(config: &ObservabilityConfig) {
    let fallback = format!("cep_weather={level},tower_http={level}", level = config.log_level);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
