//! # Observability Infrastructure
//!
//! Structured logging through `tracing` and counters through `metrics`.
//! No metrics exporter is installed, so counters are recorded into whatever
//! global recorder the embedding process provides (none by default).

pub mod logging;
pub mod metrics;

pub use logging::log_config_info;
pub use metrics::MetricsRecorder;

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            Error::config_with_source(format!("Invalid log level '{}'", config.log_level), Box::new(e))
        })?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logging {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| Error::config_with_source("Failed to install tracing subscriber", Box::new(e)))
}

