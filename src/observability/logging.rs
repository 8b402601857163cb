//! # Structured Logging
//!
//! Startup log lines. Secrets never reach these fields.

use crate::config::Config;

/// Log the effective configuration once at startup.
pub fn log_config_info(config: &Config) {
    tracing::info!(
        server_address = %config.api.socket_address(),
        database_in_memory = config.database.is_in_memory(),
        auto_migrate = config.database.auto_migrate,
        cors_origins = config.api.cors_origins.len(),
        json_logging = config.observability.json_logging,
        bootstrap_admin = config.bootstrap_admin.is_some(),
        "Staff directory configuration"
    );
}
