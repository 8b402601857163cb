//! # Configuration Management
//!
//! Environment-driven configuration, loaded once at startup.

pub mod settings;

pub use settings::{
    ApiServerConfig, AuthConfig, BootstrapAdminConfig, Config, DatabaseConfig,
    ObservabilityConfig,
};
