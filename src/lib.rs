//! # medistaff
//!
//! Staff directory and authentication backend for a hospital admin portal.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → bearer guard → StaffDirectory service → StaffRepository → SQLite
//!      ↓
//!  /staff/login → LoginService → Argon2 verify → JWT
//! ```
//!
//! Configuration is read once from the environment into [`Config`] and
//! injected from there; nothing below `main` reads ambient globals.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::Config;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
