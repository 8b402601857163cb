//! # Error Handling
//!
//! Error types shared by the storage, auth and API layers.

pub mod types;

pub use types::{AuthErrorType, Error, Result};
