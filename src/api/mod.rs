//! # REST API Components
//!
//! HTTP routing, handlers, request/response DTOs and error rendering for the
//! staff directory.

pub mod docs;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{build_router, ApiState};
pub use server::start_api_server;
