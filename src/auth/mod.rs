//! Authentication module entry point.
//!
//! Password hashing, JWT issuance, the login service, and the bearer guard
//! that protects the staff routes.

pub mod auth_service;
pub mod hashing;
pub mod jwt;
pub mod login_service;
pub mod middleware;
pub mod models;

pub use auth_service::AuthService;
pub use jwt::{Claims, TokenIssuer};
pub use login_service::LoginService;
pub use models::{AuthContext, AuthError};
