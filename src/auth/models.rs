//! Request-scoped authentication types.

use thiserror::Error;

use crate::domain::{Staff, StaffId};
use crate::errors::{AuthErrorType, Error};

/// Request-scoped authentication context derived from a valid token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub staff: Staff,
}

impl AuthContext {
    pub fn new(staff: Staff) -> Self {
        Self { staff }
    }

    pub fn staff_id(&self) -> &StaffId {
        &self.staff.id
    }
}

/// Reasons the authorization guard rejects a request.
///
/// Every variant except `Persistence` is reported to the client as the same
/// generic 401; the distinction only reaches the logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingBearer,
    #[error("malformed bearer token")]
    MalformedBearer,
    #[error("invalid token signature or claims")]
    InvalidToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("token subject no longer exists")]
    UnknownSubject,
    #[error(transparent)]
    Persistence(#[from] Error),
}

impl AuthError {
    /// Label used for metrics and structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingBearer => "missing_bearer",
            AuthError::MalformedBearer => "malformed",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::Persistence(_) => "error",
        }
    }

    /// Map a token validation failure from [`crate::auth::jwt::TokenIssuer`].
    pub fn from_token_error(err: Error) -> Self {
        match err {
            Error::Auth { error_type: AuthErrorType::ExpiredToken, .. } => AuthError::ExpiredToken,
            Error::Auth { .. } => AuthError::InvalidToken,
            other => AuthError::Persistence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_map_to_guard_errors() {
        let expired = Error::auth("expired", AuthErrorType::ExpiredToken);
        assert!(matches!(AuthError::from_token_error(expired), AuthError::ExpiredToken));

        let invalid = Error::auth("bad", AuthErrorType::InvalidToken);
        assert!(matches!(AuthError::from_token_error(invalid), AuthError::InvalidToken));

        let internal = Error::internal("boom");
        assert!(matches!(AuthError::from_token_error(internal), AuthError::Persistence(_)));
    }

    #[test]
    fn reasons_are_stable() {
        assert_eq!(AuthError::MissingBearer.reason(), "missing_bearer");
        assert_eq!(AuthError::UnknownSubject.reason(), "unknown_subject");
    }
}
