//! Axum middleware for bearer authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{field, info_span, warn, Instrument};

use crate::api::error::ApiError;
use crate::auth::auth_service::AuthService;
use crate::auth::models::AuthError;

pub type AuthServiceState = Arc<AuthService>;

/// Generic message for every rejected bearer token.
pub const NOT_AUTHORIZED: &str = "Not authorized";

/// Middleware entry point that authenticates requests using the configured [`AuthService`].
///
/// On success the resolved [`crate::auth::models::AuthContext`] is inserted
/// into the request extensions.
pub async fn authenticate(
    State(auth_service): State<AuthServiceState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %request.method(),
        http.path = %request.uri().path(),
        auth.staff_id = field::Empty,
        correlation_id = %correlation_id
    );

    let header =
        request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()).unwrap_or("");

    match auth_service.authenticate(header).instrument(span.clone()).await {
        Ok(context) => {
            span.record("auth.staff_id", field::display(context.staff_id()));
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(err) => {
            warn!(parent: &span, %correlation_id, reason = err.reason(), "authentication failed");
            Err(map_auth_error(err))
        }
    }
}

fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::MissingBearer
        | AuthError::MalformedBearer
        | AuthError::InvalidToken
        | AuthError::ExpiredToken
        | AuthError::UnknownSubject => ApiError::unauthorized(NOT_AUTHORIZED),
        AuthError::Persistence(inner) => ApiError::from(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn every_token_failure_is_the_same_401() {
        for err in [
            AuthError::MissingBearer,
            AuthError::MalformedBearer,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::UnknownSubject,
        ] {
            let response = map_auth_error(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn store_failure_is_a_server_error() {
        let response =
            map_auth_error(AuthError::Persistence(Error::internal("pool closed"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
