//! Public login endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::instrument;

use crate::api::dto::{LoginRequest, LoginResponse};
use crate::api::error::ApiError;
use crate::api::routes::ApiState;

/// Exchange email and password for a 30-day access token.
#[utoipa::path(
    post,
    path = "/staff/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[instrument(skip(state, payload))]
pub async fn login_handler(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    let (staff, token) = state.login.login(&payload.email, &payload.password).await?;
    Ok(Json(LoginResponse::new(staff, token)))
}
