//! Staff directory handlers. Every route here sits behind the bearer guard.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;
use validator::Validate;

use crate::api::dto::{
    CreateLeaveRequest, CreateShiftRequest, CreateStaffRequest, CreatedStaffResponse,
    MessageResponse, StaffResponse, UpdateStaffRequest,
};
use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::auth::models::AuthContext;
use crate::domain::{LeaveRequest, Shift, StaffId};

#[utoipa::path(
    get,
    path = "/staff",
    tag = "staff",
    responses(
        (status = 200, description = "All staff members", body = [StaffResponse]),
        (status = 401, description = "Not authorized")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, context), fields(caller = %context.staff_id()))]
pub async fn list_staff_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Vec<StaffResponse>>, ApiError> {
    let staff = state.directory.list().await?;
    Ok(Json(staff.into_iter().map(StaffResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = String, Path, description = "Staff identifier")),
    responses(
        (status = 200, description = "Staff member", body = StaffResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state), fields(staff_id = %id))]
pub async fn get_staff_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<StaffResponse>, ApiError> {
    let staff = state.directory.get(&StaffId::from_string(id)).await?;
    Ok(Json(staff.into()))
}

#[utoipa::path(
    post,
    path = "/staff",
    tag = "staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = CreatedStaffResponse),
        (status = 400, description = "Validation error or email already registered"),
        (status = 401, description = "Not authorized")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, context, payload), fields(caller = %context.staff_id()))]
pub async fn create_staff_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    payload: Result<Json<CreateStaffRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedStaffResponse>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let staff = state.directory.create(payload).await?;
    Ok((StatusCode::CREATED, Json(staff.into())))
}

#[utoipa::path(
    put,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = String, Path, description = "Staff identifier")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Updated staff member", body = StaffResponse),
        (status = 400, description = "Validation error or email already registered"),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, payload), fields(staff_id = %id))]
pub async fn update_staff_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStaffRequest>, JsonRejection>,
) -> Result<Json<StaffResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let staff = state.directory.update(&StaffId::from_string(id), payload).await?;
    Ok(Json(staff.into()))
}

#[utoipa::path(
    delete,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = String, Path, description = "Staff identifier")),
    responses(
        (status = 200, description = "Staff member removed", body = MessageResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, context), fields(staff_id = %id, caller = %context.staff_id()))]
pub async fn delete_staff_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.directory.delete(&StaffId::from_string(id)).await?;
    Ok(Json(MessageResponse { message: "Staff removed".to_string() }))
}

#[utoipa::path(
    post,
    path = "/staff/{id}/shifts",
    tag = "staff",
    params(("id" = String, Path, description = "Staff identifier")),
    request_body = CreateShiftRequest,
    responses(
        (status = 200, description = "Full shift list after the append", body = [Shift]),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, payload), fields(staff_id = %id))]
pub async fn append_shift_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateShiftRequest>, JsonRejection>,
) -> Result<Json<Vec<Shift>>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let shifts = state.directory.append_shift(&StaffId::from_string(id), payload).await?;
    Ok(Json(shifts))
}

#[utoipa::path(
    post,
    path = "/staff/{id}/leaves",
    tag = "staff",
    params(("id" = String, Path, description = "Staff identifier")),
    request_body = CreateLeaveRequest,
    responses(
        (status = 200, description = "Full leave list after the append", body = [LeaveRequest]),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "Staff not found")
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, payload), fields(staff_id = %id))]
pub async fn append_leave_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateLeaveRequest>, JsonRejection>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let leaves = state.directory.append_leave(&StaffId::from_string(id), payload).await?;
    Ok(Json(leaves))
}
