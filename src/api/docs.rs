use axum::{routing::get, Json, Router};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    CreateLeaveRequest, CreateShiftRequest, CreateStaffRequest, CreatedStaffResponse,
    LoginRequest, LoginResponse, MessageResponse, StaffResponse, UpdateStaffRequest,
};
use crate::api::handlers::health::{HealthResponse, PatientRosterResponse, PatientStats, PatientSummary};
use crate::domain::{LeaveRequest, LeaveStatus, Shift, ShiftStatus, StaffRole, StaffStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::api_test_handler,
        crate::api::handlers::health::patients_handler,
        crate::api::handlers::auth::login_handler,
        crate::api::handlers::staff::list_staff_handler,
        crate::api::handlers::staff::get_staff_handler,
        crate::api::handlers::staff::create_staff_handler,
        crate::api::handlers::staff::update_staff_handler,
        crate::api::handlers::staff::delete_staff_handler,
        crate::api::handlers::staff::append_shift_handler,
        crate::api::handlers::staff::append_leave_handler,
    ),
    components(schemas(
        HealthResponse,
        MessageResponse,
        PatientSummary,
        PatientStats,
        PatientRosterResponse,
        LoginRequest,
        LoginResponse,
        CreateStaffRequest,
        UpdateStaffRequest,
        CreatedStaffResponse,
        StaffResponse,
        CreateShiftRequest,
        CreateLeaveRequest,
        Shift,
        LeaveRequest,
        StaffRole,
        StaffStatus,
        ShiftStatus,
        LeaveStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Staff login"),
        (name = "staff", description = "Staff directory, shifts and leave requests"),
        (name = "health", description = "Service health checks"),
        (name = "patients", description = "Sample patient data"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build(),
            ),
        );
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
