//! Staff directory request and response DTOs.
//!
//! Request types are explicit allow-lists: unknown fields such as `id`,
//! `passwordHash` or `shifts` are rejected during deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::staff::{deserialize_flexible_date, specialization_satisfied};
use crate::domain::{
    LeaveId, LeaveRequest, LeaveStatus, Shift, ShiftId, ShiftStatus, Staff, StaffId, StaffRole,
    StaffStatus,
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_create_specialization"))]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    pub role: StaffRole,

    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,

    #[serde(default)]
    pub specialization: Option<String>,

    #[validate(length(min = 1, max = 32, message = "Contact number is required"))]
    pub contact_number: String,

    #[serde(default)]
    pub status: Option<StaffStatus>,
}

fn validate_create_specialization(req: &CreateStaffRequest) -> Result<(), ValidationError> {
    if specialization_satisfied(req.role, req.specialization.as_deref()) {
        Ok(())
    } else {
        Err(specialization_error())
    }
}

fn specialization_error() -> ValidationError {
    let mut err = ValidationError::new("specialization_required");
    err.message = Some("Specialization is required for doctors".into());
    err
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 128, message = "Password cannot be empty"))]
    pub password: Option<String>,

    pub role: Option<StaffRole>,

    #[validate(length(min = 1, max = 100, message = "Department cannot be empty"))]
    pub department: Option<String>,

    /// Absent keeps the stored value; `null` or blank clears it.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub specialization: Option<Option<String>>,

    #[validate(length(min = 1, max = 32, message = "Contact number cannot be empty"))]
    pub contact_number: Option<String>,

    pub status: Option<StaffStatus>,
}

// A present field, even `null`, becomes `Some`; a missing one falls back to `default`.
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateShiftRequest {
    #[serde(deserialize_with = "deserialize_flexible_date")]
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 16, message = "Start time is required"))]
    pub start_time: String,

    #[validate(length(min = 1, max = 16, message = "End time is required"))]
    pub end_time: String,

    #[serde(default)]
    pub status: ShiftStatus,
}

impl CreateShiftRequest {
    pub fn into_shift(self) -> Shift {
        Shift {
            id: ShiftId::new(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_leave_range"))]
pub struct CreateLeaveRequest {
    #[serde(deserialize_with = "deserialize_flexible_date")]
    pub start_date: NaiveDate,

    #[serde(deserialize_with = "deserialize_flexible_date")]
    pub end_date: NaiveDate,

    #[validate(length(min = 1, max = 500, message = "Reason is required"))]
    pub reason: String,

    #[serde(default)]
    pub status: LeaveStatus,
}

fn validate_leave_range(req: &CreateLeaveRequest) -> Result<(), ValidationError> {
    if req.end_date < req.start_date {
        let mut err = ValidationError::new("leave_range");
        err.message = Some("End date cannot be before start date".into());
        return Err(err);
    }
    Ok(())
}

impl CreateLeaveRequest {
    pub fn into_leave(self) -> LeaveRequest {
        LeaveRequest {
            id: LeaveId::new(),
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            status: self.status,
        }
    }
}

/// Full staff record as returned by list/get/update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffResponse {
    #[schema(value_type = String)]
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub role: StaffRole,
    pub department: String,
    pub specialization: Option<String>,
    pub contact_number: String,
    pub status: StaffStatus,
    pub shifts: Vec<Shift>,
    pub leaves: Vec<LeaveRequest>,
    pub created_at: DateTime<Utc>,
}

impl From<Staff> for StaffResponse {
    fn from(staff: Staff) -> Self {
        Self {
            full_name: staff.full_name(),
            id: staff.id,
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            role: staff.role,
            department: staff.department,
            specialization: staff.specialization,
            contact_number: staff.contact_number,
            status: staff.status,
            shifts: staff.shifts,
            leaves: staff.leaves,
            created_at: staff.created_at,
        }
    }
}

/// Summary returned by `POST /staff`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedStaffResponse {
    #[schema(value_type = String)]
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub role: StaffRole,
    pub department: String,
}

impl From<Staff> for CreatedStaffResponse {
    fn from(staff: Staff) -> Self {
        Self {
            full_name: staff.full_name(),
            id: staff.id,
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            role: staff.role,
            department: staff.department,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
