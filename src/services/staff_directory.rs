//! Staff directory business logic.
//!
//! Sits between the HTTP handlers and the credential store: normalizes
//! emails, derives password hashes off the async workers, and enforces the
//! doctor/specialization rule on both create and update.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::dto::{CreateLeaveRequest, CreateShiftRequest, CreateStaffRequest, UpdateStaffRequest};
use crate::auth::hashing;
use crate::config::BootstrapAdminConfig;
use crate::domain::staff::specialization_satisfied;
use crate::domain::{
    LeaveRequest, NewStaff, Shift, Staff, StaffChanges, StaffId, StaffRole, StaffStatus,
};
use crate::errors::{Error, Result};
use crate::observability::metrics;
use crate::storage::{DbPool, SqlxStaffRepository, StaffRepository};

const SPECIALIZATION_REQUIRED: &str = "Specialization is required for doctors";

#[derive(Clone)]
pub struct StaffDirectory {
    repository: Arc<dyn StaffRepository>,
}

impl StaffDirectory {
    pub fn new(repository: Arc<dyn StaffRepository>) -> Self {
        Self { repository }
    }

    pub fn with_sqlx(pool: DbPool) -> Self {
        Self::new(Arc::new(SqlxStaffRepository::new(pool)))
    }

    pub async fn list(&self) -> Result<Vec<Staff>> {
        self.repository.list_staff().await
    }

    pub async fn get(&self, id: &StaffId) -> Result<Staff> {
        self.repository.get_staff(id).await?.ok_or_else(|| Error::not_found("Staff", id.as_str()))
    }

    /// Create a staff member from a validated request.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn create(&self, request: CreateStaffRequest) -> Result<Staff> {
        let specialization = clean_optional(request.specialization);
        if !specialization_satisfied(request.role, specialization.as_deref()) {
            return Err(Error::validation_field(SPECIALIZATION_REQUIRED, "specialization"));
        }

        let email = Staff::normalize_email(&request.email);
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(Error::conflict("Staff already exists", "staff"));
        }

        let password_hash = hashing::hash_password_blocking(request.password).await?;

        let staff = self
            .repository
            .create_staff(NewStaff {
                id: StaffId::new(),
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                email,
                password_hash,
                role: request.role,
                department: request.department.trim().to_string(),
                specialization,
                contact_number: request.contact_number.trim().to_string(),
                status: request.status.unwrap_or_default(),
            })
            .await?;

        metrics::record_staff_mutation("create");
        info!(staff_id = %staff.id, role = %staff.role, "staff member created");
        Ok(staff)
    }

    /// Apply a partial update. A new password is re-hashed before it is stored.
    #[instrument(skip(self, request), fields(staff_id = %id))]
    pub async fn update(&self, id: &StaffId, request: UpdateStaffRequest) -> Result<Staff> {
        let current = self.get(id).await?;

        let role = request.role.unwrap_or(current.role);
        let specialization = request.specialization.map(clean_optional);
        let effective_specialization = match &specialization {
            Some(change) => change.as_deref(),
            None => current.specialization.as_deref(),
        };
        if !specialization_satisfied(role, effective_specialization) {
            return Err(Error::validation_field(SPECIALIZATION_REQUIRED, "specialization"));
        }

        let email = request.email.as_deref().map(Staff::normalize_email);
        if let Some(email) = &email {
            if let Some(owner) = self.repository.find_by_email(email).await? {
                if owner.id != current.id {
                    return Err(Error::conflict("Staff already exists", "staff"));
                }
            }
        }

        let password_hash = match request.password {
            Some(password) => Some(hashing::hash_password_blocking(password).await?),
            None => None,
        };

        let changes = StaffChanges {
            first_name: request.first_name.map(|s| s.trim().to_string()),
            last_name: request.last_name.map(|s| s.trim().to_string()),
            email,
            password_hash,
            role: request.role,
            department: request.department.map(|s| s.trim().to_string()),
            specialization,
            contact_number: request.contact_number.map(|s| s.trim().to_string()),
            status: request.status,
        };

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self.repository.update_staff(id, changes).await?;
        metrics::record_staff_mutation("update");
        info!(staff_id = %id, "staff member updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn delete(&self, id: &StaffId) -> Result<()> {
        self.repository.delete_staff(id).await?;
        metrics::record_staff_mutation("delete");
        info!(staff_id = %id, "staff member removed");
        Ok(())
    }

    pub async fn append_shift(&self, id: &StaffId, request: CreateShiftRequest) -> Result<Vec<Shift>> {
        let shifts = self.repository.append_shift(id, request.into_shift()).await?;
        metrics::record_staff_mutation("append_shift");
        Ok(shifts)
    }

    pub async fn append_leave(
        &self,
        id: &StaffId,
        request: CreateLeaveRequest,
    ) -> Result<Vec<LeaveRequest>> {
        let leaves = self.repository.append_leave(id, request.into_leave()).await?;
        metrics::record_staff_mutation("append_leave");
        Ok(leaves)
    }

    /// Seed an administrator when the directory is empty.
    ///
    /// Returns the created record, or `None` when staff already exist.
    #[instrument(skip(self, admin))]
    pub async fn bootstrap_admin(&self, admin: &BootstrapAdminConfig) -> Result<Option<Staff>> {
        if self.repository.count_staff().await? > 0 {
            return Ok(None);
        }

        let staff = self
            .create(CreateStaffRequest {
                first_name: "System".to_string(),
                last_name: "Administrator".to_string(),
                email: admin.email.clone(),
                password: admin.password.clone(),
                role: StaffRole::Admin,
                department: "Administration".to_string(),
                specialization: None,
                contact_number: "N/A".to_string(),
                status: Some(StaffStatus::Active),
            })
            .await?;

        info!(staff_id = %staff.id, email = %staff.email, "bootstrap administrator created");
        Ok(Some(staff))
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
