//! Login service for email/password authentication.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::{hashing, jwt::TokenIssuer};
use crate::domain::Staff;
use crate::errors::{AuthErrorType, Error, Result};
use crate::observability::metrics;
use crate::storage::{SqlxStaffRepository, StaffRepository};

/// The one message every failed login gets, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verifies staff credentials and issues access tokens.
#[derive(Clone)]
pub struct LoginService {
    repository: Arc<dyn StaffRepository>,
    issuer: Arc<TokenIssuer>,
}

impl LoginService {
    pub fn new(repository: Arc<dyn StaffRepository>, issuer: Arc<TokenIssuer>) -> Self {
        Self { repository, issuer }
    }

    pub fn with_sqlx(pool: crate::storage::DbPool, issuer: Arc<TokenIssuer>) -> Self {
        Self::new(Arc::new(SqlxStaffRepository::new(pool)), issuer)
    }

    /// Authenticate by email and password, returning the staff member and a fresh token.
    ///
    /// # Errors
    ///
    /// `Auth(InvalidCredentials)` when the email is unknown or the password
    /// does not match. Both cases carry the same message and take roughly the
    /// same time.
    #[instrument(skip(self, password), fields(email = %Staff::normalize_email(email)))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(Staff, String)> {
        let email = Staff::normalize_email(email);

        let (staff, password_hash) = match self.repository.get_credentials(&email).await? {
            Some(found) => found,
            None => {
                hashing::equalize_timing(password.to_string()).await;
                warn!(email = %email, "login attempt for unknown email");
                metrics::record_login("invalid_credentials");
                return Err(invalid_credentials());
            }
        };

        let matches =
            hashing::verify_password_blocking(password.to_string(), password_hash).await?;
        if !matches {
            warn!(staff_id = %staff.id, "login attempt with incorrect password");
            metrics::record_login("invalid_credentials");
            return Err(invalid_credentials());
        }

        let token = self.issuer.issue(&staff.id)?;

        metrics::record_login("success");
        info!(staff_id = %staff.id, role = %staff.role, "staff member logged in");

        Ok((staff, token))
    }
}

fn invalid_credentials() -> Error {
    Error::auth(INVALID_CREDENTIALS, AuthErrorType::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewStaff, StaffId, StaffRole, StaffStatus};
    use crate::storage::test_helpers::memory_pool;

    const SECRET: &[u8] = b"login-service-test-secret-0123456789";

    async fn service_with_nurse(password: &str) -> (LoginService, Arc<TokenIssuer>, Staff) {
        let pool = memory_pool().await;
        let repo = SqlxStaffRepository::new(pool.clone());
        let staff = repo
            .create_staff(NewStaff {
                id: StaffId::new(),
                first_name: "Joy".into(),
                last_name: "Tanaka".into(),
                email: "joy@hospital.org".into(),
                password_hash: hashing::hash_password(password).unwrap(),
                role: StaffRole::Nurse,
                department: "ICU".into(),
                specialization: None,
                contact_number: "555-0100".into(),
                status: StaffStatus::Active,
            })
            .await
            .unwrap();

        let issuer = Arc::new(TokenIssuer::new(SECRET));
        (LoginService::with_sqlx(pool, issuer.clone()), issuer, staff)
    }

    #[tokio::test]
    async fn login_issues_token_for_the_staff_member() {
        let (service, issuer, staff) = service_with_nurse("secret123").await;

        let (logged_in, token) = service.login("  JOY@Hospital.org", "secret123").await.unwrap();
        assert_eq!(logged_in.id, staff.id);
        assert_eq!(issuer.validate(&token).unwrap().staff_id(), staff.id);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let (service, _, _) = service_with_nurse("secret123").await;

        let wrong_password = service.login("joy@hospital.org", "nope").await.unwrap_err();
        let unknown_email = service.login("ghost@hospital.org", "secret123").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status_code(), 401);
        assert_eq!(unknown_email.status_code(), 401);
    }
}
