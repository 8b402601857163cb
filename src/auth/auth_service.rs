//! Bearer token verification for protected routes.

use std::sync::Arc;

use tracing::{field, instrument};

use crate::auth::{
    jwt::TokenIssuer,
    models::{AuthContext, AuthError},
};
use crate::observability::metrics;
use crate::storage::{SqlxStaffRepository, StaffRepository};

#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn StaffRepository>,
    issuer: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(repository: Arc<dyn StaffRepository>, issuer: Arc<TokenIssuer>) -> Self {
        Self { repository, issuer }
    }

    pub fn with_sqlx(pool: crate::storage::DbPool, issuer: Arc<TokenIssuer>) -> Self {
        Self::new(Arc::new(SqlxStaffRepository::new(pool)), issuer)
    }

    /// Resolve an `Authorization` header value to the staff member it names.
    #[instrument(skip(self, header), fields(staff_id = field::Empty))]
    pub async fn authenticate(&self, header: &str) -> std::result::Result<AuthContext, AuthError> {
        let header = header.trim();
        if header.is_empty() {
            metrics::record_authentication("missing_bearer");
            return Err(AuthError::MissingBearer);
        }

        let token = match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => token.trim(),
            _ => {
                metrics::record_authentication("malformed");
                return Err(AuthError::MalformedBearer);
            }
        };

        let claims = self.issuer.validate(token).map_err(|err| {
            let err = AuthError::from_token_error(err);
            metrics::record_authentication(err.reason());
            err
        })?;

        let staff_id = claims.staff_id();
        tracing::Span::current().record("staff_id", staff_id.as_str());

        match self.repository.get_staff(&staff_id).await {
            Ok(Some(staff)) => {
                metrics::record_authentication("success");
                Ok(AuthContext::new(staff))
            }
            Ok(None) => {
                metrics::record_authentication("unknown_subject");
                Err(AuthError::UnknownSubject)
            }
            Err(err) => {
                metrics::record_authentication("error");
                Err(AuthError::from(err))
            }
        }
    }
}
