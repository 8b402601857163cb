//! JWT access tokens for staff sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::domain::StaffId;
use crate::errors::{AuthErrorType, Error, Result};

/// Tokens live for 30 days from issuance and cannot be revoked early.
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // StaffId
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn staff_id(&self) -> StaffId {
        StaffId::from_str_unchecked(&self.sub)
    }
}

/// Signs and verifies HS256 access tokens with the server-held secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime: Duration::days(TOKEN_LIFETIME_DAYS),
        }
    }

    /// Issue a token for `staff_id`, valid for [`TOKEN_LIFETIME_DAYS`].
    pub fn issue(&self, staff_id: &StaffId) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: staff_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims. Exposed for tests that need crafted expiries.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| Error::internal_with_source("Failed to sign access token", Box::new(e)))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    Error::auth("Token has expired", AuthErrorType::ExpiredToken)
                }
                _ => Error::auth("Token is invalid", AuthErrorType::InvalidToken),
            })
    }
}
