//! Password hashing for staff credentials.
//!
//! New hashes are Argon2id PHC strings (salt and parameters embedded). Hashes
//! imported from the previous bcrypt-based deployment (`$2a$`, `$2b$`, `$2y$`)
//! still verify; any password write replaces them with Argon2id.
//!
//! Both algorithms are deliberately slow, so the async wrappers move the work
//! onto tokio's blocking pool.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::errors::{Error, Result};

/// Argon2id at the OWASP baseline: 19 MiB memory, 2 passes, 1 lane.
const MEMORY_COST_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

/// Hash verified when the looked-up account does not exist, so a failed login
/// costs the same whether or not the email is registered. Its parameters
/// must match [`password_hasher`].
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bWVkaXN0YWZmLWR1bW15IQ$Mo+nCwb0R9JijG18H154nt6iR4pmSszyvbUpW73JtoM";

pub fn password_hasher() -> Argon2<'static> {
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, None)
        .unwrap_or_else(|_| Params::default());
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Derive a salted Argon2id hash for `password`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    password_hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::internal(format!("Failed to hash password: {e}")))
}

/// Check `password` against a stored hash, detecting the algorithm by prefix.
///
/// Both verifiers recompute the hash from the stored salt and parameters and
/// compare in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    if stored_hash.starts_with("$argon2") {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| Error::internal(format!("Invalid password hash format: {e}")))?;
        // Parameters come from the PHC string, not from password_hasher()
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    } else if is_bcrypt_hash(stored_hash) {
        bcrypt::verify(password, stored_hash)
            .map_err(|e| Error::internal(format!("Failed to verify legacy password hash: {e}")))
    } else {
        Err(Error::internal("Unrecognized password hash format"))
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"].iter().any(|prefix| hash.starts_with(prefix))
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::internal_with_source("Password hashing task failed", Box::new(e)))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| Error::internal_with_source("Password verification task failed", Box::new(e)))?
}

/// Burn one verification against a throwaway hash; the result is ignored.
pub async fn equalize_timing(password: String) {
    if let Err(e) = verify_password_blocking(password, DUMMY_HASH.to_string()).await {
        tracing::warn!(error = %e, "dummy hash verification failed unexpectedly");
    }
}
