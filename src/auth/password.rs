//! Password hashing primitives
//!
//! Argon2 in its default configuration, PHC-string encoded hashes. The
//! stored hash embeds the salt, so verification needs no extra state.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::common::ApiError;

/// Hash a plaintext password into a PHC string for storage
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| ApiError::InternalServer(format!("salt generation failed: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| ApiError::InternalServer(format!("salt encoding failed: {}", e)))?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))?
        .to_string();

    Ok(phc)
}

/// Compare a plaintext password against a stored PHC hash
///
/// Any parse or verification failure is a plain `false`; callers report a
/// uniform sign-in failure either way.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}
