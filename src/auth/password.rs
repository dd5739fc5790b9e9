use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
// Caps argon2 work per login attempt.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Rules a password must meet at registration.
pub fn check_new_password(plain: &str) -> Result<(), AppError> {
    let len = plain.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    if plain.trim().is_empty() {
        return Err(AppError::Validation("Password must not be blank".into()));
    }
    Ok(())
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// `Ok(false)` on mismatch; an unparseable stored hash is an error.
pub fn verify_password(plain: &str, stored_hash: &str) -> anyhow::Result<bool> {
    if plain.chars().count() > MAX_PASSWORD_LEN {
        return Ok(false);
    }
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow::anyhow!("parse password hash: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_only_the_original_password() {
        let hash = hash_password("nutriplan-demo").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("nutriplan-demo", &hash).unwrap());
        assert!(!verify_password("nutriplan-dem0", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plain-text-password").is_err());
    }

    #[test]
    fn new_password_length_rules() {
        assert!(matches!(check_new_password("short"), Err(AppError::Validation(_))));
        assert!(check_new_password(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
        assert!(check_new_password("        ").is_err());
        assert!(check_new_password("açaí-com-granola").is_ok());
    }

    #[test]
    fn oversized_login_password_never_matches() {
        let hash = hash_password("nutriplan-demo").unwrap();
        assert!(!verify_password(&"x".repeat(MAX_PASSWORD_LEN + 1), &hash).unwrap());
    }
}
