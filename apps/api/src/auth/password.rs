use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {e}")))
}

/// Returns true when `password` matches the stored PHC hash.
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(h) => h,
        Err(e) => {
            warn!("Stored password hash is malformed: {e}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// A 12-character password handed out once when a student is added to the roster.
pub fn generate_one_time_password() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// `hash_password` on the blocking pool, for callers hashing many passwords
/// from request handlers.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[tokio::test]
    async fn test_blocking_hash_verifies() {
        let hash = hash_password_blocking("one-time-pw".to_string()).await.unwrap();
        assert!(verify_password("one-time-pw", &hash));
    }

    #[test]
    fn test_plaintext_stored_value_never_matches() {
        assert!(!verify_password("hunter2", "hunter2"));
    }

    #[test]
    fn test_one_time_passwords_differ() {
        let a = generate_one_time_password();
        let b = generate_one_time_password();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
    }
}
