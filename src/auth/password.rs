use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, AppResult};

pub fn hash_password(password: &str) -> AppResult<String> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// `Ok(false)` on mismatch; an unparsable stored hash is an error.
pub fn verify_password(password: &str, hashed: &str) -> AppResult<bool> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {e}")))?;

    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret").unwrap();

        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hash1 = hash_password("s3cret").unwrap();
        let hash2 = hash_password("s3cret").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(verify_password("s3cret", "not-a-phc-string").is_err());
    }
}
