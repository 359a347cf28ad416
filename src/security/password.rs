//! Credential hashing with Argon2id and the local strength gate applied
//! before any hash is produced.
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use crate::error::{AppError, Result};

const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password for storage. Rejects passwords that fail the
/// strength gate before touching the hasher.
pub fn hash_password(password: &str) -> Result<String> {
    check_strength(password)?;

    let salt = SaltString::generate(rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal("password hashing failed".to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash string.
pub fn verify_password(password: &str, stored: &str) -> Result<()> {
    let parsed = PasswordHash::new(stored)
        .map_err(|_| AppError::Internal("stored password hash is malformed".to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Authentication("invalid user credentials".to_string()))
}

/// At least [`MIN_PASSWORD_LEN`] characters drawn from all four classes:
/// lowercase, uppercase, digit, and symbol.
fn check_strength(password: &str) -> Result<()> {
    let mut missing = Vec::new();
    for (label, pred) in [
        ("a lowercase letter", classify(password, char::is_lowercase)),
        ("an uppercase letter", classify(password, char::is_uppercase)),
        ("a digit", classify(password, |c| c.is_ascii_digit())),
        ("a symbol", classify(password, |c| !c.is_alphanumeric())),
    ] {
        if !pred {
            missing.push(label);
        }
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "password must contain {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

fn classify(password: &str, pred: impl Fn(char) -> bool) -> bool {
    password.chars().any(pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_accepts_original_password() {
        let hash = hash_password("viewer#Outpost9").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("viewer#Outpost9", &hash).is_ok());
    }

    #[test]
    fn test_mismatched_password_is_rejected() {
        let hash = hash_password("viewer#Outpost9").unwrap();
        let err = verify_password("viewer#Outpost8", &hash).unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[test]
    fn test_same_password_hashes_with_distinct_salts() {
        let first = hash_password("viewer#Outpost9").unwrap();
        let second = hash_password("viewer#Outpost9").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("viewer#Outpost9", &second).is_ok());
    }

    #[test]
    fn test_garbled_stored_hash_is_an_internal_error() {
        let err = verify_password("viewer#Outpost9", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_length_boundary() {
        // Seven characters covering all four classes is still too short.
        assert!(hash_password("aB3#efg").is_err());
        assert!(hash_password("aB3#efgh").is_ok());
    }

    #[test]
    fn test_missing_character_classes_are_named() {
        let err = hash_password("lowercase only here").unwrap_err();
        let AppError::Validation(msg) = err else {
            panic!("expected a validation error");
        };
        assert!(msg.contains("an uppercase letter"));
        assert!(msg.contains("a digit"));
        // Spaces count as symbols, so the symbol class is satisfied.
        assert!(!msg.contains("a symbol"));
    }

    #[test]
    fn test_all_single_class_passwords_fail() {
        for weak in ["0123456789", "trailhead", "TRAILHEAD", "!!!!!!!!"] {
            assert!(hash_password(weak).is_err(), "{weak} should be rejected");
        }
    }
}
