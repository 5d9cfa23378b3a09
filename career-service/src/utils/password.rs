use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Newtype for password hash
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Reasons a password is rejected before it is ever hashed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min_length} characters")]
    TooShort { min_length: usize },
    #[error("Password must contain at least one letter")]
    MissingLetter,
    #[error("Password must contain at least one number")]
    MissingNumber,
    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Check a candidate password against the account policy: at least six
/// characters with a letter, a digit and a non-alphanumeric character.
pub fn validate_password_strength(password: &Password) -> Result<(), PasswordPolicyError> {
    let value = password.as_str();

    if value.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min_length: PASSWORD_MIN_LENGTH,
        });
    }
    if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(PasswordPolicyError::MissingLetter);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingNumber);
    }
    if !value.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err(PasswordPolicyError::MissingSpecial);
    }

    Ok(())
}

/// Hash a password using Argon2
///
/// Uses Argon2id variant with secure default parameters.
/// Salt is automatically generated and included in the hash.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Argon2 hash of a fixed throwaway password, computed once.
///
/// Verified against when no account matches, so unknown and known emails
/// cost the same. Falls back to an unparsable hash if hashing ever fails.
pub fn dummy_password_hash() -> &'static PasswordHashString {
    static DUMMY: OnceLock<PasswordHashString> = OnceLock::new();
    DUMMY.get_or_init(|| {
        hash_password(&Password::new("dummy-password-for-timing")).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to hash dummy password");
            PasswordHashString::new(String::new())
        })
    })
}

/// Verify a password against a stored hash.
///
/// Argon2 compares digests in constant time. A hash that cannot be parsed
/// counts as a mismatch rather than an error.
pub fn verify_password(password: &Password, password_hash: &PasswordHashString) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash.as_str()) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_hash_is_real_and_rejects_input() {
        let dummy = dummy_password_hash();

        assert!(dummy.as_str().starts_with("$argon2"));
        assert!(std::ptr::eq(dummy, dummy_password_hash()));
        assert!(!verify_password(&Password::new("Secret1!"), dummy));
    }

    #[test]
    fn test_hash_password() {
        let password = Password::new("Secret1!");
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(hash.as_str().starts_with("$argon2"));
        assert_ne!(hash.as_str(), "Secret1!");
    }

    #[test]
    fn test_verify_password_correct() {
        let password = Password::new("Secret1!");
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(verify_password(&password, &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password(&Password::new("Secret1!")).expect("Failed to hash password");

        assert!(!verify_password(&Password::new("Secret2!"), &hash));
        assert!(!verify_password(&Password::new(""), &hash));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = Password::new("Secret1!");
        let hash1 = hash_password(&password).expect("Failed to hash password");
        let hash2 = hash_password(&password).expect("Failed to hash password");

        assert_ne!(hash1.as_str(), hash2.as_str());
        assert!(verify_password(&password, &hash1));
        assert!(verify_password(&password, &hash2));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        let password = Password::new("Secret1!");
        assert!(!verify_password(
            &password,
            &PasswordHashString::new("not-a-phc-string".to_string())
        ));
        assert!(!verify_password(&password, &PasswordHashString::new(String::new())));
    }

    #[test]
    fn test_policy_accepts_strong_password() {
        assert!(validate_password_strength(&Password::new("Secret1!")).is_ok());
        assert!(validate_password_strength(&Password::new("a1 b2c")).is_ok());
    }

    #[test]
    fn test_policy_rejections() {
        assert_eq!(
            validate_password_strength(&Password::new("a1!")),
            Err(PasswordPolicyError::TooShort { min_length: 6 })
        );
        assert_eq!(
            validate_password_strength(&Password::new("123456!")),
            Err(PasswordPolicyError::MissingLetter)
        );
        assert_eq!(
            validate_password_strength(&Password::new("abcdef")),
            Err(PasswordPolicyError::MissingNumber)
        );
        assert_eq!(
            validate_password_strength(&Password::new("abcdef1")),
            Err(PasswordPolicyError::MissingSpecial)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let rendered = format!("{:?}", Password::new("Secret1!"));
        assert!(!rendered.contains("Secret1!"));
    }
}
