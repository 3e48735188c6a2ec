//! Account credentials: password hashing and sign-in/registration validation.
//!
//! Passwords are never stored in clear text. Each account gets a random salt
//! and the stored digest is `SHA-256(salt || password)`. Verification compares
//! digests in constant time.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .unwrap_or_else(|e| panic!("email regex must be valid: {e}"))
});

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: String,
    digest: [u8; 32],
}

impl PasswordHash {
    pub fn new(password: &str) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        let digest = digest(&salt, password);
        Self { salt, digest }
    }

    pub fn verify(&self, password: &str) -> bool {
        let candidate = digest(&self.salt, password);
        candidate.ct_eq(&self.digest).into()
    }
}

// Keep digests out of logs.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash").finish_non_exhaustive()
    }
}

fn digest(salt: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Username must be at least {MIN_USERNAME_LEN} characters")]
    UsernameTooShort,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Full name is required")]
    MissingFullName,
}

/// Checks the shape of a sign-in attempt. Usernames are trimmed first.
pub fn validate_login(username: &str, password: &str) -> Result<(), CredentialError> {
    if username.trim().chars().count() < MIN_USERNAME_LEN {
        return Err(CredentialError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
    full_name: &str,
) -> Result<(), CredentialError> {
    validate_login(username, password)?;
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(CredentialError::InvalidEmail);
    }
    if full_name.trim().is_empty() {
        return Err(CredentialError::MissingFullName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_login, validate_registration, CredentialError, PasswordHash};

    #[test]
    fn password_hash_verifies_only_the_hashed_password() {
        let hash = PasswordHash::new("orbit-123");
        assert!(hash.verify("orbit-123"));
        assert!(!hash.verify("orbit-124"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn same_password_hashes_differently_per_account() {
        let first = PasswordHash::new("orbit-123");
        let second = PasswordHash::new("orbit-123");
        assert_ne!(first, second);
    }

    #[test]
    fn debug_output_hides_digest() {
        let rendered = format!("{:?}", PasswordHash::new("orbit-123"));
        assert!(!rendered.contains("digest"));
    }

    #[test]
    fn login_rejects_short_username_and_password() {
        assert_eq!(
            validate_login("ab", "secret1"),
            Err(CredentialError::UsernameTooShort)
        );
        assert_eq!(
            validate_login(" ab ", "secret1"),
            Err(CredentialError::UsernameTooShort)
        );
        assert_eq!(
            validate_login("alice", "12345"),
            Err(CredentialError::PasswordTooShort)
        );
        assert!(validate_login("alice", "123456").is_ok());
    }

    #[test]
    fn registration_requires_email_and_full_name() {
        assert_eq!(
            validate_registration("alice", "secret1", "not-an-email", "Alice"),
            Err(CredentialError::InvalidEmail)
        );
        assert_eq!(
            validate_registration("alice", "secret1", "alice@example.com", "  "),
            Err(CredentialError::MissingFullName)
        );
        assert!(validate_registration("alice", "secret1", "alice@example.com", "Alice").is_ok());
    }
}
