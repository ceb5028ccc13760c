//! Argon2id password hashing plus the one-time reset codes used by the
//! forgot-password flow.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use hrdocs_core::hashing::sha256_hex;
use rand::Rng;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reset codes expire this many minutes after issue.
pub const RESET_CODE_TTL_MINS: i64 = 10;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    Ok(())
}

/// A fresh six-digit reset code and its SHA-256 hex digest. Only the
/// digest is stored.
pub fn generate_reset_code() -> (String, String) {
    let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
    let hash = hash_reset_code(&code);
    (code, hash)
}

pub fn hash_reset_code(code: &str) -> String {
    sha256_hex(code.trim().as_bytes())
}
