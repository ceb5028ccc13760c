//! Draft key derivation.
//!
//! A draft id links a candidate's independently saved onboarding sections.
//! It is derived from the two government ID numbers (Aadhaar, PAN) and a
//! server-side salt with SHA-256, so the same pair always produces the same
//! key while the key itself reveals nothing about the numbers.

use crate::error::CoreError;
use crate::hashing::sha256_hex;

/// Separator placed between hashed parts so `("AB", "C")` and `("A", "BC")`
/// never collide.
const SEPARATOR: char = '|';

/// Upper bound on externally supplied draft ids.
pub const MAX_DRAFT_ID_LEN: usize = 128;

/// Canonical form of an ID number: whitespace removed, upper-cased.
pub fn normalize_identifier(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Derive the draft id for an identifier pair.
///
/// Fails with [`CoreError::MissingIdentifier`] when either identifier is
/// blank; callers without identifiers must supply an explicit key instead.
pub fn derive_draft_id(id_a: &str, id_b: &str, salt: &str) -> Result<String, CoreError> {
    let a = normalize_identifier(id_a);
    let b = normalize_identifier(id_b);
    if a.is_empty() || b.is_empty() {
        return Err(CoreError::MissingIdentifier);
    }
    Ok(sha256_hex(
        format!("{a}{SEPARATOR}{b}{SEPARATOR}{salt}").as_bytes(),
    ))
}

/// Validate a draft id supplied by a client (path segment or form field).
pub fn validate_draft_id(value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation("draft_id", "is required"));
    }
    if value.len() > MAX_DRAFT_ID_LEN {
        return Err(CoreError::validation(
            "draft_id",
            format!("must be at most {MAX_DRAFT_ID_LEN} characters"),
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::validation(
            "draft_id",
            "may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(value.to_string())
}
