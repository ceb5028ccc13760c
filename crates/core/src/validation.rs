//! Field-level validation helpers shared by onboarding sections, letters
//! and admin accounts.
//!
//! Every helper names the offending field in the returned
//! [`CoreError::Validation`] so the caller can correct the request.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Date;

/// Maximum length accepted for free-text scalar fields.
pub const MAX_TEXT_LEN: usize = 500;

/// Trim an optional string, mapping blank values to `None`.
pub fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Require a non-blank value after trimming.
pub fn require_text(field: &str, value: &Option<String>) -> Result<String, CoreError> {
    let value = trimmed(value).ok_or_else(|| CoreError::validation(field, "is required"))?;
    check_length(field, &value)?;
    Ok(value)
}

/// Trim an optional value and enforce the length limit when present.
pub fn optional_text(field: &str, value: &Option<String>) -> Result<Option<String>, CoreError> {
    match trimmed(value) {
        Some(v) => {
            check_length(field, &v)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

fn check_length(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::validation(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(())
}

/// Require a syntactically valid e-mail address; returns it lower-cased.
pub fn require_email(field: &str, value: &Option<String>) -> Result<String, CoreError> {
    let email = require_text(field, value)?.to_lowercase();
    if !email.validate_email() {
        return Err(CoreError::validation(field, "is not a valid e-mail address"));
    }
    Ok(email)
}

/// Require a date to be present.
pub fn require_date(field: &str, value: Option<Date>) -> Result<Date, CoreError> {
    value.ok_or_else(|| CoreError::validation(field, "is required"))
}

/// Ensure `later` does not precede `earlier`.
pub fn ensure_not_before(
    later_field: &str,
    later: Date,
    earlier_field: &str,
    earlier: Date,
) -> Result<(), CoreError> {
    if later < earlier {
        return Err(CoreError::validation(
            later_field,
            format!("must not be before {earlier_field} ({earlier})"),
        ));
    }
    Ok(())
}
