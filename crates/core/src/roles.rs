//! Well-known HR admin role names.
//!
//! These must match the CHECK constraint on `hr_admins.role`.

use crate::error::CoreError;

/// Regular HR admin: issues letters and runs onboarding.
pub const ROLE_ADMIN: &str = "admin";
/// Super admin: additionally manages admins, the salary structure and
/// letters issued by other admins.
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_SUPER_ADMIN];

pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::validation(
            "role",
            format!("Unknown role '{role}'. Must be one of: {VALID_ROLES:?}"),
        ))
    }
}
