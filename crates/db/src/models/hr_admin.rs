//! HR admin account model and DTOs.

use hrdocs_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `hr_admins` table.
///
/// Contains the password hash and reset code hash; never serialize this to
/// API responses. Use [`HrAdminResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct HrAdmin {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub reset_otp_hash: Option<String>,
    pub reset_otp_expires_at: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe admin representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct HrAdminResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&HrAdmin> for HrAdminResponse {
    fn from(admin: &HrAdmin) -> Self {
        Self {
            id: admin.id,
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
            last_login_at: admin.last_login_at,
            created_at: admin.created_at,
        }
    }
}

impl HrAdmin {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for inserting an admin. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateHrAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
