//! Repository for the `hr_admins` table.

use hrdocs_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::hr_admin::{CreateHrAdmin, HrAdmin};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, \
                       reset_otp_hash, reset_otp_expires_at, last_login_at, created_at, updated_at";

/// Provides account operations for HR admins.
pub struct HrAdminRepo;

impl HrAdminRepo {
    /// Insert a new admin, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateHrAdmin) -> Result<HrAdmin, sqlx::Error> {
        let query = format!(
            "INSERT INTO hr_admins (first_name, last_name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HrAdmin>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Number of admin accounts; zero means the system is not bootstrapped.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hr_admins")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HrAdmin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hr_admins WHERE id = $1");
        sqlx::query_as::<_, HrAdmin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by e-mail. Callers pass the lower-cased address.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<HrAdmin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hr_admins WHERE email = $1");
        sqlx::query_as::<_, HrAdmin>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all admins, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<HrAdmin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hr_admins ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, HrAdmin>(&query).fetch_all(pool).await
    }

    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE hr_admins SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Store a hashed password-reset code, replacing any earlier one.
    pub async fn set_reset_otp(
        pool: &PgPool,
        id: DbId,
        otp_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE hr_admins SET reset_otp_hash = $2, reset_otp_expires_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(otp_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Set a new password hash and clear any pending reset code.
    ///
    /// Returns `true` if the row was updated.
    pub async fn reset_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE hr_admins SET
                password_hash = $2,
                reset_otp_hash = NULL,
                reset_otp_expires_at = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
