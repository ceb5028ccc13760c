//! Repository for the `appointment_letters` table.

use hrdocs_core::letters::AppointmentLetterFields;
use hrdocs_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::letters::AppointmentLetter;

const COLUMNS: &str = "id, employee_name, designation, address, joining_date, appointment_date, \
                       ctc_annual, ctc_words, hr_name, hr_designation, salary_breakdown, \
                       created_by, created_at, updated_at";

pub struct AppointmentLetterRepo;

impl AppointmentLetterRepo {
    pub async fn create(
        pool: &PgPool,
        input: &AppointmentLetterFields,
        created_by: DbId,
    ) -> Result<AppointmentLetter, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointment_letters
                (employee_name, designation, address, joining_date, appointment_date,
                 ctc_annual, ctc_words, hr_name, hr_designation, salary_breakdown, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppointmentLetter>(&query)
            .bind(&input.employee_name)
            .bind(&input.designation)
            .bind(&input.address)
            .bind(input.joining_date)
            .bind(input.appointment_date)
            .bind(input.ctc_annual)
            .bind(&input.ctc_words)
            .bind(&input.hr_name)
            .bind(&input.hr_designation)
            .bind(Json(&input.salary_breakdown))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AppointmentLetter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointment_letters WHERE id = $1");
        sqlx::query_as::<_, AppointmentLetter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AppointmentLetter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointment_letters
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AppointmentLetter>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointment_letters")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &AppointmentLetterFields,
    ) -> Result<Option<AppointmentLetter>, sqlx::Error> {
        let query = format!(
            "UPDATE appointment_letters SET
                employee_name = $2,
                designation = $3,
                address = $4,
                joining_date = $5,
                appointment_date = $6,
                ctc_annual = $7,
                ctc_words = $8,
                hr_name = $9,
                hr_designation = $10,
                salary_breakdown = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppointmentLetter>(&query)
            .bind(id)
            .bind(&input.employee_name)
            .bind(&input.designation)
            .bind(&input.address)
            .bind(input.joining_date)
            .bind(input.appointment_date)
            .bind(input.ctc_annual)
            .bind(&input.ctc_words)
            .bind(&input.hr_name)
            .bind(&input.hr_designation)
            .bind(Json(&input.salary_breakdown))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointment_letters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
