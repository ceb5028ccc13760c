//! Repository for the `offer_letters` table.

use hrdocs_core::letters::{OfferLetterFields, OfferStatus};
use hrdocs_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::letters::OfferLetter;

const COLUMNS: &str = "id, candidate_name, candidate_address, position, joining_date, \
                       joining_time, ctc_amount, ctc_in_words, probation_months, date_issued, \
                       status, salary_breakdown, created_by, created_at, updated_at";

pub struct OfferLetterRepo;

impl OfferLetterRepo {
    pub async fn create(
        pool: &PgPool,
        input: &OfferLetterFields,
        created_by: DbId,
    ) -> Result<OfferLetter, sqlx::Error> {
        let query = format!(
            "INSERT INTO offer_letters
                (candidate_name, candidate_address, position, joining_date, joining_time,
                 ctc_amount, ctc_in_words, probation_months, date_issued, status,
                 salary_breakdown, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OfferLetter>(&query)
            .bind(&input.candidate_name)
            .bind(&input.candidate_address)
            .bind(&input.position)
            .bind(input.joining_date)
            .bind(&input.joining_time)
            .bind(input.ctc_amount)
            .bind(&input.ctc_in_words)
            .bind(input.probation_months)
            .bind(input.date_issued)
            .bind(input.status.as_str())
            .bind(Json(&input.salary_breakdown))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OfferLetter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offer_letters WHERE id = $1");
        sqlx::query_as::<_, OfferLetter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List offers newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<OfferLetter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offer_letters
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, OfferLetter>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM offer_letters")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Overwrite every editable column with the merged fields.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &OfferLetterFields,
    ) -> Result<Option<OfferLetter>, sqlx::Error> {
        let query = format!(
            "UPDATE offer_letters SET
                candidate_name = $2,
                candidate_address = $3,
                position = $4,
                joining_date = $5,
                joining_time = $6,
                ctc_amount = $7,
                ctc_in_words = $8,
                probation_months = $9,
                date_issued = $10,
                status = $11,
                salary_breakdown = $12
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OfferLetter>(&query)
            .bind(id)
            .bind(&input.candidate_name)
            .bind(&input.candidate_address)
            .bind(&input.position)
            .bind(input.joining_date)
            .bind(&input.joining_time)
            .bind(input.ctc_amount)
            .bind(&input.ctc_in_words)
            .bind(input.probation_months)
            .bind(input.date_issued)
            .bind(input.status.as_str())
            .bind(Json(&input.salary_breakdown))
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: OfferStatus,
    ) -> Result<Option<OfferLetter>, sqlx::Error> {
        let query = format!("UPDATE offer_letters SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, OfferLetter>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM offer_letters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
