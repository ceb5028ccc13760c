//! Repository for the `relieving_letters` table.

use hrdocs_core::letters::RelievingLetterFields;
use hrdocs_core::types::DbId;
use sqlx::PgPool;

use crate::models::letters::RelievingLetter;

const COLUMNS: &str = "id, employee_name, designation, employee_id, joining_date, \
                       relieving_date, created_by, created_at, updated_at";

pub struct RelievingLetterRepo;

impl RelievingLetterRepo {
    pub async fn create(
        pool: &PgPool,
        input: &RelievingLetterFields,
        created_by: DbId,
    ) -> Result<RelievingLetter, sqlx::Error> {
        let query = format!(
            "INSERT INTO relieving_letters
                (employee_name, designation, employee_id, joining_date, relieving_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RelievingLetter>(&query)
            .bind(&input.employee_name)
            .bind(&input.designation)
            .bind(&input.employee_id)
            .bind(input.joining_date)
            .bind(input.relieving_date)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RelievingLetter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM relieving_letters WHERE id = $1");
        sqlx::query_as::<_, RelievingLetter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RelievingLetter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relieving_letters
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, RelievingLetter>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM relieving_letters")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM relieving_letters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
