//! Repository for the five `onboarding_*` section tables.
//!
//! Every upsert runs in one transaction together with the section's
//! attachment slots. The `ON CONFLICT ... WHERE t.status = 'draft'` clause
//! turns a save against a submitted section into a no-op that returns no
//! row; callers map `None` to `AlreadySubmitted`.

use hrdocs_core::attachments::AttachmentUpload;
use hrdocs_core::sections::bank::SealedBank;
use hrdocs_core::sections::employment::EmploymentFields;
use hrdocs_core::sections::identity::SealedIdentity;
use hrdocs_core::sections::offer::OfferFields;
use hrdocs_core::sections::qualification::QualificationFields;
use hrdocs_core::sections::Section;
use hrdocs_core::types::DbId;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::models::onboarding_section::{
    BankSection, DraftSections, EmploymentSection, IdentitySection, OfferSection,
    QualificationSection,
};
use crate::repositories::AttachmentRepo;

const IDENTITY_COLUMNS: &str = "id, draft_id, first_name, last_name, father_name, email, \
                                country_code, phone, aadhaar_encrypted, aadhaar_hash, \
                                pan_encrypted, pan_hash, status, updated_by, created_at, updated_at";

const QUALIFICATION_COLUMNS: &str = "id, draft_id, qualification, specialization, percentage, \
                                     university, passing_year, status, updated_by, created_at, \
                                     updated_at";

const OFFER_COLUMNS: &str = "id, draft_id, offer_date, date_of_joining, employee_id, \
                             interview_remarks, ctc_annual, salary_breakdown, status, updated_by, \
                             created_at, updated_at";

const BANK_COLUMNS: &str = "id, draft_id, bank_name, account_encrypted, account_hash, \
                            account_last4, ifsc_encrypted, ifsc_hash, branch_name, status, \
                            updated_by, created_at, updated_at";

const EMPLOYMENT_COLUMNS: &str = "id, draft_id, employment_type, hired_role, fresher_ctc, \
                                  salary_breakdown, experiences, status, updated_by, created_at, \
                                  updated_at";

fn table(section: Section) -> &'static str {
    match section {
        Section::Identity => "onboarding_identity",
        Section::Qualification => "onboarding_qualification",
        Section::Offer => "onboarding_offer",
        Section::Bank => "onboarding_bank",
        Section::Employment => "onboarding_employment",
    }
}

fn columns(section: Section) -> &'static str {
    match section {
        Section::Identity => IDENTITY_COLUMNS,
        Section::Qualification => QUALIFICATION_COLUMNS,
        Section::Offer => OFFER_COLUMNS,
        Section::Bank => BANK_COLUMNS,
        Section::Employment => EMPLOYMENT_COLUMNS,
    }
}

pub struct SectionRepo;

impl SectionRepo {
    // -----------------------------------------------------------------------
    // Upserts
    // -----------------------------------------------------------------------

    /// Encrypted blobs are kept when the incoming hash matches the stored
    /// one, so an identical resubmission leaves the row unchanged.
    pub async fn upsert_identity(
        pool: &PgPool,
        draft_id: &str,
        input: &SealedIdentity,
        uploads: &[AttachmentUpload],
        actor: Option<DbId>,
    ) -> Result<Option<IdentitySection>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO onboarding_identity AS t
                (draft_id, first_name, last_name, father_name, email, country_code, phone,
                 aadhaar_encrypted, aadhaar_hash, pan_encrypted, pan_hash, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT ON CONSTRAINT uq_onboarding_identity_draft_id DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                father_name = COALESCE(EXCLUDED.father_name, t.father_name),
                email = EXCLUDED.email,
                country_code = COALESCE(EXCLUDED.country_code, t.country_code),
                phone = COALESCE(EXCLUDED.phone, t.phone),
                aadhaar_encrypted = CASE
                    WHEN EXCLUDED.aadhaar_hash IS NULL OR EXCLUDED.aadhaar_hash = t.aadhaar_hash
                    THEN t.aadhaar_encrypted
                    ELSE EXCLUDED.aadhaar_encrypted
                END,
                aadhaar_hash = COALESCE(EXCLUDED.aadhaar_hash, t.aadhaar_hash),
                pan_encrypted = CASE
                    WHEN EXCLUDED.pan_hash IS NULL OR EXCLUDED.pan_hash = t.pan_hash
                    THEN t.pan_encrypted
                    ELSE EXCLUDED.pan_encrypted
                END,
                pan_hash = COALESCE(EXCLUDED.pan_hash, t.pan_hash),
                updated_by = COALESCE(EXCLUDED.updated_by, t.updated_by)
             WHERE t.status = 'draft'
             RETURNING {IDENTITY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdentitySection>(&query)
            .bind(draft_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.father_name)
            .bind(&input.email)
            .bind(&input.country_code)
            .bind(&input.phone)
            .bind(input.aadhaar.as_ref().map(|v| &v.encrypted))
            .bind(input.aadhaar.as_ref().map(|v| &v.hash))
            .bind(input.pan.as_ref().map(|v| &v.encrypted))
            .bind(input.pan.as_ref().map(|v| &v.hash))
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;

        Self::finish(tx, row, draft_id, Section::Identity, uploads).await
    }

    pub async fn upsert_qualification(
        pool: &PgPool,
        draft_id: &str,
        input: &QualificationFields,
        uploads: &[AttachmentUpload],
        actor: Option<DbId>,
    ) -> Result<Option<QualificationSection>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO onboarding_qualification AS t
                (draft_id, qualification, specialization, percentage, university, passing_year,
                 updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_onboarding_qualification_draft_id DO UPDATE SET
                qualification = EXCLUDED.qualification,
                specialization = COALESCE(EXCLUDED.specialization, t.specialization),
                percentage = COALESCE(EXCLUDED.percentage, t.percentage),
                university = EXCLUDED.university,
                passing_year = EXCLUDED.passing_year,
                updated_by = COALESCE(EXCLUDED.updated_by, t.updated_by)
             WHERE t.status = 'draft'
             RETURNING {QUALIFICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, QualificationSection>(&query)
            .bind(draft_id)
            .bind(&input.qualification)
            .bind(&input.specialization)
            .bind(input.percentage)
            .bind(&input.university)
            .bind(input.passing_year)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;

        Self::finish(tx, row, draft_id, Section::Qualification, uploads).await
    }

    /// The CTC and its breakdown move together: an omitted CTC keeps both.
    pub async fn upsert_offer(
        pool: &PgPool,
        draft_id: &str,
        input: &OfferFields,
        uploads: &[AttachmentUpload],
        actor: Option<DbId>,
    ) -> Result<Option<OfferSection>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO onboarding_offer AS t
                (draft_id, offer_date, date_of_joining, employee_id, interview_remarks,
                 ctc_annual, salary_breakdown, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT uq_onboarding_offer_draft_id DO UPDATE SET
                offer_date = EXCLUDED.offer_date,
                date_of_joining = EXCLUDED.date_of_joining,
                employee_id = COALESCE(EXCLUDED.employee_id, t.employee_id),
                interview_remarks = COALESCE(EXCLUDED.interview_remarks, t.interview_remarks),
                ctc_annual = COALESCE(EXCLUDED.ctc_annual, t.ctc_annual),
                salary_breakdown = CASE
                    WHEN EXCLUDED.ctc_annual IS NULL THEN t.salary_breakdown
                    ELSE EXCLUDED.salary_breakdown
                END,
                updated_by = COALESCE(EXCLUDED.updated_by, t.updated_by)
             WHERE t.status = 'draft'
             RETURNING {OFFER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OfferSection>(&query)
            .bind(draft_id)
            .bind(input.offer_date)
            .bind(input.date_of_joining)
            .bind(&input.employee_id)
            .bind(&input.interview_remarks)
            .bind(input.ctc_annual)
            .bind(input.salary_breakdown.as_ref().map(Json))
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;

        Self::finish(tx, row, draft_id, Section::Offer, uploads).await
    }

    pub async fn upsert_bank(
        pool: &PgPool,
        draft_id: &str,
        input: &SealedBank,
        uploads: &[AttachmentUpload],
        actor: Option<DbId>,
    ) -> Result<Option<BankSection>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO onboarding_bank AS t
                (draft_id, bank_name, account_encrypted, account_hash, account_last4,
                 ifsc_encrypted, ifsc_hash, branch_name, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_onboarding_bank_draft_id DO UPDATE SET
                bank_name = EXCLUDED.bank_name,
                account_encrypted = CASE
                    WHEN EXCLUDED.account_hash = t.account_hash THEN t.account_encrypted
                    ELSE EXCLUDED.account_encrypted
                END,
                account_hash = EXCLUDED.account_hash,
                account_last4 = EXCLUDED.account_last4,
                ifsc_encrypted = CASE
                    WHEN EXCLUDED.ifsc_hash = t.ifsc_hash THEN t.ifsc_encrypted
                    ELSE EXCLUDED.ifsc_encrypted
                END,
                ifsc_hash = EXCLUDED.ifsc_hash,
                branch_name = COALESCE(EXCLUDED.branch_name, t.branch_name),
                updated_by = COALESCE(EXCLUDED.updated_by, t.updated_by)
             WHERE t.status = 'draft'
             RETURNING {BANK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BankSection>(&query)
            .bind(draft_id)
            .bind(&input.bank_name)
            .bind(&input.account.encrypted)
            .bind(&input.account.hash)
            .bind(&input.account_last4)
            .bind(&input.ifsc.encrypted)
            .bind(&input.ifsc.hash)
            .bind(&input.branch_name)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;

        Self::finish(tx, row, draft_id, Section::Bank, uploads).await
    }

    /// Employment is replaced whole: switching between fresher and
    /// experienced must not leave the other shape's fields behind.
    pub async fn upsert_employment(
        pool: &PgPool,
        draft_id: &str,
        input: &EmploymentFields,
        uploads: &[AttachmentUpload],
        actor: Option<DbId>,
    ) -> Result<Option<EmploymentSection>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO onboarding_employment AS t
                (draft_id, employment_type, hired_role, fresher_ctc, salary_breakdown,
                 experiences, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_onboarding_employment_draft_id DO UPDATE SET
                employment_type = EXCLUDED.employment_type,
                hired_role = EXCLUDED.hired_role,
                fresher_ctc = EXCLUDED.fresher_ctc,
                salary_breakdown = EXCLUDED.salary_breakdown,
                experiences = EXCLUDED.experiences,
                updated_by = COALESCE(EXCLUDED.updated_by, t.updated_by)
             WHERE t.status = 'draft'
             RETURNING {EMPLOYMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EmploymentSection>(&query)
            .bind(draft_id)
            .bind(input.employment_type.as_str())
            .bind(&input.hired_role)
            .bind(input.fresher_ctc)
            .bind(input.salary_breakdown.as_ref().map(Json))
            .bind(Json(&input.experiences))
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?;

        Self::finish(tx, row, draft_id, Section::Employment, uploads).await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_identity(
        pool: &PgPool,
        draft_id: &str,
    ) -> Result<Option<IdentitySection>, sqlx::Error> {
        find_in(pool, Section::Identity, draft_id, false).await
    }

    pub async fn find_qualification(
        pool: &PgPool,
        draft_id: &str,
    ) -> Result<Option<QualificationSection>, sqlx::Error> {
        find_in(pool, Section::Qualification, draft_id, false).await
    }

    pub async fn find_offer(
        pool: &PgPool,
        draft_id: &str,
    ) -> Result<Option<OfferSection>, sqlx::Error> {
        find_in(pool, Section::Offer, draft_id, false).await
    }

    pub async fn find_bank(pool: &PgPool, draft_id: &str) -> Result<Option<BankSection>, sqlx::Error> {
        find_in(pool, Section::Bank, draft_id, false).await
    }

    pub async fn find_employment(
        pool: &PgPool,
        draft_id: &str,
    ) -> Result<Option<EmploymentSection>, sqlx::Error> {
        find_in(pool, Section::Employment, draft_id, false).await
    }

    /// Load every section row saved under `draft_id`.
    pub async fn load_all(pool: &PgPool, draft_id: &str) -> Result<DraftSections, sqlx::Error> {
        Ok(DraftSections {
            identity: Self::find_identity(pool, draft_id).await?,
            qualification: Self::find_qualification(pool, draft_id).await?,
            offer: Self::find_offer(pool, draft_id).await?,
            bank: Self::find_bank(pool, draft_id).await?,
            employment: Self::find_employment(pool, draft_id).await?,
        })
    }

    /// Whether any section exists for `draft_id`.
    pub async fn exists(pool: &PgPool, draft_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM onboarding_identity WHERE draft_id = $1
                UNION ALL SELECT 1 FROM onboarding_qualification WHERE draft_id = $1
                UNION ALL SELECT 1 FROM onboarding_offer WHERE draft_id = $1
                UNION ALL SELECT 1 FROM onboarding_bank WHERE draft_id = $1
                UNION ALL SELECT 1 FROM onboarding_employment WHERE draft_id = $1
            )",
        )
        .bind(draft_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Lock and load every section row within an existing transaction.
    pub(crate) async fn load_all_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        draft_id: &str,
    ) -> Result<DraftSections, sqlx::Error> {
        Ok(DraftSections {
            identity: find_in(&mut **tx, Section::Identity, draft_id, true).await?,
            qualification: find_in(&mut **tx, Section::Qualification, draft_id, true).await?,
            offer: find_in(&mut **tx, Section::Offer, draft_id, true).await?,
            bank: find_in(&mut **tx, Section::Bank, draft_id, true).await?,
            employment: find_in(&mut **tx, Section::Employment, draft_id, true).await?,
        })
    }

    /// Flip every section of a draft to `submitted`.
    pub(crate) async fn mark_submitted_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        draft_id: &str,
    ) -> Result<(), sqlx::Error> {
        for section in Section::ALL {
            let query = format!(
                "UPDATE {} SET status = 'submitted' WHERE draft_id = $1",
                table(section)
            );
            sqlx::query(&query).bind(draft_id).execute(&mut **tx).await?;
        }
        Ok(())
    }

    /// Delete every section row and attachment of a draft.
    pub(crate) async fn delete_all_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        draft_id: &str,
    ) -> Result<(), sqlx::Error> {
        for section in Section::ALL {
            let query = format!("DELETE FROM {} WHERE draft_id = $1", table(section));
            sqlx::query(&query).bind(draft_id).execute(&mut **tx).await?;
        }
        sqlx::query("DELETE FROM section_attachments WHERE draft_id = $1")
            .bind(draft_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Write attachments and commit when the upsert produced a row;
    /// otherwise drop the transaction.
    async fn finish<T>(
        mut tx: sqlx::Transaction<'_, sqlx::Postgres>,
        row: Option<T>,
        draft_id: &str,
        section: Section,
        uploads: &[AttachmentUpload],
    ) -> Result<Option<T>, sqlx::Error> {
        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        AttachmentRepo::replace_slots_inner(&mut tx, draft_id, section, uploads).await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

async fn find_in<'e, T, E>(
    executor: E,
    section: Section,
    draft_id: &str,
    lock: bool,
) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT {} FROM {} WHERE draft_id = $1{}",
        columns(section),
        table(section),
        if lock { " FOR UPDATE" } else { "" }
    );
    sqlx::query_as::<_, T>(&query)
        .bind(draft_id)
        .fetch_optional(executor)
        .await
}
