//! Repository for consolidated onboarding records (`onboarded_candidates`).

use hrdocs_core::consolidation;
use hrdocs_core::error::CoreError;
use hrdocs_core::sections::Section;
use hrdocs_core::types::DbId;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::onboarded_candidate::{
    CandidateSummary, ConsolidationOutcome, OnboardedCandidate, OnboardingCounts,
};
use crate::models::onboarding_section::DraftSections;
use crate::models::section_attachment::AttachmentMeta;
use crate::repositories::{AttachmentRepo, SectionRepo};

const COLUMNS: &str = "id, draft_id, candidate_name, email, identity, qualification, offer, \
                       bank, employment, status, submitted_by, submitted_at, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, draft_id, candidate_name, email, status, submitted_at";

/// A section row flattened together with its attachment metadata.
#[derive(Serialize)]
struct SectionSnapshot<'a, T: Serialize> {
    #[serde(flatten)]
    row: &'a T,
    attachments: Vec<&'a AttachmentMeta>,
}

fn snapshot<'a, T: Serialize>(
    row: &'a T,
    section: Section,
    attachments: &'a [AttachmentMeta],
) -> Json<SectionSnapshot<'a, T>> {
    Json(SectionSnapshot {
        row,
        attachments: attachments
            .iter()
            .filter(|a| a.section == section.as_str())
            .collect(),
    })
}

/// Escape `LIKE` metacharacters so user search text matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub struct CandidateRepo;

impl CandidateRepo {
    /// Consolidate a draft into an onboarded candidate.
    ///
    /// Runs in a single transaction: the section rows are locked, the
    /// readiness guards evaluated, the record inserted and every section
    /// flipped to `submitted`. A guard failure or a lost race on the
    /// `uq_onboarded_candidates_draft_id` constraint yields
    /// [`ConsolidationOutcome::Rejected`] and writes nothing.
    pub async fn consolidate(
        pool: &PgPool,
        draft_id: &str,
        submitted_by: Option<DbId>,
    ) -> Result<ConsolidationOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (consolidated,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM onboarded_candidates WHERE draft_id = $1)",
        )
        .bind(draft_id)
        .fetch_one(&mut *tx)
        .await?;

        let sections = SectionRepo::load_all_for_update(&mut tx, draft_id).await?;
        if let Err(err) = consolidation::ensure_ready(draft_id, &sections.present(), consolidated) {
            tx.rollback().await?;
            return Ok(ConsolidationOutcome::Rejected(err));
        }
        let DraftSections {
            identity: Some(identity),
            qualification: Some(qualification),
            offer: Some(offer),
            bank: Some(bank),
            employment: Some(employment),
        } = sections
        else {
            tx.rollback().await?;
            return Ok(ConsolidationOutcome::Rejected(CoreError::Internal(format!(
                "draft {draft_id} lost a section during consolidation"
            ))));
        };

        let attachments = AttachmentRepo::list_meta_inner(&mut tx, draft_id).await?;

        let query = format!(
            "INSERT INTO onboarded_candidates
                (draft_id, candidate_name, email, identity, qualification, offer, bank,
                 employment, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_onboarded_candidates_draft_id DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, OnboardedCandidate>(&query)
            .bind(draft_id)
            .bind(identity.full_name())
            .bind(&identity.email)
            .bind(snapshot(&identity, Section::Identity, &attachments))
            .bind(snapshot(&qualification, Section::Qualification, &attachments))
            .bind(snapshot(&offer, Section::Offer, &attachments))
            .bind(snapshot(&bank, Section::Bank, &attachments))
            .bind(snapshot(&employment, Section::Employment, &attachments))
            .bind(submitted_by)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(candidate) = inserted else {
            tracing::debug!(draft_id, "Lost consolidation race on unique draft_id");
            tx.rollback().await?;
            return Ok(ConsolidationOutcome::Rejected(CoreError::AlreadySubmitted {
                draft_id: draft_id.to_string(),
            }));
        };

        SectionRepo::mark_submitted_inner(&mut tx, draft_id).await?;
        tx.commit().await?;
        Ok(ConsolidationOutcome::Consolidated(candidate))
    }

    pub async fn find_by_draft_id(
        pool: &PgPool,
        draft_id: &str,
    ) -> Result<Option<OnboardedCandidate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarded_candidates WHERE draft_id = $1");
        sqlx::query_as::<_, OnboardedCandidate>(&query)
            .bind(draft_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OnboardedCandidate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarded_candidates WHERE id = $1");
        sqlx::query_as::<_, OnboardedCandidate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve `key` as a draft id first, then as the numeric record id.
    pub async fn find_by_key(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<OnboardedCandidate>, sqlx::Error> {
        if let Some(candidate) = Self::find_by_draft_id(pool, key).await? {
            return Ok(Some(candidate));
        }
        match key.parse::<DbId>() {
            Ok(id) => Self::find_by_id(pool, id).await,
            Err(_) => Ok(None),
        }
    }

    /// List consolidated candidates, newest first, optionally filtered by a
    /// case-insensitive substring of the name or e-mail.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CandidateSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM onboarded_candidates
             WHERE $1::TEXT IS NULL OR candidate_name ILIKE $1 OR email ILIKE $1
             ORDER BY submitted_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CandidateSummary>(&query)
            .bind(search.map(like_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM onboarded_candidates
             WHERE $1::TEXT IS NULL OR candidate_name ILIKE $1 OR email ILIKE $1",
        )
        .bind(search.map(like_pattern))
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    pub async fn counts(pool: &PgPool) -> Result<OnboardingCounts, sqlx::Error> {
        let (drafts_in_progress, consolidated, consolidated_last_30_days): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                    (SELECT COUNT(*) FROM (
                        SELECT draft_id FROM onboarding_identity
                        UNION SELECT draft_id FROM onboarding_qualification
                        UNION SELECT draft_id FROM onboarding_offer
                        UNION SELECT draft_id FROM onboarding_bank
                        UNION SELECT draft_id FROM onboarding_employment
                     ) d
                     WHERE NOT EXISTS (
                        SELECT 1 FROM onboarded_candidates c WHERE c.draft_id = d.draft_id
                     )),
                    (SELECT COUNT(*) FROM onboarded_candidates),
                    (SELECT COUNT(*) FROM onboarded_candidates
                     WHERE submitted_at >= NOW() - INTERVAL '30 days')",
            )
            .fetch_one(pool)
            .await?;
        Ok(OnboardingCounts {
            drafts_in_progress,
            consolidated,
            consolidated_last_30_days,
        })
    }

    /// Delete a candidate together with every section row and attachment
    /// of its draft. Returns the draft id, or `None` if `key` resolved to
    /// nothing.
    pub async fn delete_cascade(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        let Some(candidate) = Self::find_by_key(pool, key).await? else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM onboarded_candidates WHERE id = $1")
            .bind(candidate.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        SectionRepo::delete_all_inner(&mut tx, &candidate.draft_id).await?;
        tx.commit().await?;
        Ok(Some(candidate.draft_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("asha"), "%asha%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
