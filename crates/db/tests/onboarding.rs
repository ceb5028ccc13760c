//! Integration tests for the onboarding draft/merge workflow.
//!
//! Exercises section upserts, consolidation guards, candidate lookup and
//! cascade deletion against a real database.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use hrdocs_core::attachments::AttachmentUpload;
use hrdocs_core::crypto::FieldCipher;
use hrdocs_core::error::CoreError;
use hrdocs_core::salary::{compute_breakdown, SalaryStructure};
use hrdocs_core::sections::bank::BankFields;
use hrdocs_core::sections::employment::{EmploymentFields, EmploymentType};
use hrdocs_core::sections::identity::IdentityFields;
use hrdocs_core::sections::offer::OfferFields;
use hrdocs_core::sections::qualification::QualificationFields;
use hrdocs_core::sections::Section;
use hrdocs_db::models::hr_admin::CreateHrAdmin;
use hrdocs_db::models::onboarded_candidate::ConsolidationOutcome;
use hrdocs_db::repositories::{AttachmentRepo, CandidateRepo, HrAdminRepo, SectionRepo};
use sqlx::PgPool;

const DRAFT: &str = "DRAFT-0001";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cipher() -> FieldCipher {
    FieldCipher::new("test-encryption-key", "test-salt").unwrap()
}

async fn admin(pool: &PgPool) -> i64 {
    HrAdminRepo::create(
        pool,
        &CreateHrAdmin {
            first_name: "Meera".into(),
            last_name: "Iyer".into(),
            email: "meera@example.com".into(),
            password_hash: "not-a-real-hash".into(),
            role: "admin".into(),
        },
    )
    .await
    .unwrap()
    .id
}

fn upload(slot: &str, content: &[u8]) -> AttachmentUpload {
    AttachmentUpload {
        slot: slot.into(),
        file_name: format!("{slot}.pdf"),
        mime_type: "application/pdf".into(),
        content: content.to_vec(),
    }
}

fn identity() -> IdentityFields {
    IdentityFields {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        father_name: Some("Suresh Rao".into()),
        email: "asha@example.com".into(),
        country_code: Some("+91".into()),
        phone: Some("9876543210".into()),
        aadhaar_number: Some("123412341234".into()),
        pan_number: Some("ABCDE1234F".into()),
    }
}

fn qualification() -> QualificationFields {
    QualificationFields {
        qualification: "B.Tech".into(),
        specialization: Some("Computer Science".into()),
        percentage: Some(82.5),
        university: "VTU".into(),
        passing_year: 2022,
    }
}

fn offer() -> OfferFields {
    OfferFields {
        offer_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        date_of_joining: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        employee_id: Some("EMP-101".into()),
        interview_remarks: None,
        ctc_annual: Some(600_000),
        salary_breakdown: Some(compute_breakdown(600_000.0, &SalaryStructure::default()).unwrap()),
    }
}

fn bank() -> BankFields {
    BankFields {
        bank_name: "State Bank of India".into(),
        account_number: "1234567890".into(),
        ifsc_code: "SBIN0001234".into(),
        branch_name: Some("Indiranagar".into()),
    }
}

fn employment() -> EmploymentFields {
    EmploymentFields {
        employment_type: EmploymentType::Fresher,
        hired_role: Some("Engineer".into()),
        fresher_ctc: Some(600_000),
        salary_breakdown: Some(compute_breakdown(600_000.0, &SalaryStructure::default()).unwrap()),
        experiences: Vec::new(),
    }
}

async fn save_all(pool: &PgPool, draft_id: &str, actor: Option<i64>) {
    let cipher = cipher();
    let uploads = [upload("aadhaar", b"aadhaar-scan"), upload("pan", b"pan-scan")];
    SectionRepo::upsert_identity(pool, draft_id, &identity().seal(&cipher).unwrap(), &uploads, actor)
        .await
        .unwrap()
        .unwrap();
    SectionRepo::upsert_qualification(pool, draft_id, &qualification(), &[], actor)
        .await
        .unwrap()
        .unwrap();
    SectionRepo::upsert_offer(pool, draft_id, &offer(), &[], actor)
        .await
        .unwrap()
        .unwrap();
    SectionRepo::upsert_bank(
        pool,
        draft_id,
        &bank().seal(&cipher).unwrap(),
        &[upload("bank_proof", b"cheque")],
        actor,
    )
    .await
    .unwrap()
    .unwrap();
    SectionRepo::upsert_employment(pool, draft_id, &employment(), &[], actor)
        .await
        .unwrap()
        .unwrap();
}

// ---------------------------------------------------------------------------
// Section upserts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identity_upsert_is_idempotent(pool: PgPool) {
    let cipher = cipher();
    let uploads = [upload("aadhaar", b"aadhaar-scan")];

    let first = SectionRepo::upsert_identity(
        &pool,
        DRAFT,
        &identity().seal(&cipher).unwrap(),
        &uploads,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    let first_files = AttachmentRepo::list_meta(&pool, DRAFT, Some(Section::Identity))
        .await
        .unwrap();

    // Sealing again yields a fresh nonce; the stored blob must not move.
    let second = SectionRepo::upsert_identity(
        &pool,
        DRAFT,
        &identity().seal(&cipher).unwrap(),
        &uploads,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    let second_files = AttachmentRepo::list_meta(&pool, DRAFT, Some(Section::Identity))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.aadhaar_encrypted, second.aadhaar_encrypted);
    assert_eq!(first.pan_encrypted, second.pan_encrypted);
    assert_eq!(first.aadhaar_hash, second.aadhaar_hash);
    assert_eq!(first_files, second_files);
    assert_eq!(second.status, "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identity_changed_number_rewrites_blob(pool: PgPool) {
    let cipher = cipher();
    let first = SectionRepo::upsert_identity(&pool, DRAFT, &identity().seal(&cipher).unwrap(), &[], None)
        .await
        .unwrap()
        .unwrap();

    let mut changed = identity();
    changed.pan_number = Some("ZZZZZ9999Z".into());
    let second = SectionRepo::upsert_identity(&pool, DRAFT, &changed.seal(&cipher).unwrap(), &[], None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.aadhaar_encrypted, second.aadhaar_encrypted);
    assert_ne!(first.pan_hash, second.pan_hash);
    assert_eq!(
        cipher.decrypt(second.pan_encrypted.as_deref().unwrap()).unwrap(),
        "ZZZZZ9999Z"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_omitted_optional_fields_keep_stored_values(pool: PgPool) {
    let cipher = cipher();
    SectionRepo::upsert_identity(&pool, DRAFT, &identity().seal(&cipher).unwrap(), &[], None)
        .await
        .unwrap()
        .unwrap();

    let mut partial = identity();
    partial.phone = None;
    partial.aadhaar_number = None;
    partial.pan_number = None;
    let row = SectionRepo::upsert_identity(&pool, DRAFT, &partial.seal(&cipher).unwrap(), &[], None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.phone.as_deref(), Some("9876543210"));
    assert!(row.aadhaar_encrypted.is_some());
    assert!(row.pan_hash.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attachment_slot_replaced_others_untouched(pool: PgPool) {
    let sealed = identity().seal(&cipher()).unwrap();
    SectionRepo::upsert_identity(
        &pool,
        DRAFT,
        &sealed,
        &[upload("aadhaar", b"v1"), upload("pan", b"pan")],
        None,
    )
    .await
    .unwrap()
    .unwrap();
    SectionRepo::upsert_identity(&pool, DRAFT, &sealed, &[upload("aadhaar", b"v2")], None)
        .await
        .unwrap()
        .unwrap();

    let aadhaar = AttachmentRepo::find_file(&pool, DRAFT, Section::Identity, "aadhaar")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aadhaar.content, b"v2");
    assert_eq!(aadhaar.byte_size, 2);

    let slots = AttachmentRepo::stored_slots(&pool, DRAFT, Section::Identity)
        .await
        .unwrap();
    assert_eq!(slots, vec!["aadhaar".to_string(), "pan".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_offer_without_ctc_keeps_breakdown(pool: PgPool) {
    SectionRepo::upsert_offer(&pool, DRAFT, &offer(), &[], None)
        .await
        .unwrap()
        .unwrap();

    let mut without_ctc = offer();
    without_ctc.ctc_annual = None;
    without_ctc.salary_breakdown = None;
    let row = SectionRepo::upsert_offer(&pool, DRAFT, &without_ctc, &[], None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.ctc_annual, Some(600_000));
    assert_eq!(row.salary_breakdown.unwrap().0.len(), 6);
}

// ---------------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_consolidate_rejects_incomplete_draft(pool: PgPool) {
    let sealed = identity().seal(&cipher()).unwrap();
    SectionRepo::upsert_identity(&pool, DRAFT, &sealed, &[], None)
        .await
        .unwrap()
        .unwrap();
    SectionRepo::upsert_offer(&pool, DRAFT, &offer(), &[], None)
        .await
        .unwrap()
        .unwrap();

    let outcome = CandidateRepo::consolidate(&pool, DRAFT, None).await.unwrap();
    assert_matches!(
        outcome,
        ConsolidationOutcome::Rejected(CoreError::IncompleteOnboarding {
            missing_section: Section::Qualification
        })
    );
    assert!(CandidateRepo::find_by_draft_id(&pool, DRAFT).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_consolidate_once(pool: PgPool) {
    let actor = admin(&pool).await;
    save_all(&pool, DRAFT, Some(actor)).await;

    let candidate = match CandidateRepo::consolidate(&pool, DRAFT, Some(actor)).await.unwrap() {
        ConsolidationOutcome::Consolidated(c) => c,
        other => panic!("expected consolidation, got {other:?}"),
    };
    assert_eq!(candidate.candidate_name, "Asha Rao");
    assert_eq!(candidate.email, "asha@example.com");
    assert_eq!(candidate.status, "completed");
    assert_eq!(candidate.submitted_by, Some(actor));
    assert_eq!(candidate.identity["first_name"], "Asha");
    assert_eq!(candidate.identity["attachments"].as_array().unwrap().len(), 2);
    assert_eq!(candidate.bank["account_last4"], "7890");
    assert_eq!(candidate.offer["salary_breakdown"].as_array().unwrap().len(), 6);

    let sections = SectionRepo::load_all(&pool, DRAFT).await.unwrap();
    assert_eq!(sections.identity.unwrap().status, "submitted");
    assert_eq!(sections.employment.unwrap().status, "submitted");

    let again = CandidateRepo::consolidate(&pool, DRAFT, Some(actor)).await.unwrap();
    assert_matches!(
        again,
        ConsolidationOutcome::Rejected(CoreError::AlreadySubmitted { ref draft_id }) if draft_id == DRAFT
    );

    // The rejected resubmit leaves the record untouched.
    let stored = CandidateRepo::find_by_draft_id(&pool, DRAFT)
        .await
        .unwrap()
        .expect("candidate still present");
    assert_eq!(stored.id, candidate.id);
    assert_eq!(stored.submitted_at, candidate.submitted_at);
    assert_eq!(stored.submitted_by, candidate.submitted_by);
    assert_eq!(stored.identity, candidate.identity);
    assert_eq!(stored.qualification, candidate.qualification);
    assert_eq!(stored.offer, candidate.offer);
    assert_eq!(stored.bank, candidate.bank);
    assert_eq!(stored.employment, candidate.employment);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_after_consolidation_returns_none(pool: PgPool) {
    save_all(&pool, DRAFT, None).await;
    assert_matches!(
        CandidateRepo::consolidate(&pool, DRAFT, None).await.unwrap(),
        ConsolidationOutcome::Consolidated(_)
    );

    let row = SectionRepo::upsert_qualification(&pool, DRAFT, &qualification(), &[], None)
        .await
        .unwrap();
    assert!(row.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_submits_consolidate_once(pool: PgPool) {
    save_all(&pool, DRAFT, None).await;

    let (a, b) = tokio::join!(
        CandidateRepo::consolidate(&pool, DRAFT, None),
        CandidateRepo::consolidate(&pool, DRAFT, None)
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    let consolidated = outcomes
        .iter()
        .filter(|o| matches!(o, ConsolidationOutcome::Consolidated(_)))
        .count();
    assert_eq!(consolidated, 1);
    assert!(outcomes.iter().any(|o| matches!(
        o,
        ConsolidationOutcome::Rejected(CoreError::AlreadySubmitted { .. })
    )));
}

// ---------------------------------------------------------------------------
// Lookup, listing and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_key_tries_draft_id_then_numeric_id(pool: PgPool) {
    save_all(&pool, DRAFT, None).await;
    let ConsolidationOutcome::Consolidated(candidate) =
        CandidateRepo::consolidate(&pool, DRAFT, None).await.unwrap()
    else {
        panic!("expected consolidation");
    };

    let by_draft = CandidateRepo::find_by_key(&pool, DRAFT).await.unwrap().unwrap();
    let by_id = CandidateRepo::find_by_key(&pool, &candidate.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_draft.id, candidate.id);
    assert_eq!(by_id.draft_id, DRAFT);
    assert!(CandidateRepo::find_by_key(&pool, "UNKNOWN").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_search_and_counts(pool: PgPool) {
    save_all(&pool, DRAFT, None).await;
    CandidateRepo::consolidate(&pool, DRAFT, None).await.unwrap();
    SectionRepo::upsert_qualification(&pool, "DRAFT-0002", &qualification(), &[], None)
        .await
        .unwrap()
        .unwrap();

    let hits = CandidateRepo::list(&pool, Some("ASHA"), 10, 0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].draft_id, DRAFT);
    assert!(CandidateRepo::list(&pool, Some("nobody"), 10, 0)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(CandidateRepo::count(&pool, None).await.unwrap(), 1);

    let counts = CandidateRepo::counts(&pool).await.unwrap();
    assert_eq!(counts.drafts_in_progress, 1);
    assert_eq!(counts.consolidated, 1);
    assert_eq!(counts.consolidated_last_30_days, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_to_sections_and_attachments(pool: PgPool) {
    save_all(&pool, DRAFT, None).await;
    CandidateRepo::consolidate(&pool, DRAFT, None).await.unwrap();

    let deleted = CandidateRepo::delete_cascade(&pool, DRAFT).await.unwrap();
    assert_eq!(deleted.as_deref(), Some(DRAFT));

    assert!(CandidateRepo::find_by_draft_id(&pool, DRAFT).await.unwrap().is_none());
    assert!(!SectionRepo::exists(&pool, DRAFT).await.unwrap());
    assert!(AttachmentRepo::list_meta(&pool, DRAFT, None)
        .await
        .unwrap()
        .is_empty());
    assert!(CandidateRepo::delete_cascade(&pool, DRAFT).await.unwrap().is_none());
}
