//! Handlers for the onboarding draft workflow.
//!
//! Each of the five sections is saved independently under one draft id and
//! may carry file attachments (see [`SectionRequest`]). Reads never expose
//! identity or bank numbers in clear text.

use std::collections::HashMap;

use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use hrdocs_core::attachments::{validate_uploads, AttachmentUpload};
use hrdocs_core::consolidation::OnboardingProgress;
use hrdocs_core::crypto::mask_tail;
use hrdocs_core::draft_id::validate_draft_id;
use hrdocs_core::error::CoreError;
use hrdocs_core::sections::bank::{masked_account, BankPayload};
use hrdocs_core::sections::employment::EmploymentPayload;
use hrdocs_core::sections::identity::IdentityPayload;
use hrdocs_core::sections::offer::OfferPayload;
use hrdocs_core::sections::qualification::QualificationPayload;
use hrdocs_core::sections::Section;
use hrdocs_core::types::{DbId, Timestamp};
use hrdocs_db::models::onboarded_candidate::{ConsolidationOutcome, OnboardedCandidate};
use hrdocs_db::models::onboarding_section::{
    BankSection, DraftSections, EmploymentSection, IdentitySection, OfferSection,
    QualificationSection,
};
use hrdocs_db::models::section_attachment::AttachmentMeta;
use hrdocs_db::repositories::{AttachmentRepo, CandidateRepo, SectionRepo};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::letter_support::file_response;
use crate::error::{AppError, AppResult};
use crate::extract::SectionRequest;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Digits of Aadhaar/PAN left visible in views.
const ID_VISIBLE_CHARS: usize = 4;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A section as returned to clients, with its attachment metadata.
#[derive(Debug, Serialize)]
pub struct SectionView<T: Serialize> {
    #[serde(flatten)]
    pub section: T,
    pub attachments: Vec<AttachmentMeta>,
}

#[derive(Debug, Serialize)]
pub struct IdentityView {
    pub draft_id: String,
    pub first_name: String,
    pub last_name: String,
    pub father_name: Option<String>,
    pub email: String,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub status: String,
    pub updated_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct BankView {
    pub draft_id: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub branch_name: Option<String>,
    pub status: String,
    pub updated_at: Timestamp,
}

/// Every saved section of a draft plus its progress.
#[derive(Debug, Serialize)]
pub struct DraftView {
    pub draft_id: String,
    pub progress: OnboardingProgress,
    pub identity: Option<SectionView<IdentityView>>,
    pub qualification: Option<SectionView<QualificationSection>>,
    pub offer: Option<SectionView<OfferSection>>,
    pub bank: Option<SectionView<BankView>>,
    pub employment: Option<SectionView<EmploymentSection>>,
}

fn identity_view(state: &AppState, row: IdentitySection) -> AppResult<IdentityView> {
    let reveal = |blob: &Option<String>| -> AppResult<Option<String>> {
        blob.as_deref()
            .map(|b| state.cipher.decrypt(b).map(|v| mask_tail(&v, ID_VISIBLE_CHARS)))
            .transpose()
            .map_err(AppError::from)
    };
    Ok(IdentityView {
        aadhaar_number: reveal(&row.aadhaar_encrypted)?,
        pan_number: reveal(&row.pan_encrypted)?,
        draft_id: row.draft_id,
        first_name: row.first_name,
        last_name: row.last_name,
        father_name: row.father_name,
        email: row.email,
        country_code: row.country_code,
        phone: row.phone,
        status: row.status,
        updated_at: row.updated_at,
    })
}

fn bank_view(state: &AppState, row: BankSection) -> AppResult<BankView> {
    Ok(BankView {
        account_number: masked_account(&row.account_last4),
        ifsc_code: state.cipher.decrypt(&row.ifsc_encrypted)?,
        draft_id: row.draft_id,
        bank_name: row.bank_name,
        branch_name: row.branch_name,
        status: row.status,
        updated_at: row.updated_at,
    })
}

fn with_attachments<T: Serialize>(section: T, attachments: Vec<AttachmentMeta>) -> SectionView<T> {
    SectionView {
        section,
        attachments,
    }
}

async fn section_attachments(
    state: &AppState,
    draft_id: &str,
    section: Section,
) -> AppResult<Vec<AttachmentMeta>> {
    Ok(AttachmentRepo::list_meta(&state.pool, draft_id, Some(section)).await?)
}

// ---------------------------------------------------------------------------
// Save helpers
// ---------------------------------------------------------------------------

/// Checks shared by every section save: the draft is still open, later
/// sections have an identity to attach to, uploads are well formed and
/// mandatory slots are covered by this request or an earlier one.
async fn prepare_save(
    state: &AppState,
    draft_id: &str,
    section: Section,
    uploads: &[AttachmentUpload],
) -> AppResult<()> {
    if CandidateRepo::find_by_draft_id(&state.pool, draft_id)
        .await?
        .is_some()
    {
        return Err(already_submitted(draft_id));
    }
    if section != Section::Identity
        && SectionRepo::find_identity(&state.pool, draft_id)
            .await?
            .is_none()
    {
        return Err(AppError::Core(CoreError::not_found(
            "Onboarding draft",
            draft_id,
        )));
    }

    validate_uploads(section, uploads)?;
    let stored = AttachmentRepo::stored_slots(&state.pool, draft_id, section).await?;
    state.attachment_policy.check(section, uploads, &stored)?;
    Ok(())
}

fn already_submitted(draft_id: &str) -> AppError {
    AppError::Core(CoreError::AlreadySubmitted {
        draft_id: draft_id.to_string(),
    })
}

fn log_save(draft_id: &str, section: Section, uploads: &[AttachmentUpload], admin_id: DbId) {
    tracing::info!(
        draft_id,
        section = section.as_str(),
        attachments = uploads.len(),
        admin_id,
        "Onboarding section saved",
    );
}

// ---------------------------------------------------------------------------
// Section saves
// ---------------------------------------------------------------------------

/// POST /api/v1/onboarding/identity
///
/// Creates the draft on first save. The draft id comes from the payload
/// when given, otherwise it is derived from the Aadhaar and PAN numbers.
pub async fn save_identity(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    request: SectionRequest<IdentityPayload>,
) -> AppResult<Json<DataResponse<SectionView<IdentityView>>>> {
    let view = store_identity(&state, admin.admin_id, request).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/onboarding/{draft_id}/{section}
///
/// Saves one section of an existing draft. The body is the section's JSON
/// payload, or multipart with a `data` part and one file part per slot.
pub async fn save_section(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((draft_id, section)): Path<(String, String)>,
    request: Request,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let draft_id = validate_draft_id(&draft_id)?;
    let section: Section = section.parse()?;
    let actor = admin.admin_id;

    let data = match section {
        Section::Identity => {
            let mut request = read_section::<IdentityPayload>(request, &state).await?;
            if let Some(given) = request.payload.draft_id.as_deref().map(str::trim) {
                if !given.is_empty() && given != draft_id {
                    return Err(CoreError::validation(
                        "draft_id",
                        "does not match the draft id in the path",
                    )
                    .into());
                }
            }
            request.payload.draft_id = Some(draft_id);
            to_value(store_identity(&state, actor, request).await?)?
        }
        Section::Qualification => {
            let request = read_section(request, &state).await?;
            to_value(store_qualification(&state, &draft_id, actor, request).await?)?
        }
        Section::Offer => {
            let request = read_section(request, &state).await?;
            to_value(store_offer(&state, &draft_id, actor, request).await?)?
        }
        Section::Bank => {
            let request = read_section(request, &state).await?;
            to_value(store_bank(&state, &draft_id, actor, request).await?)?
        }
        Section::Employment => {
            let request = read_section(request, &state).await?;
            to_value(store_employment(&state, &draft_id, actor, request).await?)?
        }
    };
    Ok(Json(DataResponse { data }))
}

async fn read_section<T>(request: Request, state: &AppState) -> AppResult<SectionRequest<T>>
where
    T: DeserializeOwned + Send,
{
    <SectionRequest<T> as FromRequest<AppState>>::from_request(request, state).await
}

async fn store_identity(
    state: &AppState,
    actor: DbId,
    request: SectionRequest<IdentityPayload>,
) -> AppResult<SectionView<IdentityView>> {
    let fields = request.payload.validate()?;
    let draft_id =
        fields.resolve_draft_id(request.payload.draft_id.as_deref(), &state.config.draft_id_salt)?;
    prepare_save(state, &draft_id, Section::Identity, &request.uploads).await?;

    let sealed = fields.seal(&state.cipher)?;
    let row = SectionRepo::upsert_identity(
        &state.pool,
        &draft_id,
        &sealed,
        &request.uploads,
        Some(actor),
    )
    .await?
    .ok_or_else(|| already_submitted(&draft_id))?;

    log_save(&draft_id, Section::Identity, &request.uploads, actor);
    let attachments = section_attachments(state, &draft_id, Section::Identity).await?;
    Ok(with_attachments(identity_view(state, row)?, attachments))
}

async fn store_qualification(
    state: &AppState,
    draft_id: &str,
    actor: DbId,
    request: SectionRequest<QualificationPayload>,
) -> AppResult<SectionView<QualificationSection>> {
    let fields = request.payload.validate()?;
    prepare_save(state, draft_id, Section::Qualification, &request.uploads).await?;

    let row = SectionRepo::upsert_qualification(
        &state.pool,
        draft_id,
        &fields,
        &request.uploads,
        Some(actor),
    )
    .await?
    .ok_or_else(|| already_submitted(draft_id))?;

    log_save(draft_id, Section::Qualification, &request.uploads, actor);
    let attachments = section_attachments(state, draft_id, Section::Qualification).await?;
    Ok(with_attachments(row, attachments))
}

async fn store_offer(
    state: &AppState,
    draft_id: &str,
    actor: DbId,
    request: SectionRequest<OfferPayload>,
) -> AppResult<SectionView<OfferSection>> {
    let fields = request.payload.validate(&state.salary_structure())?;
    prepare_save(state, draft_id, Section::Offer, &request.uploads).await?;

    let row = SectionRepo::upsert_offer(&state.pool, draft_id, &fields, &request.uploads, Some(actor))
        .await?
        .ok_or_else(|| already_submitted(draft_id))?;

    log_save(draft_id, Section::Offer, &request.uploads, actor);
    let attachments = section_attachments(state, draft_id, Section::Offer).await?;
    Ok(with_attachments(row, attachments))
}

async fn store_bank(
    state: &AppState,
    draft_id: &str,
    actor: DbId,
    request: SectionRequest<BankPayload>,
) -> AppResult<SectionView<BankView>> {
    let fields = request.payload.validate()?;
    prepare_save(state, draft_id, Section::Bank, &request.uploads).await?;

    let sealed = fields.seal(&state.cipher)?;
    let row = SectionRepo::upsert_bank(&state.pool, draft_id, &sealed, &request.uploads, Some(actor))
        .await?
        .ok_or_else(|| already_submitted(draft_id))?;

    log_save(draft_id, Section::Bank, &request.uploads, actor);
    let attachments = section_attachments(state, draft_id, Section::Bank).await?;
    Ok(with_attachments(bank_view(state, row)?, attachments))
}

async fn store_employment(
    state: &AppState,
    draft_id: &str,
    actor: DbId,
    request: SectionRequest<EmploymentPayload>,
) -> AppResult<SectionView<EmploymentSection>> {
    let fields = request.payload.validate(&state.salary_structure())?;
    prepare_save(state, draft_id, Section::Employment, &request.uploads).await?;

    let row = SectionRepo::upsert_employment(
        &state.pool,
        draft_id,
        &fields,
        &request.uploads,
        Some(actor),
    )
    .await?
    .ok_or_else(|| already_submitted(draft_id))?;

    log_save(draft_id, Section::Employment, &request.uploads, actor);
    let attachments = section_attachments(state, draft_id, Section::Employment).await?;
    Ok(with_attachments(row, attachments))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

async fn load_draft(state: &AppState, draft_id: &str) -> AppResult<(DraftSections, bool)> {
    let sections = SectionRepo::load_all(&state.pool, draft_id).await?;
    let consolidated = CandidateRepo::find_by_draft_id(&state.pool, draft_id)
        .await?
        .is_some();
    if sections.present().is_empty() && !consolidated {
        return Err(AppError::Core(CoreError::not_found(
            "Onboarding draft",
            draft_id,
        )));
    }
    Ok((sections, consolidated))
}

/// GET /api/v1/onboarding/{draft_id}
pub async fn get_draft(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(draft_id): Path<String>,
) -> AppResult<Json<DataResponse<DraftView>>> {
    let draft_id = validate_draft_id(&draft_id)?;
    let (sections, consolidated) = load_draft(&state, &draft_id).await?;
    let progress = OnboardingProgress::build(&draft_id, &sections.present(), consolidated);

    let mut by_section: HashMap<String, Vec<AttachmentMeta>> = HashMap::new();
    for meta in AttachmentRepo::list_meta(&state.pool, &draft_id, None).await? {
        by_section.entry(meta.section.clone()).or_default().push(meta);
    }
    let mut take = |section: Section| by_section.remove(section.as_str()).unwrap_or_default();

    let identity = sections
        .identity
        .map(|row| identity_view(&state, row))
        .transpose()?
        .map(|view| with_attachments(view, take(Section::Identity)));
    let qualification = sections
        .qualification
        .map(|row| with_attachments(row, take(Section::Qualification)));
    let offer = sections
        .offer
        .map(|row| with_attachments(row, take(Section::Offer)));
    let bank = sections
        .bank
        .map(|row| bank_view(&state, row))
        .transpose()?
        .map(|view| with_attachments(view, take(Section::Bank)));
    let employment = sections
        .employment
        .map(|row| with_attachments(row, take(Section::Employment)));

    Ok(Json(DataResponse {
        data: DraftView {
            draft_id,
            progress,
            identity,
            qualification,
            offer,
            bank,
            employment,
        },
    }))
}

/// GET /api/v1/onboarding/{draft_id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(draft_id): Path<String>,
) -> AppResult<Json<DataResponse<OnboardingProgress>>> {
    let draft_id = validate_draft_id(&draft_id)?;
    let (sections, consolidated) = load_draft(&state, &draft_id).await?;
    Ok(Json(DataResponse {
        data: OnboardingProgress::build(&draft_id, &sections.present(), consolidated),
    }))
}

/// GET /api/v1/onboarding/{draft_id}/{section}
pub async fn get_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((draft_id, section)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let draft_id = validate_draft_id(&draft_id)?;
    let section: Section = section.parse()?;
    let missing = || {
        AppError::Core(CoreError::not_found(
            "Onboarding section",
            format!("{draft_id}/{section}"),
        ))
    };
    let attachments = section_attachments(&state, &draft_id, section).await?;

    let value = match section {
        Section::Identity => {
            let row = SectionRepo::find_identity(&state.pool, &draft_id)
                .await?
                .ok_or_else(missing)?;
            to_value(with_attachments(identity_view(&state, row)?, attachments))?
        }
        Section::Qualification => {
            let row = SectionRepo::find_qualification(&state.pool, &draft_id)
                .await?
                .ok_or_else(missing)?;
            to_value(with_attachments(row, attachments))?
        }
        Section::Offer => {
            let row = SectionRepo::find_offer(&state.pool, &draft_id)
                .await?
                .ok_or_else(missing)?;
            to_value(with_attachments(row, attachments))?
        }
        Section::Bank => {
            let row = SectionRepo::find_bank(&state.pool, &draft_id)
                .await?
                .ok_or_else(missing)?;
            to_value(with_attachments(bank_view(&state, row)?, attachments))?
        }
        Section::Employment => {
            let row = SectionRepo::find_employment(&state.pool, &draft_id)
                .await?
                .ok_or_else(missing)?;
            to_value(with_attachments(row, attachments))?
        }
    };
    Ok(Json(DataResponse { data: value }))
}

fn to_value<T: Serialize>(view: T) -> AppResult<serde_json::Value> {
    serde_json::to_value(view)
        .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))
}

/// GET /api/v1/onboarding/{draft_id}/{section}/attachments/{slot}
pub async fn download_attachment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((draft_id, section, slot)): Path<(String, String, String)>,
) -> AppResult<Response> {
    let draft_id = validate_draft_id(&draft_id)?;
    let section: Section = section.parse()?;
    let file = AttachmentRepo::find_file(&state.pool, &draft_id, section, &slot)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::not_found(
                "Attachment",
                format!("{draft_id}/{section}/{slot}"),
            ))
        })?;
    Ok(file_response(&file.file_name, &file.mime_type, file.content))
}

// ---------------------------------------------------------------------------
// Final submit
// ---------------------------------------------------------------------------

/// POST /api/v1/onboarding/{draft_id}/submit
///
/// Consolidates the five sections into the final candidate record. Fails
/// with 409 when already consolidated and 422 naming the first missing
/// section otherwise.
pub async fn submit(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(draft_id): Path<String>,
) -> AppResult<(StatusCode, Json<DataResponse<OnboardedCandidate>>)> {
    let draft_id = validate_draft_id(&draft_id)?;
    match CandidateRepo::consolidate(&state.pool, &draft_id, Some(admin.admin_id)).await? {
        ConsolidationOutcome::Consolidated(candidate) => {
            tracing::info!(
                draft_id = %draft_id,
                candidate_id = candidate.id,
                admin_id = admin.admin_id,
                "Onboarding consolidated",
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: candidate })))
        }
        ConsolidationOutcome::Rejected(err) => {
            tracing::debug!(draft_id = %draft_id, error = %err, "Onboarding submit rejected");
            Err(err.into())
        }
    }
}
