//! Handlers for the `/offer-letters` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hrdocs_core::error::CoreError;
use hrdocs_core::letters::{OfferLetterPayload, OfferStatus};
use hrdocs_core::render::documents::offer_letter_document;
use hrdocs_core::types::DbId;
use hrdocs_core::validation::require_email;
use hrdocs_db::models::letters::OfferLetter;
use hrdocs_db::repositories::OfferLetterRepo;
use hrdocs_db::{clamp_limit, clamp_offset};
use hrdocs_events::{dispatch, OutboundEmail};
use serde::Deserialize;

use super::letter_support::{ensure_can_delete, RenderedLetter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailOfferRequest {
    pub candidate_email: Option<String>,
}

async fn load(state: &AppState, id: DbId) -> AppResult<OfferLetter> {
    OfferLetterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Offer letter", id)))
}

/// POST /api/v1/offer-letters
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<OfferLetterPayload>,
) -> AppResult<(StatusCode, Json<DataResponse<OfferLetter>>)> {
    let fields = input.apply(None, &state.salary_structure(), Utc::now().date_naive())?;
    let letter = OfferLetterRepo::create(&state.pool, &fields, admin.admin_id).await?;

    tracing::info!(
        offer_letter_id = letter.id,
        admin_id = admin.admin_id,
        ctc = letter.ctc_amount,
        "Offer letter created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: letter })))
}

/// GET /api/v1/offer-letters
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<OfferLetter>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let items = OfferLetterRepo::list(&state.pool, limit, offset).await?;
    let total = OfferLetterRepo::count(&state.pool).await?;
    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/offer-letters/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OfferLetter>>> {
    let letter = load(&state, id).await?;
    Ok(Json(DataResponse { data: letter }))
}

/// PUT /api/v1/offer-letters/{id}
///
/// Absent fields keep their stored values; the breakdown is recomputed only
/// when the CTC changes.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<OfferLetterPayload>,
) -> AppResult<Json<DataResponse<OfferLetter>>> {
    let existing = load(&state, id).await?.to_fields()?;
    let fields = input.apply(
        Some(&existing),
        &state.salary_structure(),
        Utc::now().date_naive(),
    )?;
    let letter = OfferLetterRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Offer letter", id)))?;

    tracing::info!(offer_letter_id = id, admin_id = admin.admin_id, "Offer letter updated");
    Ok(Json(DataResponse { data: letter }))
}

/// DELETE /api/v1/offer-letters/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let letter = load(&state, id).await?;
    ensure_can_delete(&admin, letter.created_by)?;

    if !OfferLetterRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Offer letter", id)));
    }
    tracing::info!(offer_letter_id = id, admin_id = admin.admin_id, "Offer letter deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/offer-letters/{id}/pdf
pub async fn download(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<RenderedLetter> {
    let fields = load(&state, id).await?.to_fields()?;
    let document = offer_letter_document(&fields, &state.config.company_name);
    RenderedLetter::render(&state, &document)
}

/// POST /api/v1/offer-letters/preview
///
/// Renders the PDF for an unsaved payload. Nothing is persisted.
pub async fn preview(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<OfferLetterPayload>,
) -> AppResult<RenderedLetter> {
    let fields = input.apply(None, &state.salary_structure(), Utc::now().date_naive())?;
    let document = offer_letter_document(&fields, &state.config.company_name);
    tracing::debug!(admin_id = admin.admin_id, "Offer letter preview rendered");
    RenderedLetter::render(&state, &document)
}

/// POST /api/v1/offer-letters/{id}/email
///
/// Renders the PDF, hands it to the notifier and marks the offer `sent`.
/// Delivery runs in the background; failures are logged only.
pub async fn email(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<EmailOfferRequest>,
) -> AppResult<Json<DataResponse<OfferLetter>>> {
    let to = require_email("candidate_email", &input.candidate_email)?;
    let fields = load(&state, id).await?.to_fields()?;
    let document = offer_letter_document(&fields, &state.config.company_name);
    let rendered = RenderedLetter::render(&state, &document)?;

    dispatch(
        state.notifier.clone(),
        OutboundEmail {
            to,
            subject: format!("Offer of Employment - {}", fields.position),
            body: format!(
                "Dear {},\n\nPlease find attached your offer letter for the position of {} \
                 at {}.\n\nRegards,\nHuman Resources",
                fields.candidate_name, fields.position, state.config.company_name
            ),
            attachments: vec![rendered.into_attachment()],
        },
    );

    let letter = OfferLetterRepo::set_status(&state.pool, id, OfferStatus::Sent)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Offer letter", id)))?;

    tracing::info!(offer_letter_id = id, admin_id = admin.admin_id, "Offer letter e-mailed");
    Ok(Json(DataResponse { data: letter }))
}
