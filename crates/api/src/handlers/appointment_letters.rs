//! Handlers for the `/appointment-letters` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hrdocs_core::error::CoreError;
use hrdocs_core::letters::AppointmentLetterPayload;
use hrdocs_core::render::documents::appointment_letter_document;
use hrdocs_core::types::DbId;
use hrdocs_db::models::letters::AppointmentLetter;
use hrdocs_db::repositories::AppointmentLetterRepo;
use hrdocs_db::{clamp_limit, clamp_offset};

use super::letter_support::{ensure_can_delete, RenderedLetter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

async fn load(state: &AppState, id: DbId) -> AppResult<AppointmentLetter> {
    AppointmentLetterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Appointment letter", id)))
}

/// POST /api/v1/appointment-letters
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<AppointmentLetterPayload>,
) -> AppResult<(StatusCode, Json<DataResponse<AppointmentLetter>>)> {
    let fields = input.apply(None, &state.salary_structure(), Utc::now().date_naive())?;
    let letter = AppointmentLetterRepo::create(&state.pool, &fields, admin.admin_id).await?;

    tracing::info!(
        appointment_letter_id = letter.id,
        admin_id = admin.admin_id,
        "Appointment letter created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: letter })))
}

/// GET /api/v1/appointment-letters
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<AppointmentLetter>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let items = AppointmentLetterRepo::list(&state.pool, limit, offset).await?;
    let total = AppointmentLetterRepo::count(&state.pool).await?;
    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/appointment-letters/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AppointmentLetter>>> {
    Ok(Json(DataResponse {
        data: load(&state, id).await?,
    }))
}

/// PUT /api/v1/appointment-letters/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AppointmentLetterPayload>,
) -> AppResult<Json<DataResponse<AppointmentLetter>>> {
    let existing = load(&state, id).await?.to_fields();
    let fields = input.apply(
        Some(&existing),
        &state.salary_structure(),
        Utc::now().date_naive(),
    )?;
    let letter = AppointmentLetterRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Appointment letter", id)))?;

    tracing::info!(
        appointment_letter_id = id,
        admin_id = admin.admin_id,
        "Appointment letter updated",
    );
    Ok(Json(DataResponse { data: letter }))
}

/// DELETE /api/v1/appointment-letters/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let letter = load(&state, id).await?;
    ensure_can_delete(&admin, letter.created_by)?;

    if !AppointmentLetterRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Appointment letter", id)));
    }
    tracing::info!(
        appointment_letter_id = id,
        admin_id = admin.admin_id,
        "Appointment letter deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/appointment-letters/{id}/pdf
pub async fn download(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<RenderedLetter> {
    let fields = load(&state, id).await?.to_fields();
    let document = appointment_letter_document(&fields, &state.config.company_name);
    RenderedLetter::render(&state, &document)
}
