//! Handlers for the `/relieving-letters` resource.
//!
//! Relieving letters are immutable once issued: there is no update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hrdocs_core::error::CoreError;
use hrdocs_core::letters::RelievingLetterPayload;
use hrdocs_core::render::documents::relieving_letter_document;
use hrdocs_core::types::DbId;
use hrdocs_db::models::letters::RelievingLetter;
use hrdocs_db::repositories::RelievingLetterRepo;
use hrdocs_db::{clamp_limit, clamp_offset};

use super::letter_support::{ensure_can_delete, RenderedLetter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

async fn load(state: &AppState, id: DbId) -> AppResult<RelievingLetter> {
    RelievingLetterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Relieving letter", id)))
}

/// POST /api/v1/relieving-letters
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<RelievingLetterPayload>,
) -> AppResult<(StatusCode, Json<DataResponse<RelievingLetter>>)> {
    let fields = input.validate()?;
    let letter = RelievingLetterRepo::create(&state.pool, &fields, admin.admin_id).await?;

    tracing::info!(
        relieving_letter_id = letter.id,
        admin_id = admin.admin_id,
        "Relieving letter created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: letter })))
}

/// GET /api/v1/relieving-letters
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<RelievingLetter>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let items = RelievingLetterRepo::list(&state.pool, limit, offset).await?;
    let total = RelievingLetterRepo::count(&state.pool).await?;
    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/relieving-letters/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RelievingLetter>>> {
    Ok(Json(DataResponse {
        data: load(&state, id).await?,
    }))
}

/// DELETE /api/v1/relieving-letters/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let letter = load(&state, id).await?;
    ensure_can_delete(&admin, letter.created_by)?;

    if !RelievingLetterRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Relieving letter", id)));
    }
    tracing::info!(
        relieving_letter_id = id,
        admin_id = admin.admin_id,
        "Relieving letter deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/relieving-letters/{id}/pdf
///
/// The letter is dated on the day it is downloaded.
pub async fn download(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<RenderedLetter> {
    let fields = load(&state, id).await?.to_fields();
    let document =
        relieving_letter_document(&fields, &state.config.company_name, Utc::now().date_naive());
    RenderedLetter::render(&state, &document)
}
