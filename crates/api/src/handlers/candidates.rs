//! Handlers for consolidated (onboarded) candidates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hrdocs_core::error::CoreError;
use hrdocs_db::models::onboarded_candidate::{CandidateSummary, OnboardedCandidate, OnboardingCounts};
use hrdocs_db::repositories::CandidateRepo;
use hrdocs_db::{clamp_limit, clamp_offset};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireSuperAdmin};
use crate::query::SearchParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// GET /api/v1/candidates?search=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Page<CandidateSummary>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let search = params.term();

    let items = CandidateRepo::list(&state.pool, search, limit, offset).await?;
    let total = CandidateRepo::count(&state.pool, search).await?;
    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/candidates/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<OnboardingCounts>>> {
    Ok(Json(DataResponse {
        data: CandidateRepo::counts(&state.pool).await?,
    }))
}

/// GET /api/v1/candidates/{key}
///
/// `key` is a draft id or the candidate's numeric id.
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<OnboardedCandidate>>> {
    let candidate = CandidateRepo::find_by_key(&state.pool, key.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Candidate", &key)))?;
    Ok(Json(DataResponse { data: candidate }))
}

/// DELETE /api/v1/candidates/{key}
///
/// Removes the consolidated record and every section and attachment of its
/// draft.
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    let draft_id = CandidateRepo::delete_cascade(&state.pool, key.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Candidate", &key)))?;

    tracing::info!(draft_id = %draft_id, admin_id = admin.admin_id, "Candidate deleted");
    Ok(StatusCode::NO_CONTENT)
}
