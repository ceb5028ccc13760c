//! Route definitions for the onboarding workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at `/onboarding`.
///
/// ```text
/// POST /identity                                   -> save_identity
/// GET  /{draft_id}                                 -> get_draft
/// GET  /{draft_id}/progress                        -> get_progress
/// POST /{draft_id}/submit                          -> submit
/// GET  /{draft_id}/{section}                       -> get_section
/// POST /{draft_id}/{section}                       -> save_section
/// GET  /{draft_id}/{section}/attachments/{slot}    -> download_attachment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/identity", post(onboarding::save_identity))
        .route("/{draft_id}", get(onboarding::get_draft))
        .route("/{draft_id}/progress", get(onboarding::get_progress))
        .route("/{draft_id}/submit", post(onboarding::submit))
        .route(
            "/{draft_id}/{section}",
            get(onboarding::get_section).post(onboarding::save_section),
        )
        .route(
            "/{draft_id}/{section}/attachments/{slot}",
            get(onboarding::download_attachment),
        )
}
