//! Route definitions for consolidated candidates.

use axum::routing::get;
use axum::Router;

use crate::handlers::candidates;
use crate::state::AppState;

/// Routes mounted at `/candidates`.
///
/// ```text
/// GET    /            -> list
/// GET    /summary     -> summary
/// GET    /{key}       -> get
/// DELETE /{key}       -> delete (super admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(candidates::list))
        .route("/summary", get(candidates::summary))
        .route("/{key}", get(candidates::get).delete(candidates::delete))
}
