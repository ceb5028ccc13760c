//! Route definitions for the salary structure.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::salary;
use crate::state::AppState;

/// Routes mounted at `/salary-structure`.
///
/// ```text
/// GET  /            -> get_structure
/// PUT  /            -> replace_structure (super admin)
/// POST /breakdown   -> preview_breakdown
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(salary::get_structure).put(salary::replace_structure),
        )
        .route("/breakdown", post(salary::preview_breakdown))
}
