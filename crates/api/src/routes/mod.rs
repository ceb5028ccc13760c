pub mod auth;
pub mod candidates;
pub mod health;
pub mod letters;
pub mod onboarding;
pub mod salary;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (bootstrap or super admin)
/// /auth/login                                      login (public)
/// /auth/forgot-password                            request reset code (public)
/// /auth/reset-password                             reset with code (public)
/// /auth/me                                         current admin
///
/// /salary-structure                                get, replace (replace: super admin)
/// /salary-structure/breakdown                      preview breakdown (POST)
///
/// /offer-letters                                   list, create
/// /offer-letters/preview                           render PDF without saving (POST)
/// /offer-letters/{id}                              get, update, delete
/// /offer-letters/{id}/pdf                          download PDF
/// /offer-letters/{id}/email                        e-mail PDF to candidate (POST)
///
/// /appointment-letters                             list, create
/// /appointment-letters/{id}                        get, update, delete
/// /appointment-letters/{id}/pdf                    download PDF
///
/// /relieving-letters                               list, create
/// /relieving-letters/{id}                          get, delete
/// /relieving-letters/{id}/pdf                      download PDF
///
/// /onboarding/identity                             save identity, creating the draft (POST)
/// /onboarding/{draft_id}                           all sections + progress
/// /onboarding/{draft_id}/progress                  progress only
/// /onboarding/{draft_id}/submit                    consolidate (POST)
/// /onboarding/{draft_id}/{section}                 get, save
/// /onboarding/{draft_id}/{section}/attachments/{slot}  download attachment
///
/// /candidates                                      list (search, paginated)
/// /candidates/summary                              dashboard counts
/// /candidates/{key}                                get, delete (delete: super admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/salary-structure", salary::router())
        // Letters.
        .nest("/offer-letters", letters::offer_router())
        .nest("/appointment-letters", letters::appointment_router())
        .nest("/relieving-letters", letters::relieving_router())
        // Onboarding drafts and consolidated candidates.
        .nest("/onboarding", onboarding::router())
        .nest("/candidates", candidates::router())
}
