//! Route definitions for offer, appointment and relieving letters.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{appointment_letters, offer_letters, relieving_letters};
use crate::state::AppState;

/// Routes mounted at `/offer-letters`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// POST   /preview       -> preview
/// GET    /{id}          -> get
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/pdf      -> download
/// POST   /{id}/email    -> email
/// ```
pub fn offer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(offer_letters::list).post(offer_letters::create))
        .route("/preview", post(offer_letters::preview))
        .route(
            "/{id}",
            get(offer_letters::get)
                .put(offer_letters::update)
                .delete(offer_letters::delete),
        )
        .route("/{id}/pdf", get(offer_letters::download))
        .route("/{id}/email", post(offer_letters::email))
}

/// Routes mounted at `/appointment-letters`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/pdf      -> download
/// ```
pub fn appointment_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(appointment_letters::list).post(appointment_letters::create),
        )
        .route(
            "/{id}",
            get(appointment_letters::get)
                .put(appointment_letters::update)
                .delete(appointment_letters::delete),
        )
        .route("/{id}/pdf", get(appointment_letters::download))
}

/// Routes mounted at `/relieving-letters`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get
/// DELETE /{id}          -> delete
/// GET    /{id}/pdf      -> download
/// ```
pub fn relieving_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(relieving_letters::list).post(relieving_letters::create),
        )
        .route(
            "/{id}",
            get(relieving_letters::get).delete(relieving_letters::delete),
        )
        .route("/{id}/pdf", get(relieving_letters::download))
}
