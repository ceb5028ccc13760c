//! Helpers shared by the letter handlers: ownership checks, rendering and
//! download responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hrdocs_core::error::CoreError;
use hrdocs_core::render::LetterDocument;
use hrdocs_core::types::DbId;
use hrdocs_events::EmailAttachment;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::state::AppState;

/// Default and maximum page size for letter listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Super admins may delete any letter; other admins only their own.
pub fn ensure_can_delete(admin: &AuthAdmin, created_by: Option<DbId>) -> AppResult<()> {
    if admin.is_super_admin() || created_by == Some(admin.admin_id) {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Only the issuing admin or a super admin may delete this letter".into(),
    )))
}

/// A rendered letter ready to be downloaded or attached to an e-mail.
pub struct RenderedLetter {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedLetter {
    pub fn render(state: &AppState, document: &LetterDocument) -> AppResult<Self> {
        let bytes = state.renderer.render(document)?;
        Ok(Self {
            file_name: format!("{}.{}", document.file_stem, state.renderer.file_extension()),
            content_type: state.renderer.content_type(),
            bytes,
        })
    }

    pub fn into_attachment(self) -> EmailAttachment {
        EmailAttachment {
            file_name: self.file_name,
            content_type: self.content_type.to_string(),
            content: self.bytes,
        }
    }
}

impl IntoResponse for RenderedLetter {
    fn into_response(self) -> Response {
        file_response(&self.file_name, self.content_type, self.bytes)
    }
}

/// `200 OK` with `Content-Disposition: attachment`.
pub fn file_response(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', "_"));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
