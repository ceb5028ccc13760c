//! Request extractors shared by handlers.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use hrdocs_core::attachments::AttachmentUpload;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the multipart part carrying the JSON section payload.
pub const DATA_PART: &str = "data";

/// A section save: JSON payload plus any uploaded files.
///
/// Accepts either a plain JSON body (no files) or `multipart/form-data`
/// with a `data` part holding the JSON payload and one file part per
/// attachment slot, the part name being the slot name.
#[derive(Debug)]
pub struct SectionRequest<T> {
    pub payload: T,
    pub uploads: Vec<AttachmentUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

impl<T> FromRequest<AppState> for SectionRequest<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Json(payload) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self {
                payload,
                uploads: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut payload: Option<T> = None;
        let mut uploads = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == DATA_PART {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                payload = Some(serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::BadRequest(format!("Invalid '{DATA_PART}' part: {e}"))
                })?);
                continue;
            }

            let file_name = field.file_name().unwrap_or(name.as_str()).to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            uploads.push(AttachmentUpload {
                slot: name,
                file_name,
                mime_type,
                content: content.to_vec(),
            });
        }

        let payload = payload
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{DATA_PART}' part")))?;
        Ok(Self { payload, uploads })
    }
}
