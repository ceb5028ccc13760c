//! Section attachment rows.

use hrdocs_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Attachment metadata without the file content.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub id: DbId,
    pub draft_id: String,
    pub section: String,
    pub slot: String,
    pub file_name: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub content_sha256: String,
    pub uploaded_at: Timestamp,
}

/// Attachment including its bytes, for download.
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentFile {
    pub file_name: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub content: Vec<u8>,
}
