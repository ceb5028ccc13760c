//! Repository for the `section_attachments` table.

use hrdocs_core::attachments::AttachmentUpload;
use hrdocs_core::sections::Section;
use sqlx::PgPool;

use crate::models::section_attachment::{AttachmentFile, AttachmentMeta};

const META_COLUMNS: &str = "id, draft_id, section, slot, file_name, mime_type, byte_size, \
                            content_sha256, uploaded_at";

pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Metadata for a draft, optionally restricted to one section, in
    /// `(section, slot)` order.
    pub async fn list_meta(
        pool: &PgPool,
        draft_id: &str,
        section: Option<Section>,
    ) -> Result<Vec<AttachmentMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} FROM section_attachments
             WHERE draft_id = $1 AND ($2::TEXT IS NULL OR section = $2)
             ORDER BY section, slot"
        );
        sqlx::query_as::<_, AttachmentMeta>(&query)
            .bind(draft_id)
            .bind(section.map(Section::as_str))
            .fetch_all(pool)
            .await
    }

    /// Slot names already stored for one section of a draft.
    pub async fn stored_slots(
        pool: &PgPool,
        draft_id: &str,
        section: Section,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT slot FROM section_attachments
             WHERE draft_id = $1 AND section = $2
             ORDER BY slot",
        )
        .bind(draft_id)
        .bind(section.as_str())
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(slot,)| slot).collect())
    }

    pub async fn find_file(
        pool: &PgPool,
        draft_id: &str,
        section: Section,
        slot: &str,
    ) -> Result<Option<AttachmentFile>, sqlx::Error> {
        sqlx::query_as::<_, AttachmentFile>(
            "SELECT file_name, mime_type, byte_size, content FROM section_attachments
             WHERE draft_id = $1 AND section = $2 AND slot = $3",
        )
        .bind(draft_id)
        .bind(section.as_str())
        .bind(slot)
        .fetch_optional(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Upsert the uploaded slots within an existing transaction. Slots not
    /// present in `uploads` are left untouched. `uploaded_at` only moves
    /// when the file actually changed.
    pub(crate) async fn replace_slots_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        draft_id: &str,
        section: Section,
        uploads: &[AttachmentUpload],
    ) -> Result<(), sqlx::Error> {
        for upload in uploads {
            sqlx::query(
                "INSERT INTO section_attachments AS a
                    (draft_id, section, slot, file_name, mime_type, byte_size, content, content_sha256)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT ON CONSTRAINT uq_section_attachments_slot DO UPDATE SET
                    file_name = EXCLUDED.file_name,
                    mime_type = EXCLUDED.mime_type,
                    byte_size = EXCLUDED.byte_size,
                    content = EXCLUDED.content,
                    content_sha256 = EXCLUDED.content_sha256,
                    uploaded_at = CASE
                        WHEN a.content_sha256 = EXCLUDED.content_sha256
                             AND a.file_name = EXCLUDED.file_name
                             AND a.mime_type = EXCLUDED.mime_type
                        THEN a.uploaded_at
                        ELSE NOW()
                    END",
            )
            .bind(draft_id)
            .bind(section.as_str())
            .bind(&upload.slot)
            .bind(&upload.file_name)
            .bind(&upload.mime_type)
            .bind(upload.byte_size())
            .bind(&upload.content)
            .bind(upload.content_sha256())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub(crate) async fn list_meta_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        draft_id: &str,
    ) -> Result<Vec<AttachmentMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} FROM section_attachments
             WHERE draft_id = $1
             ORDER BY section, slot"
        );
        sqlx::query_as::<_, AttachmentMeta>(&query)
            .bind(draft_id)
            .fetch_all(&mut **tx)
            .await
    }
}
