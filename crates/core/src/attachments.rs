//! Section attachment rules.
//!
//! Attachments live in named slots per section (`identity.aadhaar`,
//! `bank.bank_proof`, ...). A save replaces only the slots it carries; the
//! [`AttachmentPolicy`] decides which slots must be filled, either by this
//! request or by an earlier one.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::hashing::sha256_hex;
use crate::sections::Section;

/// Default mandatory slots when none are configured.
pub const DEFAULT_MANDATORY_ATTACHMENTS: &str = "identity.aadhaar,identity.pan,bank.bank_proof";

/// MIME types accepted for uploaded documents.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
];

/// One file received with a section save.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub slot: String,
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl AttachmentUpload {
    pub fn byte_size(&self) -> i64 {
        self.content.len() as i64
    }

    /// Fingerprint used to detect unchanged re-uploads.
    pub fn content_sha256(&self) -> String {
        sha256_hex(&self.content)
    }
}

/// Validate uploads for a section: known slot, one file per slot,
/// non-empty content, allowed MIME type.
pub fn validate_uploads(section: Section, uploads: &[AttachmentUpload]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for upload in uploads {
        let field = format!("{}.{}", section, upload.slot);
        if !section.accepts_slot(&upload.slot) {
            return Err(CoreError::validation(
                field,
                format!(
                    "unknown attachment slot. Must be one of: {}",
                    section.attachment_slots().join(", ")
                ),
            ));
        }
        if !seen.insert(upload.slot.as_str()) {
            return Err(CoreError::validation(field, "uploaded more than once"));
        }
        if upload.content.is_empty() {
            return Err(CoreError::validation(field, "file is empty"));
        }
        if upload.file_name.trim().is_empty() {
            return Err(CoreError::validation(field, "file name is required"));
        }
        if !ALLOWED_MIME_TYPES.contains(&upload.mime_type.as_str()) {
            return Err(CoreError::validation(
                field,
                format!("unsupported file type '{}'", upload.mime_type),
            ));
        }
    }
    Ok(())
}

/// Per-deployment set of mandatory `(section, slot)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentPolicy {
    mandatory: Vec<(Section, String)>,
}

impl AttachmentPolicy {
    /// Parse a comma-separated `section.slot` list.
    pub fn parse(spec: &str) -> Result<Self, CoreError> {
        let mut mandatory = Vec::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (section, slot) = entry.split_once('.').ok_or_else(|| {
                CoreError::validation(
                    "mandatory_attachments",
                    format!("entry '{entry}' must look like section.slot"),
                )
            })?;
            let section: Section = section.parse()?;
            if !section.accepts_slot(slot) {
                return Err(CoreError::validation(
                    "mandatory_attachments",
                    format!("section '{section}' has no slot '{slot}'"),
                ));
            }
            if !mandatory.iter().any(|(s, n)| *s == section && n == slot) {
                mandatory.push((section, slot.to_string()));
            }
        }
        Ok(Self { mandatory })
    }

    pub fn mandatory_slots(&self, section: Section) -> impl Iterator<Item = &str> {
        self.mandatory
            .iter()
            .filter(move |(s, _)| *s == section)
            .map(|(_, slot)| slot.as_str())
    }

    /// Reject only when a mandatory slot is neither uploaded now nor
    /// already stored.
    pub fn check(
        &self,
        section: Section,
        uploads: &[AttachmentUpload],
        stored_slots: &[String],
    ) -> Result<(), CoreError> {
        for slot in self.mandatory_slots(section) {
            let uploaded = uploads.iter().any(|u| u.slot == slot);
            let stored = stored_slots.iter().any(|s| s == slot);
            if !uploaded && !stored {
                return Err(CoreError::validation(
                    format!("{section}.{slot}"),
                    "attachment is required",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn upload(slot: &str) -> AttachmentUpload {
        AttachmentUpload {
            slot: slot.into(),
            file_name: format!("{slot}.pdf"),
            mime_type: "application/pdf".into(),
            content: b"%PDF-1.4".to_vec(),
        }
    }

    #[test]
    fn default_policy_parses() {
        let policy = AttachmentPolicy::parse(DEFAULT_MANDATORY_ATTACHMENTS).unwrap();
        let identity: Vec<_> = policy.mandatory_slots(Section::Identity).collect();
        assert_eq!(identity, vec!["aadhaar", "pan"]);
        assert_eq!(policy.mandatory_slots(Section::Qualification).count(), 0);
    }

    #[test]
    fn policy_rejects_unknown_slots() {
        assert!(AttachmentPolicy::parse("identity.passport").is_err());
        assert!(AttachmentPolicy::parse("payroll.slip").is_err());
        assert!(AttachmentPolicy::parse("identity").is_err());
    }

    #[test]
    fn mandatory_satisfied_by_upload_or_stored() {
        let policy = AttachmentPolicy::parse("identity.aadhaar,identity.pan").unwrap();
        assert!(policy
            .check(Section::Identity, &[upload("aadhaar"), upload("pan")], &[])
            .is_ok());
        assert!(policy
            .check(Section::Identity, &[upload("aadhaar")], &["pan".to_string()])
            .is_ok());
        assert!(policy
            .check(Section::Identity, &[], &["aadhaar".into(), "pan".into()])
            .is_ok());
    }

    #[test]
    fn mandatory_missing_everywhere_rejected() {
        let policy = AttachmentPolicy::parse("identity.aadhaar,identity.pan").unwrap();
        assert_matches!(
            policy.check(Section::Identity, &[upload("aadhaar")], &[]),
            Err(CoreError::Validation { field, .. }) if field == "identity.pan"
        );
    }

    #[test]
    fn od_mandatoriness_is_configurable() {
        let strict = AttachmentPolicy::parse("qualification.od").unwrap();
        assert!(strict.check(Section::Qualification, &[], &[]).is_err());
        let lax = AttachmentPolicy::parse("").unwrap();
        assert!(lax.check(Section::Qualification, &[], &[]).is_ok());
    }

    #[test]
    fn upload_validation() {
        assert!(validate_uploads(Section::Bank, &[upload("bank_proof")]).is_ok());
        assert!(validate_uploads(Section::Bank, &[upload("aadhaar")]).is_err());
        assert!(validate_uploads(Section::Bank, &[upload("bank_proof"), upload("bank_proof")]).is_err());

        let mut empty = upload("bank_proof");
        empty.content.clear();
        assert!(validate_uploads(Section::Bank, &[empty]).is_err());

        let mut exe = upload("bank_proof");
        exe.mime_type = "application/x-msdownload".into();
        assert!(validate_uploads(Section::Bank, &[exe]).is_err());
    }
}
