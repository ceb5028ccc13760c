//! Identity (basic info) section.
//!
//! The first section a candidate saves. Its two government ID numbers seed
//! the draft id when the request does not carry one.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::crypto::{FieldCipher, ProtectedValue};
use crate::draft_id::{derive_draft_id, normalize_identifier, validate_draft_id};
use crate::error::CoreError;
use crate::validation::{optional_text, require_email, require_text};

static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid regex"));
static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,15}$").expect("valid regex"));
static COUNTRY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{1,4}$").expect("valid regex"));

/// Request body for an identity save.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityPayload {
    pub draft_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub email: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
}

/// Validated identity values, ID numbers still in clear text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFields {
    pub first_name: String,
    pub last_name: String,
    pub father_name: Option<String>,
    pub email: String,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    /// `None` keeps the stored number.
    pub aadhaar_number: Option<String>,
    /// `None` keeps the stored number.
    pub pan_number: Option<String>,
}

/// Identity values ready for storage: ID numbers encrypted and hashed.
#[derive(Debug, Clone)]
pub struct SealedIdentity {
    pub first_name: String,
    pub last_name: String,
    pub father_name: Option<String>,
    pub email: String,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub aadhaar: Option<ProtectedValue>,
    pub pan: Option<ProtectedValue>,
}

impl IdentityPayload {
    pub fn validate(&self) -> Result<IdentityFields, CoreError> {
        let first_name = require_text("first_name", &self.first_name)?;
        let last_name = require_text("last_name", &self.last_name)?;
        let father_name = optional_text("father_name", &self.father_name)?;
        let email = require_email("email", &self.email)?;

        let country_code = optional_text("country_code", &self.country_code)?;
        if let Some(code) = &country_code {
            if !COUNTRY_CODE_RE.is_match(code) {
                return Err(CoreError::validation(
                    "country_code",
                    "must look like +91",
                ));
            }
        }

        let phone = optional_text("phone", &self.phone)?
            .map(|p| p.chars().filter(|c| !c.is_whitespace() && *c != '-').collect::<String>());
        if let Some(phone) = &phone {
            if !PHONE_RE.is_match(phone) {
                return Err(CoreError::validation("phone", "must contain 7 to 15 digits"));
            }
        }

        let aadhaar_number = optional_text("aadhaar_number", &self.aadhaar_number)?
            .map(|v| normalize_identifier(&v));
        if let Some(aadhaar) = &aadhaar_number {
            if !AADHAAR_RE.is_match(aadhaar) {
                return Err(CoreError::validation(
                    "aadhaar_number",
                    "must be exactly 12 digits",
                ));
            }
        }

        let pan_number =
            optional_text("pan_number", &self.pan_number)?.map(|v| normalize_identifier(&v));
        if let Some(pan) = &pan_number {
            if !PAN_RE.is_match(pan) {
                return Err(CoreError::validation(
                    "pan_number",
                    "must match the format ABCDE1234F",
                ));
            }
        }

        Ok(IdentityFields {
            first_name,
            last_name,
            father_name,
            email,
            country_code,
            phone,
            aadhaar_number,
            pan_number,
        })
    }
}

impl IdentityFields {
    /// Resolve the draft id for this save.
    ///
    /// An explicit id wins; otherwise it is derived from the ID numbers,
    /// which then must both be present.
    pub fn resolve_draft_id(&self, explicit: Option<&str>, salt: &str) -> Result<String, CoreError> {
        match explicit.map(str::trim).filter(|v| !v.is_empty()) {
            Some(id) => validate_draft_id(id),
            None => derive_draft_id(
                self.aadhaar_number.as_deref().unwrap_or_default(),
                self.pan_number.as_deref().unwrap_or_default(),
                salt,
            ),
        }
    }

    pub fn seal(self, cipher: &FieldCipher) -> Result<SealedIdentity, CoreError> {
        Ok(SealedIdentity {
            aadhaar: self
                .aadhaar_number
                .as_deref()
                .map(|v| cipher.protect(v))
                .transpose()?,
            pan: self.pan_number.as_deref().map(|v| cipher.protect(v)).transpose()?,
            first_name: self.first_name,
            last_name: self.last_name,
            father_name: self.father_name,
            email: self.email,
            country_code: self.country_code,
            phone: self.phone,
        })
    }
}
