//! Onboarding sections.
//!
//! A candidate's onboarding is split into five independently saved sections
//! sharing one draft id. Each section has an explicit request schema that
//! rejects unknown fields and a `validate()` step producing the normalised
//! values the repository layer persists.

pub mod bank;
pub mod employment;
pub mod identity;
pub mod offer;
pub mod qualification;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// The five onboarding sections, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Identity,
    Qualification,
    Offer,
    Bank,
    Employment,
}

impl Section {
    /// Canonical order; consolidation reports the first missing one.
    pub const ALL: [Section; 5] = [
        Section::Identity,
        Section::Qualification,
        Section::Offer,
        Section::Bank,
        Section::Employment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Qualification => "qualification",
            Self::Offer => "offer",
            Self::Bank => "bank",
            Self::Employment => "employment",
        }
    }

    /// Attachment slots a section accepts.
    pub fn attachment_slots(self) -> &'static [&'static str] {
        match self {
            Self::Identity => &["aadhaar", "pan"],
            Self::Qualification => &["marksheet", "od"],
            Self::Offer => &["offer_letter"],
            Self::Bank => &["bank_proof"],
            Self::Employment => &["offer_letter", "payslip", "relieving_letter"],
        }
    }

    pub fn accepts_slot(self, slot: &str) -> bool {
        self.attachment_slots().contains(&slot)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "qualification" => Ok(Self::Qualification),
            "offer" => Ok(Self::Offer),
            "bank" => Ok(Self::Bank),
            "employment" => Ok(Self::Employment),
            _ => Err(CoreError::validation(
                "section",
                format!(
                    "unknown section '{s}'. Must be one of: identity, qualification, offer, bank, employment"
                ),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Section status
// ---------------------------------------------------------------------------

/// Lifecycle of a section record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Draft,
    Submitted,
}

impl SectionStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            _ => Err(CoreError::Internal(format!(
                "invalid section status '{s}' in database"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }
}
