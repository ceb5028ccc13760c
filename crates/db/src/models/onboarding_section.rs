//! Onboarding section rows, one struct per section table.
//!
//! Rows serialize in full (encrypted blobs and hashes included) because the
//! consolidated record snapshots them verbatim. API views mask or drop the
//! sensitive columns.

use hrdocs_core::salary::SalaryComponent;
use hrdocs_core::sections::employment::ExperienceEntry;
use hrdocs_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct IdentitySection {
    pub id: DbId,
    pub draft_id: String,
    pub first_name: String,
    pub last_name: String,
    pub father_name: Option<String>,
    pub email: String,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub aadhaar_encrypted: Option<String>,
    pub aadhaar_hash: Option<String>,
    pub pan_encrypted: Option<String>,
    pub pan_hash: Option<String>,
    pub status: String,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IdentitySection {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QualificationSection {
    pub id: DbId,
    pub draft_id: String,
    pub qualification: String,
    pub specialization: Option<String>,
    pub percentage: Option<f64>,
    pub university: String,
    pub passing_year: i32,
    pub status: String,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct OfferSection {
    pub id: DbId,
    pub draft_id: String,
    pub offer_date: Date,
    pub date_of_joining: Date,
    pub employee_id: Option<String>,
    pub interview_remarks: Option<String>,
    pub ctc_annual: Option<i64>,
    pub salary_breakdown: Option<Json<Vec<SalaryComponent>>>,
    pub status: String,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BankSection {
    pub id: DbId,
    pub draft_id: String,
    pub bank_name: String,
    pub account_encrypted: String,
    pub account_hash: String,
    pub account_last4: String,
    pub ifsc_encrypted: String,
    pub ifsc_hash: String,
    pub branch_name: Option<String>,
    pub status: String,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EmploymentSection {
    pub id: DbId,
    pub draft_id: String,
    pub employment_type: String,
    pub hired_role: Option<String>,
    pub fresher_ctc: Option<i64>,
    pub salary_breakdown: Option<Json<Vec<SalaryComponent>>>,
    pub experiences: Json<Vec<ExperienceEntry>>,
    pub status: String,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// All section rows for one draft id; any may be absent.
#[derive(Debug, Clone, Default)]
pub struct DraftSections {
    pub identity: Option<IdentitySection>,
    pub qualification: Option<QualificationSection>,
    pub offer: Option<OfferSection>,
    pub bank: Option<BankSection>,
    pub employment: Option<EmploymentSection>,
}

impl DraftSections {
    /// Sections present, in canonical order.
    pub fn present(&self) -> Vec<hrdocs_core::sections::Section> {
        use hrdocs_core::sections::Section;
        let mut present = Vec::with_capacity(5);
        if self.identity.is_some() {
            present.push(Section::Identity);
        }
        if self.qualification.is_some() {
            present.push(Section::Qualification);
        }
        if self.offer.is_some() {
            present.push(Section::Offer);
        }
        if self.bank.is_some() {
            present.push(Section::Bank);
        }
        if self.employment.is_some() {
            present.push(Section::Employment);
        }
        present
    }
}
