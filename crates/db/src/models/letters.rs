//! Offer, appointment and relieving letter rows.
//!
//! Letter rows convert to and from the validated `*Fields` types in
//! `hrdocs_core::letters`, which own all merge and breakdown rules.

use hrdocs_core::error::CoreError;
use hrdocs_core::letters::{
    AppointmentLetterFields, OfferLetterFields, OfferStatus, RelievingLetterFields,
};
use hrdocs_core::salary::SalaryComponent;
use hrdocs_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Offer letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfferLetter {
    pub id: DbId,
    pub candidate_name: String,
    pub candidate_address: String,
    pub position: String,
    pub joining_date: Date,
    pub joining_time: String,
    pub ctc_amount: i64,
    pub ctc_in_words: String,
    pub probation_months: i32,
    pub date_issued: Date,
    pub status: String,
    pub salary_breakdown: Json<Vec<SalaryComponent>>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OfferLetter {
    pub fn to_fields(&self) -> Result<OfferLetterFields, CoreError> {
        Ok(OfferLetterFields {
            candidate_name: self.candidate_name.clone(),
            candidate_address: self.candidate_address.clone(),
            position: self.position.clone(),
            joining_date: self.joining_date,
            joining_time: self.joining_time.clone(),
            ctc_amount: self.ctc_amount,
            ctc_in_words: self.ctc_in_words.clone(),
            probation_months: self.probation_months,
            date_issued: self.date_issued,
            status: OfferStatus::from_str_db(&self.status)?,
            salary_breakdown: self.salary_breakdown.0.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Appointment letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppointmentLetter {
    pub id: DbId,
    pub employee_name: String,
    pub designation: String,
    pub address: String,
    pub joining_date: Date,
    pub appointment_date: Date,
    pub ctc_annual: i64,
    pub ctc_words: String,
    pub hr_name: String,
    pub hr_designation: String,
    pub salary_breakdown: Json<Vec<SalaryComponent>>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AppointmentLetter {
    pub fn to_fields(&self) -> AppointmentLetterFields {
        AppointmentLetterFields {
            employee_name: self.employee_name.clone(),
            designation: self.designation.clone(),
            address: self.address.clone(),
            joining_date: self.joining_date,
            appointment_date: self.appointment_date,
            ctc_annual: self.ctc_annual,
            ctc_words: self.ctc_words.clone(),
            hr_name: self.hr_name.clone(),
            hr_designation: self.hr_designation.clone(),
            salary_breakdown: self.salary_breakdown.0.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Relieving letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RelievingLetter {
    pub id: DbId,
    pub employee_name: String,
    pub designation: String,
    pub employee_id: String,
    pub joining_date: Date,
    pub relieving_date: Date,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RelievingLetter {
    pub fn to_fields(&self) -> RelievingLetterFields {
        RelievingLetterFields {
            employee_name: self.employee_name.clone(),
            designation: self.designation.clone(),
            employee_id: self.employee_id.clone(),
            joining_date: self.joining_date,
            relieving_date: self.relieving_date,
        }
    }
}
