//! Offer, appointment and relieving letter rules.
//!
//! Payloads carry optional fields so the same type serves create and
//! update: on update, absent fields keep the stored value. Letters own a
//! denormalised salary breakdown that is only recomputed when the CTC
//! actually changes, so later salary-structure edits never alter an issued
//! letter.

use serde::{Deserialize, Serialize};

use crate::amount_words::amount_in_words;
use crate::error::CoreError;
use crate::salary::{breakdown_for_value, SalaryComponent, SalaryStructure};
use crate::types::Date;
use crate::validation::{ensure_not_before, optional_text, require_date, require_text};

pub const DEFAULT_JOINING_TIME: &str = "10:30 AM";
pub const DEFAULT_PROBATION_MONTHS: i32 = 6;
pub const MAX_PROBATION_MONTHS: i32 = 24;

// ---------------------------------------------------------------------------
// Offer status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Cancelled,
}

impl OfferStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::validation(
                "status",
                format!(
                    "invalid offer status '{s}'. Must be one of: draft, sent, accepted, rejected, cancelled"
                ),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// Merge helpers
// ---------------------------------------------------------------------------

fn merged_text(field: &str, new: &Option<String>, old: Option<&String>) -> Result<String, CoreError> {
    match optional_text(field, new)? {
        Some(v) => Ok(v),
        None => old
            .cloned()
            .ok_or_else(|| CoreError::validation(field, "is required")),
    }
}

fn merged_date(field: &str, new: Option<Date>, old: Option<Date>) -> Result<Date, CoreError> {
    require_date(field, new.or(old))
}

/// Resolve CTC, words and breakdown for a letter.
///
/// When the payload omits the CTC or repeats the stored figure, the stored
/// breakdown is reused verbatim.
fn resolve_ctc(
    field: &str,
    new: &Option<serde_json::Value>,
    new_words: &Option<String>,
    words_field: &str,
    old: Option<(i64, &String, &Vec<SalaryComponent>)>,
    structure: &SalaryStructure,
) -> Result<(i64, String, Vec<SalaryComponent>), CoreError> {
    let explicit_words = optional_text(words_field, new_words)?;
    match (new.as_ref().filter(|v| !v.is_null()), old) {
        (Some(value), old) => {
            let (ctc, rows) = breakdown_for_value(value, structure)?;
            match old {
                Some((old_ctc, old_words, old_rows)) if old_ctc == ctc => Ok((
                    ctc,
                    explicit_words.unwrap_or_else(|| old_words.clone()),
                    old_rows.clone(),
                )),
                _ => Ok((
                    ctc,
                    explicit_words.unwrap_or_else(|| amount_in_words(ctc)),
                    rows,
                )),
            }
        }
        (None, Some((old_ctc, old_words, old_rows))) => Ok((
            old_ctc,
            explicit_words.unwrap_or_else(|| old_words.clone()),
            old_rows.clone(),
        )),
        (None, None) => Err(CoreError::validation(field, "is required")),
    }
}

// ---------------------------------------------------------------------------
// Offer letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfferLetterPayload {
    pub candidate_name: Option<String>,
    pub candidate_address: Option<String>,
    pub position: Option<String>,
    pub joining_date: Option<Date>,
    pub joining_time: Option<String>,
    pub ctc_amount: Option<serde_json::Value>,
    pub ctc_in_words: Option<String>,
    pub probation_months: Option<i32>,
    pub date_issued: Option<Date>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferLetterFields {
    pub candidate_name: String,
    pub candidate_address: String,
    pub position: String,
    pub joining_date: Date,
    pub joining_time: String,
    pub ctc_amount: i64,
    pub ctc_in_words: String,
    pub probation_months: i32,
    pub date_issued: Date,
    pub status: OfferStatus,
    pub salary_breakdown: Vec<SalaryComponent>,
}

impl OfferLetterPayload {
    /// Validate a create (`existing = None`) or update.
    pub fn apply(
        &self,
        existing: Option<&OfferLetterFields>,
        structure: &SalaryStructure,
        today: Date,
    ) -> Result<OfferLetterFields, CoreError> {
        let probation_months = self
            .probation_months
            .or(existing.map(|e| e.probation_months))
            .unwrap_or(DEFAULT_PROBATION_MONTHS);
        if !(0..=MAX_PROBATION_MONTHS).contains(&probation_months) {
            return Err(CoreError::validation(
                "probation_months",
                format!("must be between 0 and {MAX_PROBATION_MONTHS}"),
            ));
        }

        let status = match optional_text("status", &self.status)? {
            Some(s) => OfferStatus::from_str_db(&s.to_lowercase())?,
            None => existing.map(|e| e.status).unwrap_or(OfferStatus::Draft),
        };

        let (ctc_amount, ctc_in_words, salary_breakdown) = resolve_ctc(
            "ctc_amount",
            &self.ctc_amount,
            &self.ctc_in_words,
            "ctc_in_words",
            existing.map(|e| (e.ctc_amount, &e.ctc_in_words, &e.salary_breakdown)),
            structure,
        )?;

        Ok(OfferLetterFields {
            candidate_name: merged_text(
                "candidate_name",
                &self.candidate_name,
                existing.map(|e| &e.candidate_name),
            )?,
            candidate_address: merged_text(
                "candidate_address",
                &self.candidate_address,
                existing.map(|e| &e.candidate_address),
            )?,
            position: merged_text("position", &self.position, existing.map(|e| &e.position))?,
            joining_date: merged_date(
                "joining_date",
                self.joining_date,
                existing.map(|e| e.joining_date),
            )?,
            joining_time: optional_text("joining_time", &self.joining_time)?
                .or_else(|| existing.map(|e| e.joining_time.clone()))
                .unwrap_or_else(|| DEFAULT_JOINING_TIME.to_string()),
            ctc_amount,
            ctc_in_words,
            probation_months,
            date_issued: self
                .date_issued
                .or(existing.map(|e| e.date_issued))
                .unwrap_or(today),
            status,
            salary_breakdown,
        })
    }
}

// ---------------------------------------------------------------------------
// Appointment letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentLetterPayload {
    pub employee_name: Option<String>,
    pub designation: Option<String>,
    pub address: Option<String>,
    pub joining_date: Option<Date>,
    pub appointment_date: Option<Date>,
    pub ctc_annual: Option<serde_json::Value>,
    pub ctc_words: Option<String>,
    pub hr_name: Option<String>,
    pub hr_designation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentLetterFields {
    pub employee_name: String,
    pub designation: String,
    pub address: String,
    pub joining_date: Date,
    pub appointment_date: Date,
    pub ctc_annual: i64,
    pub ctc_words: String,
    pub hr_name: String,
    pub hr_designation: String,
    pub salary_breakdown: Vec<SalaryComponent>,
}

impl AppointmentLetterPayload {
    pub fn apply(
        &self,
        existing: Option<&AppointmentLetterFields>,
        structure: &SalaryStructure,
        today: Date,
    ) -> Result<AppointmentLetterFields, CoreError> {
        let (ctc_annual, ctc_words, salary_breakdown) = resolve_ctc(
            "ctc_annual",
            &self.ctc_annual,
            &self.ctc_words,
            "ctc_words",
            existing.map(|e| (e.ctc_annual, &e.ctc_words, &e.salary_breakdown)),
            structure,
        )?;

        Ok(AppointmentLetterFields {
            employee_name: merged_text(
                "employee_name",
                &self.employee_name,
                existing.map(|e| &e.employee_name),
            )?,
            designation: merged_text(
                "designation",
                &self.designation,
                existing.map(|e| &e.designation),
            )?,
            address: merged_text("address", &self.address, existing.map(|e| &e.address))?,
            joining_date: merged_date(
                "joining_date",
                self.joining_date,
                existing.map(|e| e.joining_date),
            )?,
            appointment_date: self
                .appointment_date
                .or(existing.map(|e| e.appointment_date))
                .unwrap_or(today),
            ctc_annual,
            ctc_words,
            hr_name: merged_text("hr_name", &self.hr_name, existing.map(|e| &e.hr_name))?,
            hr_designation: merged_text(
                "hr_designation",
                &self.hr_designation,
                existing.map(|e| &e.hr_designation),
            )?,
            salary_breakdown,
        })
    }
}

// ---------------------------------------------------------------------------
// Relieving letters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelievingLetterPayload {
    pub employee_name: Option<String>,
    pub designation: Option<String>,
    pub employee_id: Option<String>,
    pub joining_date: Option<Date>,
    pub relieving_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelievingLetterFields {
    pub employee_name: String,
    pub designation: String,
    pub employee_id: String,
    pub joining_date: Date,
    pub relieving_date: Date,
}

impl RelievingLetterPayload {
    pub fn validate(&self) -> Result<RelievingLetterFields, CoreError> {
        let joining_date = require_date("joining_date", self.joining_date)?;
        let relieving_date = require_date("relieving_date", self.relieving_date)?;
        ensure_not_before("relieving_date", relieving_date, "joining_date", joining_date)?;
        Ok(RelievingLetterFields {
            employee_name: require_text("employee_name", &self.employee_name)?,
            designation: require_text("designation", &self.designation)?,
            employee_id: require_text("employee_id", &self.employee_id)?,
            joining_date,
            relieving_date,
        })
    }
}
