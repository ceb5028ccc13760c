//! Offer details section.

use serde::Deserialize;

use crate::error::CoreError;
use crate::salary::{breakdown_for_value, SalaryComponent, SalaryStructure};
use crate::types::Date;
use crate::validation::{ensure_not_before, optional_text, require_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfferPayload {
    pub offer_date: Option<Date>,
    pub date_of_joining: Option<Date>,
    pub employee_id: Option<String>,
    pub interview_remarks: Option<String>,
    /// Annual CTC; numbers and numeric strings are accepted.
    pub ctc_annual: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferFields {
    pub offer_date: Date,
    pub date_of_joining: Date,
    pub employee_id: Option<String>,
    pub interview_remarks: Option<String>,
    pub ctc_annual: Option<i64>,
    pub salary_breakdown: Option<Vec<SalaryComponent>>,
}

impl OfferPayload {
    pub fn validate(&self, structure: &SalaryStructure) -> Result<OfferFields, CoreError> {
        let offer_date = require_date("offer_date", self.offer_date)?;
        let date_of_joining = require_date("date_of_joining", self.date_of_joining)?;
        ensure_not_before("date_of_joining", date_of_joining, "offer_date", offer_date)?;

        let (ctc_annual, salary_breakdown) = match self.ctc_annual.as_ref().filter(|v| !v.is_null()) {
            Some(value) => {
                let (ctc, rows) = breakdown_for_value(value, structure)?;
                (Some(ctc), Some(rows))
            }
            None => (None, None),
        };

        Ok(OfferFields {
            offer_date,
            date_of_joining,
            employee_id: optional_text("employee_id", &self.employee_id)?,
            interview_remarks: optional_text("interview_remarks", &self.interview_remarks)?,
            ctc_annual,
            salary_breakdown,
        })
    }
}
