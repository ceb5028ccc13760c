//! Qualification section with education-type normalisation.

use serde::Deserialize;

use crate::error::CoreError;
use crate::validation::{optional_text, require_text};

/// Accepted raw spellings (lower-cased, spaces removed) and their labels.
const EDUCATION_LABELS: &[(&str, &str)] = &[
    ("btech", "B.Tech"),
    ("b.tech", "B.Tech"),
    ("be", "B.E"),
    ("b.e", "B.E"),
    ("bsc", "B.Sc"),
    ("b.sc", "B.Sc"),
    ("bca", "BCA"),
    ("bcom", "B.Com"),
    ("b.com", "B.Com"),
    ("mtech", "M.Tech"),
    ("m.tech", "M.Tech"),
    ("me", "M.E"),
    ("m.e", "M.E"),
    ("msc", "M.Sc"),
    ("m.sc", "M.Sc"),
    ("mca", "MCA"),
    ("mba", "MBA"),
    ("phd", "PhD"),
    ("p.hd", "PhD"),
    ("ssc", "SSC"),
    ("intermediate", "Intermediate"),
    ("diploma", "Diploma"),
    ("graduation", "Graduation"),
    ("post-graduation", "Post-Graduation"),
    ("postgraduation", "Post-Graduation"),
    ("doctorate", "Doctorate"),
    ("other", "Other"),
];

/// Map a free-form education type to its canonical label. Unknown values
/// are returned trimmed but otherwise verbatim.
pub fn normalize_education(raw: &str) -> String {
    let key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    EDUCATION_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualificationPayload {
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub percentage: Option<f64>,
    pub university: Option<String>,
    pub passing_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualificationFields {
    pub qualification: String,
    pub specialization: Option<String>,
    pub percentage: Option<f64>,
    pub university: String,
    pub passing_year: i32,
}

const MIN_PASSING_YEAR: i32 = 1950;
const MAX_PASSING_YEAR: i32 = 2100;

impl QualificationPayload {
    pub fn validate(&self) -> Result<QualificationFields, CoreError> {
        let qualification = normalize_education(&require_text("qualification", &self.qualification)?);
        let specialization = optional_text("specialization", &self.specialization)?;
        let university = require_text("university", &self.university)?;

        let passing_year = self
            .passing_year
            .ok_or_else(|| CoreError::validation("passing_year", "is required"))?;
        if !(MIN_PASSING_YEAR..=MAX_PASSING_YEAR).contains(&passing_year) {
            return Err(CoreError::validation(
                "passing_year",
                format!("must be between {MIN_PASSING_YEAR} and {MAX_PASSING_YEAR}"),
            ));
        }

        if let Some(p) = self.percentage {
            if !p.is_finite() || !(0.0..=100.0).contains(&p) {
                return Err(CoreError::validation(
                    "percentage",
                    "must be between 0 and 100",
                ));
            }
        }

        Ok(QualificationFields {
            qualification,
            specialization,
            percentage: self.percentage,
            university,
            passing_year,
        })
    }
}
