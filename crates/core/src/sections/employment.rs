//! Employment details section: fresher or experienced hire.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::salary::{breakdown_for_value, parse_ctc, round_half_up, SalaryComponent, SalaryStructure};
use crate::types::Date;
use crate::validation::{ensure_not_before, optional_text, require_date, require_text};

/// Upper bound on prior-employment entries per candidate.
pub const MAX_EXPERIENCES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    Fresher,
    Experienced,
}

impl EmploymentType {
    /// Parse a user-supplied type; `Experience` is accepted as an alias.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fresher" => Ok(Self::Fresher),
            "experienced" | "experience" => Ok(Self::Experienced),
            other => Err(CoreError::validation(
                "employment_type",
                format!("unknown employment type '{other}'. Must be Fresher or Experienced"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresher => "Fresher",
            Self::Experienced => "Experienced",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperiencePayload {
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub duration_from: Option<Date>,
    pub duration_to: Option<Date>,
    pub joined_ctc: Option<serde_json::Value>,
    pub offered_ctc: Option<serde_json::Value>,
    pub reason_for_leaving: Option<String>,
}

/// One validated prior-employment entry, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company_name: String,
    pub designation: Option<String>,
    pub duration_from: Date,
    pub duration_to: Date,
    pub joined_ctc: Option<i64>,
    pub offered_ctc: Option<i64>,
    pub reason_for_leaving: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmploymentPayload {
    pub employment_type: Option<String>,
    pub hired_role: Option<String>,
    pub fresher_ctc: Option<serde_json::Value>,
    #[serde(default)]
    pub experiences: Vec<ExperiencePayload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmploymentFields {
    pub employment_type: EmploymentType,
    pub hired_role: Option<String>,
    pub fresher_ctc: Option<i64>,
    pub salary_breakdown: Option<Vec<SalaryComponent>>,
    pub experiences: Vec<ExperienceEntry>,
}

fn optional_ctc(field: &str, value: &Option<serde_json::Value>) -> Result<Option<i64>, CoreError> {
    match value.as_ref().filter(|v| !v.is_null()) {
        Some(v) => parse_ctc(v)
            .map(|c| Some(round_half_up(c)))
            .map_err(|e| CoreError::validation(field, e.to_string())),
        None => Ok(None),
    }
}

impl ExperiencePayload {
    fn validate(&self, idx: usize) -> Result<ExperienceEntry, CoreError> {
        let field = |name: &str| format!("experiences[{idx}].{name}");
        let duration_from = require_date(&field("duration_from"), self.duration_from)?;
        let duration_to = require_date(&field("duration_to"), self.duration_to)?;
        ensure_not_before(
            &field("duration_to"),
            duration_to,
            &field("duration_from"),
            duration_from,
        )?;

        Ok(ExperienceEntry {
            company_name: require_text(&field("company_name"), &self.company_name)?,
            designation: optional_text(&field("designation"), &self.designation)?,
            duration_from,
            duration_to,
            joined_ctc: optional_ctc(&field("joined_ctc"), &self.joined_ctc)?,
            offered_ctc: optional_ctc(&field("offered_ctc"), &self.offered_ctc)?,
            reason_for_leaving: optional_text(&field("reason_for_leaving"), &self.reason_for_leaving)?,
        })
    }
}

impl EmploymentPayload {
    pub fn validate(&self, structure: &SalaryStructure) -> Result<EmploymentFields, CoreError> {
        let employment_type =
            EmploymentType::parse(&require_text("employment_type", &self.employment_type)?)?;
        let hired_role = optional_text("hired_role", &self.hired_role)?;

        match employment_type {
            EmploymentType::Fresher => {
                if hired_role.is_none() {
                    return Err(CoreError::validation("hired_role", "is required for freshers"));
                }
                let (fresher_ctc, salary_breakdown) =
                    match self.fresher_ctc.as_ref().filter(|v| !v.is_null()) {
                        Some(value) => {
                            let (ctc, rows) = breakdown_for_value(value, structure)?;
                            (Some(ctc), Some(rows))
                        }
                        None => (None, None),
                    };
                Ok(EmploymentFields {
                    employment_type,
                    hired_role,
                    fresher_ctc,
                    salary_breakdown,
                    experiences: Vec::new(),
                })
            }
            EmploymentType::Experienced => {
                if self.experiences.is_empty() {
                    return Err(CoreError::validation(
                        "experiences",
                        "at least one prior employment is required",
                    ));
                }
                if self.experiences.len() > MAX_EXPERIENCES {
                    return Err(CoreError::validation(
                        "experiences",
                        format!("at most {MAX_EXPERIENCES} entries are allowed"),
                    ));
                }
                let experiences = self
                    .experiences
                    .iter()
                    .enumerate()
                    .map(|(idx, e)| e.validate(idx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(EmploymentFields {
                    employment_type,
                    hired_role,
                    fresher_ctc: None,
                    salary_breakdown: None,
                    experiences,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn experience() -> ExperiencePayload {
        ExperiencePayload {
            company_name: Some("Acme Corp".into()),
            designation: Some("Engineer".into()),
            duration_from: Some(date(2020, 1, 1)),
            duration_to: Some(date(2023, 6, 30)),
            joined_ctc: Some(json!(400000)),
            offered_ctc: Some(json!("550000")),
            reason_for_leaving: Some("Growth".into()),
        }
    }

    #[test]
    fn fresher_ctc_drives_breakdown() {
        let p = EmploymentPayload {
            employment_type: Some("fresher".into()),
            hired_role: Some("Trainee".into()),
            fresher_ctc: Some(json!(360000)),
            experiences: vec![],
        };
        let f = p.validate(&SalaryStructure::default()).unwrap();
        assert_eq!(f.employment_type, EmploymentType::Fresher);
        assert_eq!(f.fresher_ctc, Some(360_000));
        assert_eq!(f.salary_breakdown.unwrap().last().unwrap().monthly_amount, 30_000);
    }

    #[test]
    fn fresher_needs_role() {
        let p = EmploymentPayload {
            employment_type: Some("Fresher".into()),
            ..Default::default()
        };
        assert_matches!(
            p.validate(&SalaryStructure::default()),
            Err(CoreError::Validation { field, .. }) if field == "hired_role"
        );
    }

    #[test]
    fn experience_alias_accepted() {
        assert_eq!(EmploymentType::parse("Experience").unwrap(), EmploymentType::Experienced);
        assert!(EmploymentType::parse("Intern").is_err());
    }

    #[test]
    fn experienced_requires_entries() {
        let p = EmploymentPayload {
            employment_type: Some("Experienced".into()),
            ..Default::default()
        };
        assert_matches!(
            p.validate(&SalaryStructure::default()),
            Err(CoreError::Validation { field, .. }) if field == "experiences"
        );
    }

    #[test]
    fn experience_entries_validated_with_index() {
        let mut bad = experience();
        bad.company_name = None;
        let p = EmploymentPayload {
            employment_type: Some("Experienced".into()),
            experiences: vec![experience(), bad],
            ..Default::default()
        };
        assert_matches!(
            p.validate(&SalaryStructure::default()),
            Err(CoreError::Validation { field, .. }) if field == "experiences[1].company_name"
        );
    }

    #[test]
    fn experience_dates_ordered() {
        let mut bad = experience();
        bad.duration_to = Some(date(2019, 1, 1));
        let p = EmploymentPayload {
            employment_type: Some("Experienced".into()),
            experiences: vec![bad],
            ..Default::default()
        };
        assert!(p.validate(&SalaryStructure::default()).is_err());
    }

    #[test]
    fn experienced_entries_normalised() {
        let p = EmploymentPayload {
            employment_type: Some("Experienced".into()),
            experiences: vec![experience()],
            ..Default::default()
        };
        let f = p.validate(&SalaryStructure::default()).unwrap();
        assert_eq!(f.experiences[0].offered_ctc, Some(550_000));
        assert!(f.salary_breakdown.is_none());
    }
}
