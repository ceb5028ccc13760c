//! Salary breakdown engine.
//!
//! Converts an annual CTC figure into the configured list of named salary
//! components plus a synthetic `"Fixed CTC"` total row. Rounding error is
//! reconciled in two separate passes, both absorbed by the last component:
//!
//! 1. annual pass: `round(ctc - sum(annual))` is added to the last
//!    component's annual amount and its monthly amount is recomputed;
//! 2. monthly pass: the last monthly amount is shifted so that the monthly
//!    column sums to `round(fixed_annual / 12)`.
//!
//! The passes must stay separate and in this order; merging them changes
//! results by a unit in some cases.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Name of the synthetic total row appended to every breakdown.
pub const TOTAL_COMPONENT_NAME: &str = "Fixed CTC";

/// Largest accepted annual CTC. Keeps every rounded component and their sum
/// well inside `i64`.
pub const MAX_CTC: f64 = 1e15;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Allowed deviation of the percentage sum from 1.0.
const PERCENT_SUM_TOLERANCE: f64 = 1e-6;

/// Default structure used when no `SALARY_STRUCTURE` is configured.
pub const DEFAULT_SALARY_STRUCTURE: &str = "Basic Wage=0.5,HRA=0.2,Special Allowances=0.15,\
     Travel Allowances=0.1,Other Allowances=0.05";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One computed row of a salary breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    pub name: String,
    pub annual_amount: i64,
    pub monthly_amount: i64,
}

/// A named share of the CTC, e.g. `HRA = 0.2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentShare {
    pub name: String,
    pub percent: f64,
}

/// Ordered percentage table. Construction validates that the shares are
/// positive, uniquely named and sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStructure {
    components: Vec<ComponentShare>,
}

impl SalaryStructure {
    pub fn new(components: Vec<ComponentShare>) -> Result<Self, CoreError> {
        if components.is_empty() {
            return Err(CoreError::validation(
                "components",
                "salary structure must contain at least one component",
            ));
        }

        for (idx, share) in components.iter().enumerate() {
            let name = share.name.trim();
            if name.is_empty() {
                return Err(CoreError::validation(
                    format!("components[{idx}].name"),
                    "is required",
                ));
            }
            if name.eq_ignore_ascii_case(TOTAL_COMPONENT_NAME) {
                return Err(CoreError::validation(
                    format!("components[{idx}].name"),
                    format!("'{TOTAL_COMPONENT_NAME}' is reserved for the total row"),
                ));
            }
            if !share.percent.is_finite() || share.percent <= 0.0 || share.percent > 1.0 {
                return Err(CoreError::validation(
                    format!("components[{idx}].percent"),
                    "must be a fraction in (0, 1]",
                ));
            }
            if components[..idx]
                .iter()
                .any(|other| other.name.trim().eq_ignore_ascii_case(name))
            {
                return Err(CoreError::validation(
                    format!("components[{idx}].name"),
                    format!("duplicate component '{name}'"),
                ));
            }
        }

        let sum: f64 = components.iter().map(|c| c.percent).sum();
        if (sum - 1.0).abs() > PERCENT_SUM_TOLERANCE {
            return Err(CoreError::validation(
                "components",
                format!("percentages must sum to 1.0, got {sum}"),
            ));
        }

        let components = components
            .into_iter()
            .map(|c| ComponentShare {
                name: c.name.trim().to_string(),
                percent: c.percent,
            })
            .collect();

        Ok(Self { components })
    }

    /// Parse a `Name=fraction,Name=fraction` list as used by the
    /// `SALARY_STRUCTURE` environment variable.
    pub fn parse(spec: &str) -> Result<Self, CoreError> {
        let mut components = Vec::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, percent) = entry.split_once('=').ok_or_else(|| {
                CoreError::validation(
                    "salary_structure",
                    format!("entry '{entry}' must look like Name=0.25"),
                )
            })?;
            let percent: f64 = percent.trim().parse().map_err(|_| {
                CoreError::validation(
                    "salary_structure",
                    format!("'{}' is not a number", percent.trim()),
                )
            })?;
            components.push(ComponentShare {
                name: name.trim().to_string(),
                percent,
            });
        }
        Self::new(components)
    }

    pub fn components(&self) -> &[ComponentShare] {
        &self.components
    }
}

impl Default for SalaryStructure {
    fn default() -> Self {
        Self::parse(DEFAULT_SALARY_STRUCTURE).expect("default salary structure is valid")
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Round half towards positive infinity (`floor(x + 0.5)`).
///
/// Differs from [`f64::round`] only for negative `.5` values, which occur
/// when the annual reconciliation difference is negative.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Validate a CTC figure: it must be finite, strictly positive and at most
/// [`MAX_CTC`].
pub fn validate_ctc(ctc: f64) -> Result<f64, CoreError> {
    if !ctc.is_finite() || ctc <= 0.0 {
        return Err(CoreError::InvalidAmount(format!(
            "CTC must be a positive number, got {ctc}"
        )));
    }
    if ctc > MAX_CTC {
        return Err(CoreError::InvalidAmount(format!(
            "CTC must not exceed {MAX_CTC}, got {ctc}"
        )));
    }
    Ok(ctc)
}

/// Parse a CTC from a JSON value, accepting numbers and numeric strings.
pub fn parse_ctc(value: &serde_json::Value) -> Result<f64, CoreError> {
    let ctc = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| CoreError::InvalidAmount(format!("CTC must be numeric, got {value}")))?;
    validate_ctc(ctc)
}

/// Compute the salary breakdown for an annual CTC.
///
/// The returned list holds one row per configured component, in
/// configuration order, followed by the [`TOTAL_COMPONENT_NAME`] row.
pub fn compute_breakdown(
    annual_ctc: f64,
    structure: &SalaryStructure,
) -> Result<Vec<SalaryComponent>, CoreError> {
    let ctc = validate_ctc(annual_ctc)?;

    let mut rows: Vec<SalaryComponent> = structure
        .components()
        .iter()
        .map(|share| {
            let annual = round_half_up(ctc * share.percent);
            SalaryComponent {
                name: share.name.clone(),
                annual_amount: annual,
                monthly_amount: round_half_up(annual as f64 / MONTHS_PER_YEAR),
            }
        })
        .collect();

    // Annual pass.
    let total_annual: i64 = rows.iter().map(|r| r.annual_amount).sum();
    let diff = round_half_up(ctc - total_annual as f64);
    if let Some(last) = rows.last_mut() {
        if diff != 0 {
            last.annual_amount += diff;
            last.monthly_amount = round_half_up(last.annual_amount as f64 / MONTHS_PER_YEAR);
        }
    }

    // Monthly pass.
    let fixed_annual: i64 = rows.iter().map(|r| r.annual_amount).sum();
    let fixed_monthly: i64 = rows.iter().map(|r| r.monthly_amount).sum();
    let target_monthly = round_half_up(fixed_annual as f64 / MONTHS_PER_YEAR);
    if let Some(last) = rows.last_mut() {
        last.monthly_amount += target_monthly - fixed_monthly;
    }

    rows.push(SalaryComponent {
        name: TOTAL_COMPONENT_NAME.to_string(),
        annual_amount: fixed_annual,
        monthly_amount: target_monthly,
    });

    Ok(rows)
}

/// Parse and compute in one step; returns the rounded CTC alongside the
/// breakdown so callers persist the same figure the rows sum to.
pub fn breakdown_for_value(
    value: &serde_json::Value,
    structure: &SalaryStructure,
) -> Result<(i64, Vec<SalaryComponent>), CoreError> {
    let ctc = parse_ctc(value)?;
    let rows = compute_breakdown(ctc, structure)?;
    Ok((round_half_up(ctc), rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn amounts(rows: &[SalaryComponent]) -> (Vec<i64>, Vec<i64>) {
        (
            rows.iter().map(|r| r.annual_amount).collect(),
            rows.iter().map(|r| r.monthly_amount).collect(),
        )
    }

    #[test]
    fn worked_example_needs_no_reconciliation() {
        let rows = compute_breakdown(600_000.0, &SalaryStructure::default()).unwrap();
        let (annual, monthly) = amounts(&rows);
        assert_eq!(annual, vec![300_000, 120_000, 90_000, 60_000, 30_000, 600_000]);
        assert_eq!(monthly, vec![25_000, 10_000, 7_500, 5_000, 2_500, 50_000]);
        assert_eq!(rows[5].name, TOTAL_COMPONENT_NAME);
        assert_eq!(rows[0].name, "Basic Wage");
    }

    #[test]
    fn annual_difference_lands_on_last_component() {
        // 1.5 rounds up twice: 2 + 2 + 1 = 5 > 4, so the last absorbs -1.
        let structure = SalaryStructure::parse("A=0.375,B=0.375,C=0.25").unwrap();
        let rows = compute_breakdown(4.0, &structure).unwrap();
        let (annual, _) = amounts(&rows);
        assert_eq!(annual, vec![2, 2, 0, 4]);
    }

    #[test]
    fn monthly_column_reconciled_after_annual() {
        let structure = SalaryStructure::parse("A=0.5,B=0.5").unwrap();
        // 1_000_001 -> annual [500001, 500001], diff -1 -> [500001, 500000].
        // monthly [41667, 41667] sums to 83334; target round(1000001/12) = 83333.
        let rows = compute_breakdown(1_000_001.0, &structure).unwrap();
        let (annual, monthly) = amounts(&rows);
        assert_eq!(annual, vec![500_001, 500_000, 1_000_001]);
        assert_eq!(monthly, vec![41_667, 41_666, 83_333]);
    }

    #[test]
    fn components_sum_to_ctc_for_many_inputs() {
        let structures = [
            SalaryStructure::default(),
            SalaryStructure::parse("Basic=0.4,HRA=0.16,LTA=0.07,Special=0.37").unwrap(),
            SalaryStructure::parse("Only=1").unwrap(),
            SalaryStructure::parse("A=0.3333333,B=0.3333333,C=0.3333334").unwrap(),
        ];
        for structure in &structures {
            for ctc in (1..2_000).chain([99_999, 123_457, 7_654_321, 10_000_003]) {
                let rows = compute_breakdown(ctc as f64, structure).unwrap();
                let (total, parts) = rows.split_last().unwrap();
                let annual_sum: i64 = parts.iter().map(|r| r.annual_amount).sum();
                let monthly_sum: i64 = parts.iter().map(|r| r.monthly_amount).sum();
                assert_eq!(annual_sum, ctc, "annual sum for {ctc}");
                assert_eq!(total.annual_amount, ctc);
                assert_eq!(total.monthly_amount, round_half_up(ctc as f64 / 12.0));
                assert_eq!(monthly_sum, total.monthly_amount, "monthly sum for {ctc}");
            }
        }
    }

    #[test]
    fn non_positive_and_non_finite_rejected() {
        let s = SalaryStructure::default();
        assert_matches!(compute_breakdown(0.0, &s), Err(CoreError::InvalidAmount(_)));
        assert_matches!(compute_breakdown(-5.0, &s), Err(CoreError::InvalidAmount(_)));
        assert_matches!(compute_breakdown(f64::NAN, &s), Err(CoreError::InvalidAmount(_)));
        assert_matches!(
            compute_breakdown(f64::INFINITY, &s),
            Err(CoreError::InvalidAmount(_))
        );
    }

    #[test]
    fn ctc_above_upper_bound_rejected() {
        let s = SalaryStructure::default();
        assert_matches!(validate_ctc(1e20), Err(CoreError::InvalidAmount(_)));
        assert_matches!(validate_ctc(f64::MAX), Err(CoreError::InvalidAmount(_)));
        assert_matches!(compute_breakdown(1e20, &s), Err(CoreError::InvalidAmount(_)));
        assert_matches!(
            breakdown_for_value(&json!(1e20), &s),
            Err(CoreError::InvalidAmount(_))
        );
        assert_matches!(parse_ctc(&json!("1e20")), Err(CoreError::InvalidAmount(_)));

        let rows = compute_breakdown(MAX_CTC, &s).unwrap();
        let total = rows.last().unwrap();
        assert_eq!(total.name, TOTAL_COMPONENT_NAME);
        assert_eq!(total.annual_amount, MAX_CTC as i64);
    }

    #[test]
    fn parse_ctc_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_ctc(&json!(600000)).unwrap(), 600_000.0);
        assert_eq!(parse_ctc(&json!(" 6,00,000 ")).unwrap(), 600_000.0);
        assert_matches!(parse_ctc(&json!("six lakh")), Err(CoreError::InvalidAmount(_)));
        assert_matches!(parse_ctc(&json!(null)), Err(CoreError::InvalidAmount(_)));
        assert_matches!(parse_ctc(&json!("0")), Err(CoreError::InvalidAmount(_)));
    }

    #[test]
    fn fractional_ctc_is_rounded_for_persistence() {
        let (ctc, rows) =
            breakdown_for_value(&json!(600_000.4), &SalaryStructure::default()).unwrap();
        assert_eq!(ctc, 600_000);
        assert_eq!(rows.last().unwrap().annual_amount, 600_000);
    }

    #[test]
    fn structure_must_sum_to_one() {
        assert!(SalaryStructure::parse("A=0.5,B=0.4").is_err());
        assert!(SalaryStructure::parse("A=0.5,A=0.5").is_err());
        assert!(SalaryStructure::parse("A=1.5,B=-0.5").is_err());
        assert!(SalaryStructure::parse("Fixed CTC=1").is_err());
        assert!(SalaryStructure::parse("").is_err());
        assert!(SalaryStructure::parse("A=half").is_err());
    }

    #[test]
    fn round_half_up_matches_floor_semantics() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(41_666.75), 41_667);
    }
}
