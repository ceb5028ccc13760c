//! Bank details section.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::crypto::{FieldCipher, ProtectedValue};
use crate::error::CoreError;
use crate::validation::{optional_text, require_text};

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6,18}$").expect("valid regex"));
static IFSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid regex"));

/// Number of trailing account digits kept visible.
pub const ACCOUNT_VISIBLE_DIGITS: usize = 4;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BankPayload {
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub confirm_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankFields {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SealedBank {
    pub bank_name: String,
    pub account: ProtectedValue,
    pub account_last4: String,
    pub ifsc: ProtectedValue,
    pub branch_name: Option<String>,
}

fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

impl BankPayload {
    pub fn validate(&self) -> Result<BankFields, CoreError> {
        let bank_name = require_text("bank_name", &self.bank_name)?;

        let account_number = strip_spaces(&require_text("account_number", &self.account_number)?);
        if !ACCOUNT_RE.is_match(&account_number) {
            return Err(CoreError::validation(
                "account_number",
                "must contain 6 to 18 digits",
            ));
        }
        let confirmation = strip_spaces(&require_text(
            "confirm_account_number",
            &self.confirm_account_number,
        )?);
        if confirmation != account_number {
            return Err(CoreError::validation(
                "confirm_account_number",
                "does not match account_number",
            ));
        }

        let ifsc_code = require_text("ifsc_code", &self.ifsc_code)?.to_uppercase();
        if !IFSC_RE.is_match(&ifsc_code) {
            return Err(CoreError::validation(
                "ifsc_code",
                "must be 4 letters, a zero, then 6 letters or digits",
            ));
        }

        Ok(BankFields {
            bank_name,
            account_number,
            ifsc_code,
            branch_name: optional_text("branch_name", &self.branch_name)?,
        })
    }
}

impl BankFields {
    pub fn seal(self, cipher: &FieldCipher) -> Result<SealedBank, CoreError> {
        let len = self.account_number.len();
        Ok(SealedBank {
            account: cipher.protect(&self.account_number)?,
            account_last4: self.account_number[len.saturating_sub(ACCOUNT_VISIBLE_DIGITS)..]
                .to_string(),
            ifsc: cipher.protect(&self.ifsc_code)?,
            bank_name: self.bank_name,
            branch_name: self.branch_name,
        })
    }
}

/// Display form of an account number, e.g. `XXXXXX1234`.
pub fn masked_account(last4: &str) -> String {
    format!("XXXXXX{last4}")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn payload() -> BankPayload {
        BankPayload {
            bank_name: Some("State Bank of India".into()),
            account_number: Some("0012 3456 7890".into()),
            confirm_account_number: Some("001234567890".into()),
            ifsc_code: Some("sbin0001234".into()),
            branch_name: Some("MG Road".into()),
        }
    }

    #[test]
    fn valid_payload_normalised() {
        let f = payload().validate().unwrap();
        assert_eq!(f.account_number, "001234567890");
        assert_eq!(f.ifsc_code, "SBIN0001234");
    }

    #[test]
    fn confirmation_mismatch_names_field() {
        let mut p = payload();
        p.confirm_account_number = Some("001234567891".into());
        assert_matches!(
            p.validate(),
            Err(CoreError::Validation { field, .. }) if field == "confirm_account_number"
        );
    }

    #[test]
    fn ifsc_format_enforced() {
        let mut p = payload();
        p.ifsc_code = Some("SBIN1001234".into());
        assert_matches!(
            p.validate(),
            Err(CoreError::Validation { field, .. }) if field == "ifsc_code"
        );
    }

    #[test]
    fn account_digits_enforced() {
        let mut p = payload();
        p.account_number = Some("12AB".into());
        p.confirm_account_number = Some("12AB".into());
        assert!(p.validate().is_err());
    }

    #[test]
    fn sealing_keeps_last_four_only() {
        let cipher = FieldCipher::new("k", "s").unwrap();
        let sealed = payload().validate().unwrap().seal(&cipher).unwrap();
        assert_eq!(sealed.account_last4, "7890");
        assert_eq!(masked_account(&sealed.account_last4), "XXXXXX7890");
        assert_eq!(cipher.decrypt(&sealed.ifsc.encrypted).unwrap(), "SBIN0001234");
    }
}
