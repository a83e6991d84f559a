//! Tanzanian mobile number normalization
//!
//! ZenoPay expects the local ten digit form `0[67]XXXXXXXX`. Buyers type
//! numbers in every shape: `+255 744 963 858`, `255744963858`, `744963858`,
//! `0744-963-858`.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AppResult, ValidationError};

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D").expect("valid regex"))
}

fn canonical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0[67]\d{8}$").expect("valid regex"))
}

pub fn normalize_tanzanian_phone(raw: &str) -> AppResult<String> {
    let digits = non_digits().replace_all(raw, "");

    let local = if let Some(rest) = digits.strip_prefix("255").filter(|rest| rest.len() == 9) {
        format!("0{}", rest)
    } else if digits.len() == 9 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    if canonical().is_match(&local) {
        Ok(local)
    } else {
        Err(ValidationError::InvalidPhone {
            value: raw.to_string(),
        }
        .into())
    }
}
