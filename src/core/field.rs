//! Field format validation

use regex::Regex;
use std::sync::OnceLock;

/// Field format validators for registration input
#[derive(Debug, Clone)]
pub enum FieldFormat {
    /// `local@domain.tld` shape
    Email,
    /// Digits, `+`, `-`, spaces and parentheses, at least 10 characters
    Phone,
    /// Three uppercase ASCII letters (`INR`, `USD`)
    CurrencyCode,
}

impl FieldFormat {
    /// Validate a string against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Phone => Self::is_valid_phone(value),
            FieldFormat::CurrencyCode => {
                value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase())
            }
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX
            .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
        regex.is_match(email)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX
            .get_or_init(|| Regex::new(r"^[0-9+\-\s()]{10,}$").expect("valid phone regex"));
        regex.is_match(phone)
    }
}
