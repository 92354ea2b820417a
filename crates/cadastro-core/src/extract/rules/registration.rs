//! State (IE) and municipal (IM) registration numbers.
//!
//! Formats vary per state and city, so validation only guards against
//! neighbouring fields being picked up in their place.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::CEP_FORMATTED;
use crate::extract::labels::fold;

lazy_static! {
    static ref REGISTRATION_CHARS: Regex = Regex::new(r"^[0-9./\- ]+$").unwrap();
    static ref SHORT_NUMBER: Regex = Regex::new(r"^\d{1,5}$").unwrap();
}

const MAX_LEN: usize = 20;

fn is_exempt(value: &str) -> bool {
    fold(value.trim()) == "isento"
}

fn is_registration_shape(value: &str) -> bool {
    let value = value.trim();
    value.len() <= MAX_LEN
        && value.chars().any(|c| c.is_ascii_digit())
        && REGISTRATION_CHARS.is_match(value)
        && !SHORT_NUMBER.is_match(value)
        && !CEP_FORMATTED.is_match(value)
}

/// Validate an inscrição estadual value (or "ISENTO").
pub fn validate_state_registration(value: &str) -> bool {
    is_exempt(value) || is_registration_shape(value)
}

/// Validate an inscrição municipal value (or "ISENTO").
pub fn validate_municipal_registration(value: &str) -> bool {
    is_exempt(value) || is_registration_shape(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_registration() {
        assert!(validate_state_registration("110.042.490.114"));
        assert!(validate_state_registration("062.307.904/0081"));
        assert!(validate_state_registration("ISENTO"));
        assert!(validate_state_registration("Isento"));
        assert!(!validate_state_registration("123")); // house number
        assert!(!validate_state_registration("01310-100")); // CEP
        assert!(!validate_state_registration("Rua das Flores, 123"));
        assert!(!validate_state_registration("Inscrição Municipal"));
        assert!(!validate_state_registration("1234567890123456789012"));
    }

    #[test]
    fn test_municipal_registration() {
        assert!(validate_municipal_registration("3.456.789-0"));
        assert!(validate_municipal_registration("ISENTO"));
        assert!(!validate_municipal_registration("São Paulo - SP"));
        assert!(!validate_municipal_registration("12"));
    }
}
