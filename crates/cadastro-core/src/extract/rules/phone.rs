//! Brazilian phone number extraction and validation.

use super::patterns::{PHONE, PHONE_GARBLED_AREA};
use super::{digits_of, ExtractionMatch, FieldExtractor};

/// Phone field extractor.
pub struct PhoneExtractor {
    recover_area_code: bool,
}

impl PhoneExtractor {
    pub fn new() -> Self {
        Self {
            recover_area_code: false,
        }
    }

    /// Also accept area codes whose closing parenthesis OCR garbled
    /// ("31 tm) 3132-0674").
    pub fn with_area_code_recovery(mut self, recover: bool) -> Self {
        self.recover_area_code = recover;
        self
    }

    /// Recovered phones from garbled area codes.
    pub fn recover(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        PHONE_GARBLED_AREA
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let digits = format!("{}{}", &caps[1], digits_of(&caps[2]));
                validate_phone(&digits).then(|| {
                    ExtractionMatch::new(format_phone(&digits), 0.5, whole.as_str())
                })
            })
            .collect()
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<ExtractionMatch<String>> = PHONE
            .find_iter(text)
            .filter(|m| validate_phone(m.as_str()))
            .map(|m| {
                ExtractionMatch::new(format_phone(m.as_str()), 0.9, m.as_str())
            })
            .collect();

        if self.recover_area_code {
            for m in self.recover(text) {
                if !results.iter().any(|r| r.value == m.value) {
                    results.push(m);
                }
            }
        }

        results
    }
}

/// Digits of a phone with a leading +55 country code removed.
pub fn phone_digits(phone: &str) -> String {
    let digits = digits_of(phone);
    match digits.len() {
        12 | 13 if digits.starts_with("55") => digits[2..].to_string(),
        _ => digits,
    }
}

/// Validate a Brazilian phone number.
///
/// 10 digits (landline, subscriber starts with 2-9) or 11 digits (mobile,
/// subscriber starts with 9), with an area code from 11 to 99.
pub fn validate_phone(phone: &str) -> bool {
    let digits = phone_digits(phone);
    let bytes = digits.as_bytes();

    if bytes.len() != 10 && bytes.len() != 11 {
        return false;
    }

    let area = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
    if !(11..=99).contains(&area) {
        return false;
    }

    let first = bytes[2] - b'0';
    if bytes.len() == 10 {
        (2..=9).contains(&first)
    } else {
        first == 9
    }
}

/// Format as (DD) NNNN-NNNN or (DD) NNNNN-NNNN.
pub fn format_phone(phone: &str) -> String {
    let digits = phone_digits(phone);

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        11 => format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11]),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("(11) 98888-7777"));
        assert!(validate_phone("(31) 3132-0674"));
        assert!(validate_phone("+55 11 98888-7777"));
        assert!(!validate_phone("(11) 88888-7777")); // Mobile must start with 9
        assert!(!validate_phone("(11) 1132-0674")); // Landline must start with 2-9
        assert!(!validate_phone("(01) 3132-0674")); // Area code below 11
        assert!(!validate_phone("3132-0674")); // Missing area code
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("11988887777"), "(11) 98888-7777");
        assert_eq!(format_phone("31 3132 0674"), "(31) 3132-0674");
        assert_eq!(format_phone("+55 (11) 98888-7777"), "(11) 98888-7777");
    }

    #[test]
    fn test_extract_phone() {
        let m = PhoneExtractor::new().extract("Fone: (11) 98888-7777").unwrap();
        assert_eq!(m.value, "(11) 98888-7777");
    }

    #[test]
    fn test_area_code_recovery() {
        let text = "contabil 31 tm) 3132-0674";
        assert!(PhoneExtractor::new().extract(text).is_none());

        let recovered = PhoneExtractor::new()
            .with_area_code_recovery(true)
            .extract(text)
            .unwrap();
        assert_eq!(recovered.value, "(31) 3132-0674");
    }
}
