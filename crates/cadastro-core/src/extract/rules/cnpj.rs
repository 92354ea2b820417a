//! CNPJ (Brazilian company tax ID) extraction and validation.

use super::patterns::{CNPJ_FORMATTED, CPF_EXACT, DIGITS_14};
use super::{digits_of, ExtractionMatch, FieldExtractor};

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ field extractor.
///
/// Formatted candidates (with the '/' separator) come first; bare 14-digit
/// runs are reformatted and follow with lower confidence.
pub struct CnpjExtractor {
    validate: bool,
}

impl CnpjExtractor {
    /// Create a new CNPJ extractor.
    pub fn new() -> Self {
        Self { validate: true }
    }

    /// Set whether to validate CNPJ check digits.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Apply the shape rules and, if enabled, the check digits.
    pub fn accepts(&self, candidate: &str) -> bool {
        if self.validate {
            validate_cnpj(candidate)
        } else {
            validate_cnpj_shape(candidate)
        }
    }

    /// Formatted and bare-digit candidates, unvalidated, in text order per kind.
    pub fn candidates(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        let mut results: Vec<ExtractionMatch<String>> = Vec::new();

        for m in CNPJ_FORMATTED.find_iter(text) {
            results.push(ExtractionMatch::new(format_cnpj(m.as_str()), 0.9, m.as_str()));
        }

        for m in DIGITS_14.find_iter(text) {
            let formatted = format_cnpj(m.as_str());
            if results.iter().any(|r| r.value == formatted) {
                continue;
            }
            results.push(ExtractionMatch::new(formatted, 0.6, m.as_str()));
        }

        results
    }
}

impl Default for CnpjExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CnpjExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(text)
            .into_iter()
            .filter(|m| self.accepts(&m.value))
            .collect()
    }
}

/// Shape rules only: a '/' separator, not a CPF layout, 14 digits, not a
/// repeated digit.
pub fn validate_cnpj_shape(cnpj: &str) -> bool {
    let trimmed = cnpj.trim();
    if !trimmed.contains('/') || CPF_EXACT.is_match(trimmed) {
        return false;
    }

    let digits = digits_of(trimmed);
    if digits.len() != 14 {
        return false;
    }

    let first = digits.as_bytes()[0];
    !digits.bytes().all(|b| b == first)
}

/// Validate a CNPJ: shape rules first, then both check digits.
///
/// The separator and CPF-layout checks run before any arithmetic, since
/// an 11- or 14-digit run alone does not say which ID it is.
pub fn validate_cnpj(cnpj: &str) -> bool {
    if !validate_cnpj_shape(cnpj) {
        return false;
    }

    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();
    let (first, second) = cnpj_check_digits(&digits[..12]);

    digits[12] == first && digits[13] == second
}

/// Compute both check digits for a 12-digit CNPJ base.
pub fn cnpj_check_digits(base: &[u32]) -> (u32, u32) {
    let first = check_digit(base.iter().zip(FIRST_WEIGHTS.iter()).map(|(d, w)| d * w).sum());

    let second_sum: u32 = base
        .iter()
        .chain(std::iter::once(&first))
        .zip(SECOND_WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();

    (first, check_digit(second_sum))
}

fn check_digit(sum: u32) -> u32 {
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Format CNPJ as XX.XXX.XXX/XXXX-XX.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits = digits_of(cnpj);

    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cnpj_valid() {
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(validate_cnpj("11.222.333/000181"));
        assert!(validate_cnpj("11222333/0001-81"));
    }

    #[test]
    fn test_validate_cnpj_invalid() {
        assert!(!validate_cnpj("11.222.333/0001-80")); // Wrong check digit
        assert!(!validate_cnpj("11222333000181")); // No separator
        assert!(!validate_cnpj("11.111.111/1111-11")); // Repeated digit
        assert!(!validate_cnpj("123.456.789-01")); // CPF layout
        assert!(!validate_cnpj("11.222.333/0001-8")); // Too short
    }

    #[test]
    fn test_single_digit_mutation_is_rejected() {
        let valid = "11222333000181";
        for position in 0..14 {
            let original = valid.as_bytes()[position] - b'0';
            for replacement in 0..10u8 {
                if replacement == original {
                    continue;
                }
                let mut mutated = valid.as_bytes().to_vec();
                mutated[position] = b'0' + replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(
                    !validate_cnpj(&format_cnpj(&mutated)),
                    "mutation at {} to {} accepted",
                    position,
                    replacement
                );
            }
        }
    }

    #[test]
    fn test_check_digits() {
        assert_eq!(cnpj_check_digits(&[1, 1, 2, 2, 2, 3, 3, 3, 0, 0, 0, 1]), (8, 1));
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("11.222.333/0001-81"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("123"), "123");
    }

    #[test]
    fn test_extract_formatted_before_bare() {
        let text = "ref 11222333000181\nCNPJ 11.222.333/0001-81";
        let all = CnpjExtractor::new().extract_all(text);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].source, "11.222.333/0001-81");
        assert_eq!(all[0].confidence, 0.9);
    }

    #[test]
    fn test_extract_bare_digits() {
        let m = CnpjExtractor::new().extract("inscrito sob 11222333000181").unwrap();
        assert_eq!(m.value, "11.222.333/0001-81");
        assert_eq!(m.source, "11222333000181");
        assert_eq!(m.confidence, 0.6);
    }

    #[test]
    fn test_without_validation() {
        let extractor = CnpjExtractor::new().with_validation(false);
        assert!(extractor.accepts("11.222.333/0001-80"));
        assert!(!extractor.accepts("123.456.789-01"));
    }
}
