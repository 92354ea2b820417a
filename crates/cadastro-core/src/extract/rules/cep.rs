//! CEP (Brazilian postal code) extraction and validation.

use super::patterns::{CEP_BARE, CEP_FORMATTED};
use super::{digits_of, ExtractionMatch, FieldExtractor};

/// CEP field extractor over formatted codes (`NNNNN-NNN`, `NN.NNN-NNN`).
#[derive(Default)]
pub struct CepExtractor;

impl CepExtractor {
    pub fn new() -> Self {
        Self
    }

    /// A line that is nothing but eight digits.
    pub fn bare_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        (CEP_BARE.is_match(line) && validate_cep(line)).then(|| format_cep(line))
    }
}

impl FieldExtractor for CepExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CEP_FORMATTED
            .find_iter(text)
            .filter(|m| validate_cep(m.as_str()))
            .map(|m| {
                ExtractionMatch::new(format_cep(m.as_str()), 0.9, m.as_str())
            })
            .collect()
    }
}

/// Validate CEP: eight digits, not all zero.
pub fn validate_cep(cep: &str) -> bool {
    let digits = digits_of(cep);
    digits.len() == 8 && digits != "00000000"
}

/// Format CEP as NNNNN-NNN.
pub fn format_cep(cep: &str) -> String {
    let digits = digits_of(cep);

    if digits.len() != 8 {
        return cep.to_string();
    }

    format!("{}-{}", &digits[0..5], &digits[5..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cep_formats() {
        let extractor = CepExtractor::new();
        assert_eq!(extractor.extract("CEP 01310-100").unwrap().value, "01310-100");
        assert_eq!(extractor.extract("30.130-010 Belo Horizonte").unwrap().value, "30130-010");
        assert_eq!(extractor.bare_line("01310100"), Some("01310-100".to_string()));
        assert_eq!(extractor.bare_line("00000000"), None);
    }

    #[test]
    fn test_cep_ignores_phones_and_ids() {
        let extractor = CepExtractor::new();
        assert!(extractor.extract("(11) 98888-7777").is_none());
        assert!(extractor.extract("11.222.333/0001-81").is_none());
        assert!(extractor.extract("123.456.789-01").is_none());
    }
}
