//! Email extraction and validation.

use super::patterns::{EMAIL, EMAIL_EXACT};
use super::{ExtractionMatch, FieldExtractor};

/// Email field extractor.
#[derive(Default)]
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for EmailExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        EMAIL
            .find_iter(text)
            .map(|m| (m, m.as_str().trim_end_matches('.')))
            .filter(|(_, email)| validate_email(email))
            .map(|(m, email)| {
                ExtractionMatch::new(email.to_string(), 0.95, m.as_str())
            })
            .collect()
    }
}

/// Validate email shape: `local@domain.tld`.
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_EXACT.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("contato@findup.com.br"));
        assert!(validate_email("a.b+c@x.io"));
        assert!(!validate_email(""));
        assert!(!validate_email("   "));
        assert!(!validate_email("contato@findup"));
        assert!(!validate_email("contatofindup.com.br"));
    }

    #[test]
    fn test_extract_strips_trailing_period() {
        let m = EmailExtractor::new()
            .extract("Escreva para vendas@acme.com.br.")
            .unwrap();
        assert_eq!(m.value, "vendas@acme.com.br");
    }
}
