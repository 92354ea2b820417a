//! CPF (Brazilian personal tax ID) extraction and validation.

use super::patterns::{CPF_FORMATTED, DIGITS_11};
use super::{digits_of, ExtractionMatch, FieldExtractor};

/// CPF field extractor.
pub struct CpfExtractor {
    checksum: bool,
}

impl CpfExtractor {
    /// Create a new CPF extractor (shape checks only).
    pub fn new() -> Self {
        Self { checksum: false }
    }

    /// Set whether to verify CPF check digits as well.
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        validate_cpf(candidate) && (!self.checksum || validate_cpf_checksum(candidate))
    }

    /// Formatted candidates.
    pub fn formatted(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        CPF_FORMATTED
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), 0.85, m.as_str())
            })
            .collect()
    }

    /// Bare 11-digit runs, reformatted.
    pub fn bare(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        DIGITS_11
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(format_cpf(m.as_str()), 0.5, m.as_str())
            })
            .collect()
    }
}

impl Default for CpfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CpfExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = self.formatted(text);
        for m in self.bare(text) {
            if !results.iter().any(|r| r.value == m.value) {
                results.push(m);
            }
        }
        results.retain(|m| self.accepts(&m.value));
        results
    }
}

/// Validate CPF shape: exactly 11 digits and never a company-ID separator.
pub fn validate_cpf(cpf: &str) -> bool {
    !cpf.contains('/') && digits_of(cpf).len() == 11
}

/// Validate the CPF check digits.
///
/// Weights 10..2 for the first digit and 11..2 for the second; a
/// remainder of 10 counts as 0. Repeated-digit CPFs are rejected.
pub fn validate_cpf_checksum(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits
            .iter()
            .take(len)
            .zip((2..=len as u32 + 1).rev())
            .map(|(d, w)| d * w)
            .sum();
        (sum * 10 % 11) % 10
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Format CPF as XXX.XXX.XXX-XX.
pub fn format_cpf(cpf: &str) -> String {
    let digits = digits_of(cpf);

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
