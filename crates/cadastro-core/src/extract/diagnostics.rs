//! Structured record of what each extraction strategy tried.

use serde::{Deserialize, Serialize};

use crate::extract::rules::ExtractionMatch;
use crate::models::record::Field;

/// Why a plausible candidate was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Check digits do not match.
    Checksum,
    /// Value has a CPF layout where a CNPJ was expected.
    PersonalIdShape,
    /// Digits appear inside the legal name.
    InsideLegalName,
    /// Digits coincide with the extracted CNPJ or CPF.
    CoincidesWithTaxId,
    /// Structure rules (length, area code, format) failed.
    InvalidShape,
    /// Candidate is the value of another field.
    AlreadyUsed,
}

/// Result of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Matched {
        value: String,
        /// Text the rule matched, when it differs from the value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confidence: Option<f32>,
    },
    Rejected { candidate: String, reason: Rejection },
    /// Several lines cleared a ranker threshold; the earliest line won.
    Ambiguous { lines: Vec<usize>, winner: usize },
    Absent,
}

/// One diagnostic entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub field: Field,
    pub strategy: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Diagnostic sink for one parse.
#[derive(Debug, Default)]
pub struct Diagnostics {
    enabled: bool,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, field: Field, strategy: &str, outcome: Outcome) {
        if self.enabled {
            self.entries.push(Diagnostic {
                field,
                strategy: strategy.to_string(),
                outcome,
            });
        }
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Scratch space a strategy reports into while it runs.
#[derive(Debug, Default)]
pub struct Attempt {
    pub(crate) rejected: Vec<(String, Rejection)>,
    pub(crate) ambiguous: Option<(Vec<usize>, usize)>,
    pub(crate) evidence: Option<(String, f32)>,
}

impl Attempt {
    /// Note a candidate that was found and refused.
    pub fn reject(&mut self, candidate: impl Into<String>, reason: Rejection) {
        self.rejected.push((candidate.into(), reason));
    }

    /// Note that several lines cleared a threshold.
    pub fn ambiguous(&mut self, lines: Vec<usize>, winner: usize) {
        self.ambiguous = Some((lines, winner));
    }

    /// Keep the rule match behind an accepted value and return the value.
    pub fn cite(&mut self, m: ExtractionMatch<String>) -> String {
        self.evidence = Some((m.source, m.confidence));
        m.value
    }
}

impl Outcome {
    /// A match with no rule evidence attached.
    pub fn matched(value: impl Into<String>) -> Self {
        Outcome::Matched {
            value: value.into(),
            source: None,
            confidence: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_sink_records_nothing() {
        let mut diagnostics = Diagnostics::new(false);
        diagnostics.record(Field::Email, "label", Outcome::Absent);
        assert!(diagnostics.into_entries().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let entry = Diagnostic {
            field: Field::TaxIdCompany,
            strategy: "formatted".to_string(),
            outcome: Outcome::Rejected {
                candidate: "11.222.333/0001-80".to_string(),
                reason: Rejection::Checksum,
            },
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["field"], "taxIdCompany");
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"], "checksum");
    }

    #[test]
    fn test_cited_match_keeps_source() {
        let mut attempt = Attempt::default();
        let value = attempt.cite(ExtractionMatch::new("11.222.333/0001-81".to_string(), 0.6, "11222333000181"));

        assert_eq!(value, "11.222.333/0001-81");
        assert_eq!(attempt.evidence, Some(("11222333000181".to_string(), 0.6)));

        let bare = serde_json::to_value(Outcome::matched("x")).unwrap();
        assert!(bare.get("source").is_none());
        assert!(bare.get("confidence").is_none());
    }
}
