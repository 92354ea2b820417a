//! Configuration structures for the extraction engine.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::extract::labels::LabelTable;

/// Largest supported label lookahead window.
pub const MAX_LOOKAHEAD_LINES: usize = 10;

/// Main configuration for cadastro.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CadastroConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Label synonyms and section headers.
    pub labels: LabelTable,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Enable CNPJ check-digit validation.
    pub validate_cnpj_checksum: bool,

    /// Enable CPF check-digit validation. Off by default: CPF is
    /// shape-checked only unless this is set.
    pub validate_cpf_checksum: bool,

    /// Try to correct common OCR errors (misread `@`, garbled area codes).
    pub correct_ocr_errors: bool,

    /// Split "LEGAL NAME TRADE" lines into legal and trade names.
    pub split_trade_name: bool,

    /// Remove CPF digits that OCR glued onto the legal name.
    pub strip_cpf_from_legal_name: bool,

    /// Lines inspected after a label line.
    pub lookahead_lines: usize,

    /// Record per-field diagnostics.
    pub collect_diagnostics: bool,

    /// Minimum scores for the line rankers.
    pub thresholds: ScoreThresholds,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_cnpj_checksum: true,
            validate_cpf_checksum: false,
            correct_ocr_errors: true,
            split_trade_name: true,
            strip_cpf_from_legal_name: true,
            lookahead_lines: 3,
            collect_diagnostics: true,
            thresholds: ScoreThresholds::default(),
        }
    }
}

/// Minimum score a line needs to win a ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    pub name: f64,
    pub street: f64,
    pub house_number: f64,
    pub complement: f64,
    pub neighborhood: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            name: 20.0,
            street: 35.0,
            house_number: 20.0,
            complement: 25.0,
            neighborhood: 30.0,
        }
    }
}

impl ScoreThresholds {
    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("name", self.name),
            ("street", self.street),
            ("house_number", self.house_number),
            ("complement", self.complement),
            ("neighborhood", self.neighborhood),
        ]
    }
}

impl ExtractionConfig {
    /// Check value ranges.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.lookahead_lines == 0 || self.lookahead_lines > MAX_LOOKAHEAD_LINES {
            return Err(ConfigError::Lookahead {
                value: self.lookahead_lines,
                max: MAX_LOOKAHEAD_LINES,
            });
        }

        for (field, value) in self.thresholds.entries() {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::NegativeThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }
}

impl CadastroConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CadastroConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        self.labels.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CadastroError;

    #[test]
    fn test_defaults() {
        let config = CadastroConfig::default();
        assert!(config.extraction.validate_cnpj_checksum);
        assert!(!config.extraction.validate_cpf_checksum);
        assert_eq!(config.extraction.lookahead_lines, 3);
        assert_eq!(config.extraction.thresholds.street, 35.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CadastroConfig =
            serde_json::from_str(r#"{"extraction": {"correct_ocr_errors": false}}"#).unwrap();
        assert!(!config.extraction.correct_ocr_errors);
        assert!(config.extraction.split_trade_name);
        assert_eq!(config.extraction.thresholds.name, 20.0);
    }

    #[test]
    fn test_rejects_out_of_range_lookahead() {
        let mut config = ExtractionConfig::default();
        config.lookahead_lines = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Lookahead { value: 0, max: MAX_LOOKAHEAD_LINES })
        );

        config.lookahead_lines = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let mut config = ExtractionConfig::default();
        config.thresholds.complement = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeThreshold { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CadastroConfig::default();
        config.extraction.validate_cpf_checksum = true;
        config.save(&path).unwrap();

        let loaded = CadastroConfig::from_file(&path).unwrap();
        assert!(loaded.extraction.validate_cpf_checksum);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"lookahead_lines": 40}}"#).unwrap();

        let err = CadastroConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CadastroError::Config(_)));
    }
}
