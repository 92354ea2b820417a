//! Core library for Brazilian registration form prefill.
//!
//! This crate provides:
//! - Text normalization of OCR output or pasted text
//! - Label-proximity search with a configurable Portuguese label table
//! - Field extraction for CNPJ, CPF, names, contact data, address and registrations
//! - Checksum and shape validators for Brazilian identifiers
//! - Heuristic ranking for unlabeled lines and OCR error correction

pub mod error;
pub mod extract;
pub mod models;

pub use error::{CadastroError, ConfigError, Result};
pub use extract::{normalize, FormParser, ParseReport, RawInput, RecordExtractor};
pub use models::config::{CadastroConfig, ExtractionConfig, ScoreThresholds};
pub use models::record::{ExtractionResult, Field};
