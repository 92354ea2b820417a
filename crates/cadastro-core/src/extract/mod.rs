//! Registration field extraction module.

pub mod cascade;
pub mod correction;
pub mod diagnostics;
pub mod labels;
pub mod locator;
pub mod normalize;
mod parser;
pub mod rules;
pub mod scoring;

pub use normalize::{normalize, RawInput};
pub use parser::{FormParser, ParseReport};

use crate::models::record::ExtractionResult;

/// Trait for registration record extractors.
pub trait RecordExtractor {
    /// Extract a record from raw text blocks (OCR regions or pasted text).
    fn extract(&self, blocks: &[String]) -> ExtractionResult;

    /// Extract a record from a single block of text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
