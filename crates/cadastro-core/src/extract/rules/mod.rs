//! Rule-based validators, formatters and extractors for Brazilian fields.

pub mod address;
pub mod cep;
pub mod cnpj;
pub mod cpf;
pub mod email;
pub mod names;
pub mod patterns;
pub mod phone;
pub mod registration;

pub use address::{parse_city_uf, split_street_number, uf_from_name, validate_uf, StreetParts};
pub use cep::{format_cep, validate_cep, CepExtractor};
pub use cnpj::{cnpj_check_digits, format_cnpj, validate_cnpj, validate_cnpj_shape, CnpjExtractor};
pub use cpf::{format_cpf, validate_cpf, validate_cpf_checksum, CpfExtractor};
pub use email::{validate_email, EmailExtractor};
pub use phone::{format_phone, validate_phone, PhoneExtractor};
pub use registration::{validate_municipal_registration, validate_state_registration};

/// Digits of a string, in order.
pub fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value with where it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            source: source.into(),
        }
    }
}
