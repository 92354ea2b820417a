//! Extracted registration record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a registration field.
///
/// Besides the output fields, `Name` names the free-text contact name that
/// a form shows when no trade name is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// CNPJ, the company tax ID.
    TaxIdCompany,
    /// CPF, the personal tax ID.
    TaxIdPerson,
    LegalName,
    TradeName,
    Name,
    Email,
    Phone,
    /// CEP.
    PostalCode,
    Street,
    HouseNumber,
    Complement,
    Neighborhood,
    City,
    /// Federative unit code (UF).
    State,
    /// Inscrição estadual.
    StateRegistration,
    /// Inscrição municipal.
    MunicipalRegistration,
}

impl Field {
    /// Every field in output order.
    pub const ALL: [Field; 16] = [
        Field::TaxIdCompany,
        Field::TaxIdPerson,
        Field::LegalName,
        Field::TradeName,
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::PostalCode,
        Field::Street,
        Field::HouseNumber,
        Field::Complement,
        Field::Neighborhood,
        Field::City,
        Field::State,
        Field::StateRegistration,
        Field::MunicipalRegistration,
    ];

    /// Serialized name of the field.
    pub fn key(self) -> &'static str {
        match self {
            Field::TaxIdCompany => "taxIdCompany",
            Field::TaxIdPerson => "taxIdPerson",
            Field::LegalName => "legalName",
            Field::TradeName => "tradeName",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::PostalCode => "postalCode",
            Field::Street => "street",
            Field::HouseNumber => "houseNumber",
            Field::Complement => "complement",
            Field::Neighborhood => "neighborhood",
            Field::City => "city",
            Field::State => "state",
            Field::StateRegistration => "stateRegistration",
            Field::MunicipalRegistration => "municipalRegistration",
        }
    }

    /// Fields whose values are codes, so a label may be followed by the
    /// value after plain whitespace ("CEP 01310-100").
    pub fn is_code_like(self) -> bool {
        matches!(
            self,
            Field::TaxIdCompany
                | Field::TaxIdPerson
                | Field::Email
                | Field::Phone
                | Field::PostalCode
                | Field::HouseNumber
                | Field::State
                | Field::StateRegistration
                | Field::MunicipalRegistration
        )
    }

    /// Look up a field by its serialized name.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Record extracted from a single input.
///
/// Every field is independently present or absent. A present `tax_id_company`
/// has passed the CNPJ validator; a present `tax_id_person` has 11 digits and
/// differs from the CNPJ digits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id_company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id_person: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,

    /// Display name: trade name, else scored free-text name, else legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_registration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipal_registration: Option<String>,
}

impl ExtractionResult {
    /// Value of a field, if present.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set or clear a field.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Whether no field was extracted.
    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|f| self.get(f).is_none())
    }

    /// Fields that carry a value, in output order.
    pub fn present_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::TaxIdCompany => &self.tax_id_company,
            Field::TaxIdPerson => &self.tax_id_person,
            Field::LegalName => &self.legal_name,
            Field::TradeName => &self.trade_name,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::PostalCode => &self.postal_code,
            Field::Street => &self.street,
            Field::HouseNumber => &self.house_number,
            Field::Complement => &self.complement,
            Field::Neighborhood => &self.neighborhood,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::StateRegistration => &self.state_registration,
            Field::MunicipalRegistration => &self.municipal_registration,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::TaxIdCompany => &mut self.tax_id_company,
            Field::TaxIdPerson => &mut self.tax_id_person,
            Field::LegalName => &mut self.legal_name,
            Field::TradeName => &mut self.trade_name,
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::PostalCode => &mut self.postal_code,
            Field::Street => &mut self.street,
            Field::HouseNumber => &mut self.house_number,
            Field::Complement => &mut self.complement,
            Field::Neighborhood => &mut self.neighborhood,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::StateRegistration => &mut self.state_registration,
            Field::MunicipalRegistration => &mut self.municipal_registration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_empty() {
        let record = ExtractionResult::default();
        assert!(record.is_empty());
        assert!(record.present_fields().is_empty());
    }

    #[test]
    fn test_get_and_set() {
        let mut record = ExtractionResult::default();
        record.set(Field::PostalCode, Some("01310-100".to_string()));

        assert_eq!(record.get(Field::PostalCode), Some("01310-100"));
        assert_eq!(record.postal_code.as_deref(), Some("01310-100"));
        assert_eq!(record.present_fields(), vec![Field::PostalCode]);
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent() {
        let record = ExtractionResult {
            tax_id_company: Some("11.222.333/0001-81".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"taxIdCompany":"11.222.333/0001-81"}"#);
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }
}
