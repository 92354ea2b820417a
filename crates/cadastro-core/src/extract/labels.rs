//! Label keyword table and label-line classification.
//!
//! Labels are matched on a folded form of each line: lowercase with
//! diacritics removed, one output char per input char, so a match length
//! in the folded line is also a char offset into the original line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::ConfigError;
use crate::models::record::Field;

/// Separators allowed between a label and its same-line value.
const SEPARATORS: [char; 5] = [':', '-', '–', '—', '='];

/// Lowercase and strip diacritics, char for char.
pub fn fold(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    if lower.is_ascii() {
        return lower;
    }
    let mut decomposed = lower.nfd().filter(|d| !is_combining_mark(*d));
    decomposed.next().unwrap_or(lower)
}

/// Synonym labels per field plus block headers that carry no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTable {
    /// Recognized captions, per field.
    pub synonyms: BTreeMap<Field, Vec<String>>,

    /// Section captions such as "Dados de contato". They end a label's
    /// value block but never name a field.
    pub section_headers: Vec<String>,
}

impl Default for LabelTable {
    fn default() -> Self {
        let entries: [(Field, &[&str]); 16] = [
            (Field::TaxIdCompany, &["cnpj/mf", "c.n.p.j.", "c.n.p.j", "cnpj"]),
            (Field::TaxIdPerson, &["cpf/mf", "c.p.f.", "c.p.f", "cpf"]),
            (
                Field::LegalName,
                &[
                    "razão social",
                    "nome empresarial",
                    "denominação social",
                    "denominação",
                    "razão",
                ],
            ),
            (
                Field::TradeName,
                &["nome fantasia", "nome de fantasia", "título do estabelecimento", "fantasia"],
            ),
            (Field::Name, &["nome completo", "nome do cliente", "nome"]),
            (Field::Email, &["e-mail", "email", "e mail", "correio eletrônico"]),
            (
                Field::Phone,
                &["telefones", "telefone", "tel.", "tel", "fone", "celular", "cel.", "whatsapp"],
            ),
            (Field::PostalCode, &["cep", "c.e.p.", "código postal"]),
            (Field::Street, &["logradouro", "endereço", "rua"]),
            (Field::HouseNumber, &["número", "nº", "n°", "n.º", "nro", "num."]),
            (Field::Complement, &["complemento", "compl.", "compl"]),
            (Field::Neighborhood, &["bairro / distrito", "bairro/distrito", "bairro", "distrito"]),
            (Field::City, &["cidade", "município", "localidade"]),
            (Field::State, &["uf", "estado"]),
            (
                Field::StateRegistration,
                &["inscrição estadual", "insc. estadual", "insc estadual", "i.e.", "ie"],
            ),
            (
                Field::MunicipalRegistration,
                &["inscrição municipal", "insc. municipal", "insc municipal", "i.m.", "im", "ccm"],
            ),
        ];

        let synonyms = entries
            .into_iter()
            .map(|(field, words)| (field, words.iter().map(|w| w.to_string()).collect()))
            .collect();

        let section_headers = [
            "dados cadastrais",
            "dados da empresa",
            "dados do cliente",
            "dados de contato",
            "dados",
            "contato",
            "contatos",
            "cliente",
            "informações fiscais",
            "informações de contato",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            synonyms,
            section_headers,
        }
    }
}

impl LabelTable {
    /// Reject synonyms that would match every line.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, words) in &self.synonyms {
            if words.iter().any(|w| w.trim().is_empty()) {
                return Err(ConfigError::EmptySynonym(field.key().to_string()));
            }
        }
        if self.section_headers.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::EmptySectionHeader);
        }
        Ok(())
    }

    /// Precompute folded synonyms for matching.
    pub fn index(&self) -> LabelIndex {
        let mut entries: Vec<(Field, String)> = self
            .synonyms
            .iter()
            .flat_map(|(field, words)| {
                words
                    .iter()
                    .map(|w| fold(w.trim()))
                    .filter(|w| !w.is_empty())
                    .map(move |w| (*field, w))
            })
            .collect();
        entries.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()));
        entries.dedup();

        let headers = self
            .section_headers
            .iter()
            .map(|h| fold(h.trim()))
            .filter(|h| !h.is_empty())
            .collect();

        LabelIndex { entries, headers }
    }
}

/// A line recognized as a field label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelHit {
    /// Field the label names.
    pub field: Field,
    /// Value printed on the same line, if any.
    pub value: Option<String>,
    /// Second label on the same line ("Razão Social Nome Fantasia").
    pub companion: Option<Field>,
}

impl LabelHit {
    /// Whether this label line introduces `field`.
    pub fn names(&self, field: Field) -> bool {
        self.field == field || self.companion == Some(field)
    }
}

/// Folded, longest-first view of a [`LabelTable`].
#[derive(Debug, Clone)]
pub struct LabelIndex {
    entries: Vec<(Field, String)>,
    headers: Vec<String>,
}

impl Default for LabelIndex {
    fn default() -> Self {
        LabelTable::default().index()
    }
}

impl LabelIndex {
    /// Classify a line as a label line.
    ///
    /// A line is a label when it starts with a synonym at a word boundary
    /// and the rest is empty, starts with a separator, or (for multi-word
    /// synonyms and code-like fields) is a value after whitespace. When
    /// the rest is itself a label, the line is a compound label row and
    /// carries no value.
    pub fn classify(&self, line: &str) -> Option<LabelHit> {
        self.classify_inner(line, true)
    }

    /// Whether the line is a label or a section header.
    pub fn is_label(&self, line: &str) -> bool {
        self.classify(line).is_some() || self.is_section_header(line)
    }

    /// Whether the line is a section header, optionally followed by `:`.
    pub fn is_section_header(&self, line: &str) -> bool {
        let folded = fold(line.trim());
        let folded = folded.trim_end_matches(|c: char| c == ':' || c.is_whitespace());
        self.headers.iter().any(|h| h == folded)
    }

    fn classify_inner(&self, line: &str, allow_companion: bool) -> Option<LabelHit> {
        let trimmed = line.trim();
        let folded = fold(trimmed);

        for (field, synonym) in &self.entries {
            if !folded.starts_with(synonym.as_str()) {
                continue;
            }

            let after = &folded[synonym.len()..];
            if after.chars().next().is_some_and(|c| c.is_alphanumeric()) {
                continue;
            }

            let rest: String = trimmed.chars().skip(synonym.chars().count()).collect();
            let rest = rest.trim();

            if rest.is_empty() {
                return Some(LabelHit {
                    field: *field,
                    value: None,
                    companion: None,
                });
            }

            let separated = rest.starts_with(&SEPARATORS[..]);
            if !separated && !(synonym.contains(' ') || field.is_code_like()) {
                continue;
            }

            let value = rest
                .trim_start_matches(|c: char| SEPARATORS.contains(&c) || c == '.' || c.is_whitespace())
                .trim();

            if value.is_empty() {
                return Some(LabelHit {
                    field: *field,
                    value: None,
                    companion: None,
                });
            }

            if allow_companion {
                if let Some(other) = self.classify_inner(value, false) {
                    if other.value.is_none() {
                        return Some(LabelHit {
                            field: *field,
                            value: None,
                            companion: Some(other.field),
                        });
                    }
                }
            }

            return Some(LabelHit {
                field: *field,
                value: Some(value.to_string()),
                companion: None,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hit(field: Field, value: Option<&str>) -> Option<LabelHit> {
        Some(LabelHit {
            field,
            value: value.map(|v| v.to_string()),
            companion: None,
        })
    }

    #[test]
    fn test_fold_preserves_char_count() {
        assert_eq!(fold("Razão Social"), "razao social");
        assert_eq!(fold("MUNICÍPIO"), "municipio");
        assert_eq!(fold("Nº"), "nº");
        let text = "Endereço: Praça da Sé";
        assert_eq!(fold(text).chars().count(), text.chars().count());
    }

    #[test]
    fn test_pure_label_lines() {
        let index = LabelIndex::default();
        assert_eq!(index.classify("CNPJ"), hit(Field::TaxIdCompany, None));
        assert_eq!(index.classify("Razão Social:"), hit(Field::LegalName, None));
        assert_eq!(index.classify("RAZAO SOCIAL -"), hit(Field::LegalName, None));
        assert_eq!(index.classify("E-mail"), hit(Field::Email, None));
    }

    #[test]
    fn test_same_line_values() {
        let index = LabelIndex::default();
        assert_eq!(
            index.classify("CNPJ: 11.222.333/0001-81"),
            hit(Field::TaxIdCompany, Some("11.222.333/0001-81"))
        );
        assert_eq!(
            index.classify("CEP 01310-100"),
            hit(Field::PostalCode, Some("01310-100"))
        );
        assert_eq!(
            index.classify("Nome Fantasia ACME"),
            hit(Field::TradeName, Some("ACME"))
        );
        assert_eq!(
            index.classify("Bairro - Centro"),
            hit(Field::Neighborhood, Some("Centro"))
        );
    }

    #[test]
    fn test_longest_synonym_wins() {
        let index = LabelIndex::default();
        assert_eq!(index.classify("Nome fantasia"), hit(Field::TradeName, None));
        assert_eq!(index.classify("Nome"), hit(Field::Name, None));
        assert_eq!(
            index.classify("Inscrição Municipal: 123456"),
            hit(Field::MunicipalRegistration, Some("123456"))
        );
    }

    #[test]
    fn test_values_are_not_labels() {
        let index = LabelIndex::default();
        assert_eq!(index.classify("Rua das Flores, 123"), None);
        assert_eq!(index.classify("Centro"), None);
        assert_eq!(index.classify("Telefônica do Brasil"), None);
        assert_eq!(index.classify("Cepa Alimentos"), None);
        assert_eq!(index.classify("ACME SOLUCOES LTDA"), None);
    }

    #[test]
    fn test_compound_label_row() {
        let index = LabelIndex::default();
        let row = index.classify("Razão Social Nome Fantasia").unwrap();
        assert_eq!(row.field, Field::LegalName);
        assert_eq!(row.value, None);
        assert_eq!(row.companion, Some(Field::TradeName));
        assert!(row.names(Field::TradeName));
    }

    #[test]
    fn test_section_headers() {
        let index = LabelIndex::default();
        assert!(index.is_section_header("Dados de Contato"));
        assert!(index.is_section_header("INFORMAÇÕES FISCAIS:"));
        assert!(!index.is_section_header("Dados de contato do João"));
        assert!(index.is_label("Cliente"));
    }

    #[test]
    fn test_custom_table() {
        let mut table = LabelTable::default();
        table
            .synonyms
            .insert(Field::TaxIdCompany, vec!["registro".to_string()]);
        let index = table.index();

        assert_eq!(index.classify("CNPJ"), None);
        assert_eq!(
            index.classify("Registro: 11.222.333/0001-81"),
            hit(Field::TaxIdCompany, Some("11.222.333/0001-81"))
        );
    }

    #[test]
    fn test_validate_rejects_empty_synonym() {
        let mut table = LabelTable::default();
        table.synonyms.insert(Field::City, vec!["  ".to_string()]);
        assert_eq!(
            table.validate(),
            Err(ConfigError::EmptySynonym("city".to_string()))
        );
    }

    #[test]
    fn test_table_serializes_with_field_keys() {
        let json = serde_json::to_value(LabelTable::default()).unwrap();
        assert!(json["synonyms"]["taxIdCompany"].is_array());
        assert!(json["section_headers"].is_array());
    }
}
