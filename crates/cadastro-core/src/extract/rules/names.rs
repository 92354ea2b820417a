//! Person and company name heuristics.

use super::address::parse_city_uf;
use super::patterns::{
    CEP_FORMATTED, CNPJ_FORMATTED, CORPORATE_SUFFIXES, CPF_FORMATTED, PHONE, TWO_OR_MORE_DIGITS,
};
use crate::extract::labels::fold;
use crate::extract::scoring::{LineView, Rule, ScoreCard};
use crate::models::record::Field;

/// Folded words that mark a line as address data, never a name.
const ADDRESS_TERMS: [&str; 30] = [
    "rua", "avenida", "av", "travessa", "alameda", "rodovia", "estrada", "praca", "bairro",
    "cep", "cidade", "estado", "numero", "complemento", "apto", "apartamento", "bloco", "sala",
    "andar", "lote", "quadra", "centro", "jardim", "vila", "parque", "conjunto", "residencial",
    "condominio", "loja", "km",
];

/// Folded phrases that appear on forms but are never names.
const IGNORED_TERMS: [&str; 18] = [
    "dados cadastrais",
    "cadastro",
    "formulario",
    "ficha",
    "documento",
    "pagina",
    "assinatura",
    "observacoes",
    "informacoes",
    "data de abertura",
    "situacao cadastral",
    "natureza juridica",
    "atividade principal",
    "capital social",
    "comprovante",
    "republica federativa",
    "receita federal",
    "inscricao",
];

/// Folded section headers after which a name is expected.
const NAME_SECTIONS: [&str; 4] = [
    "cliente",
    "dados do cliente",
    "dados de contato",
    "informacoes fiscais",
];

/// Whether text ends in or contains a corporate suffix (Ltda, S.A., EIRELI...).
pub fn has_corporate_suffix(text: &str) -> bool {
    fold(text)
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '.' || c == ',' || c == '-'))
        .any(|w| CORPORATE_SUFFIXES.contains(&w) || w == "s.a" || w == "s/a")
}

/// Whether a label-adjacent value can be a legal or trade name.
pub fn is_plausible_name(candidate: &str) -> bool {
    let letters = candidate.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 2 && !CNPJ_FORMATTED.is_match(candidate) && !candidate.contains('@')
}

fn too_short(view: &LineView) -> bool {
    view.text.chars().count() < 5
}

fn fewer_than_two_words(view: &LineView) -> bool {
    view.word_count() < 2
}

fn few_letters(view: &LineView) -> bool {
    view.letter_ratio() < 0.7
}

fn has_address_term(view: &LineView) -> bool {
    view.has_any_word(&ADDRESS_TERMS)
}

fn has_ignored_term(view: &LineView) -> bool {
    IGNORED_TERMS.iter().any(|t| view.folded.contains(t))
}

fn is_contact_shape(view: &LineView) -> bool {
    view.text.contains('@')
        || PHONE.is_match(view.text)
        || CPF_FORMATTED.is_match(view.text)
        || CNPJ_FORMATTED.is_match(view.text)
        || CEP_FORMATTED.is_match(view.text)
}

fn is_city_and_state(view: &LineView) -> bool {
    parse_city_uf(view.text).is_some()
}

fn is_label(view: &LineView) -> bool {
    view.is_label
}

fn word_count(view: &LineView) -> f64 {
    view.word_count() as f64
}

fn capital_ratio(view: &LineView) -> f64 {
    view.capital_ratio()
}

fn letter_ratio(view: &LineView) -> f64 {
    view.letter_ratio()
}

fn has_digit_run(view: &LineView) -> bool {
    TWO_OR_MORE_DIGITS.is_match(view.text)
}

fn near_top(view: &LineView) -> bool {
    view.index < 5
}

fn follows_name_section(view: &LineView) -> bool {
    view.previous_section
        .as_deref()
        .is_some_and(|s| NAME_SECTIONS.contains(&s))
}

fn follows_name_label(view: &LineView) -> bool {
    view.follows_label_for(Field::Name)
}

fn follows_other_label(view: &LineView) -> bool {
    view.follows_other_label(Field::Name)
}

/// Free-text person or company names, often printed with no label.
pub static NAME_CARD: ScoreCard = ScoreCard {
    field: Field::Name,
    rules: &[
        Rule::Reject("label", is_label),
        Rule::Reject("too short", too_short),
        Rule::Reject("single word", fewer_than_two_words),
        Rule::Reject("few letters", few_letters),
        Rule::Reject("address term", has_address_term),
        Rule::Reject("ignored term", has_ignored_term),
        Rule::Reject("contact data", is_contact_shape),
        Rule::Reject("city and state", is_city_and_state),
        Rule::Scaled("words", 5.0, word_count),
        Rule::Scaled("capitalized", 30.0, capital_ratio),
        Rule::Scaled("letters", 20.0, letter_ratio),
        Rule::Bonus("digits", -50.0, has_digit_run),
        Rule::Bonus("near top", 15.0, near_top),
        Rule::Bonus("after name section", 20.0, follows_name_section),
        Rule::Bonus("after name label", 50.0, follows_name_label),
        Rule::Bonus("after other label", -100.0, follows_other_label),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::labels::LabelIndex;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_corporate_suffix() {
        assert!(has_corporate_suffix("ACME SOLUCOES LTDA"));
        assert!(has_corporate_suffix("Padaria Pão Quente Ltda."));
        assert!(has_corporate_suffix("ACME S.A."));
        assert!(has_corporate_suffix("JOAO DA SILVA ME"));
        assert!(!has_corporate_suffix("MARIA DA SILVA SANTOS"));
        assert!(!has_corporate_suffix("MEIRELES COMERCIO"));
    }

    #[test]
    fn test_is_plausible_name() {
        assert!(is_plausible_name("ACME"));
        assert!(!is_plausible_name("11.222.333/0001-81"));
        assert!(!is_plausible_name("a@b.com"));
        assert!(!is_plausible_name("1"));
    }

    #[test]
    fn test_name_card_scores_person_name() {
        let index = LabelIndex::default();
        let input = lines(&["MARIA DA SILVA SANTOS", "Telefone", "(11) 98888-7777"]);
        let views = LineView::build(&input, &index);

        // 4 words, all capitalized, all letters, near the top.
        assert_eq!(NAME_CARD.score(&views[0]), Some(85.0));
        assert_eq!(NAME_CARD.score(&views[1]), None);
        assert_eq!(NAME_CARD.score(&views[2]), None);
    }

    #[test]
    fn test_name_card_rejects_address_and_penalizes_other_labels() {
        let index = LabelIndex::default();
        let input = lines(&["Rua das Flores", "Razão Social", "ACME SOLUCOES LTDA"]);
        let views = LineView::build(&input, &index);

        assert_eq!(NAME_CARD.score(&views[0]), None);
        assert!(NAME_CARD.score(&views[2]).unwrap() < 20.0);
    }

    #[test]
    fn test_name_card_label_bonus() {
        let index = LabelIndex::default();
        let input = lines(&["Nome", "joão pereira"]);
        let views = LineView::build(&input, &index);

        // 2 words, lowercase, all letters, near top, after the label.
        assert_eq!(NAME_CARD.score(&views[1]), Some(10.0 + 20.0 + 15.0 + 50.0));
    }
}
