//! Address parsing helpers and line score cards.

use super::patterns::{
    BARE_UF, CEP_FORMATTED, CITY_UF, COMPLEMENT_WORDS, CORPORATE_SUFFIXES, CPF_FORMATTED,
    EMAIL, HOUSE_NUMBER, NEIGHBORHOOD_WORDS, NUMBER_AFTER_COMMA, PHONE, STREET_TYPES,
    UF_CODES, UF_NAMES,
};
use crate::extract::labels::fold;
use crate::extract::scoring::{LineView, Rule, ScoreCard};
use crate::models::record::Field;

/// Whether `code` is one of the 27 federative units.
pub fn validate_uf(code: &str) -> bool {
    UF_CODES.contains(&code.trim())
}

/// Map a state name ("São Paulo") or code ("sp") to its UF code.
pub fn uf_from_name(name: &str) -> Option<&'static str> {
    let folded = fold(name.trim());
    let upper = folded.to_uppercase();
    if let Some(code) = UF_CODES.iter().find(|c| **c == upper) {
        return Some(*code);
    }
    UF_NAMES
        .iter()
        .find(|(state, _)| *state == folded)
        .map(|(_, code)| *code)
}

/// Split "City - UF" or "City/UF" into its parts.
///
/// Returns `None` unless the trailing code is a valid UF. When more than
/// one dash-separated segment precedes the UF, only the last is the city.
pub fn parse_city_uf(line: &str) -> Option<(String, &'static str)> {
    let caps = CITY_UF.captures(line.trim())?;
    let code = uf_from_name(&caps[2])?;
    let city = caps[1].rsplit(" - ").next()?.trim();
    if city.chars().filter(|c| c.is_alphabetic()).count() < 2 {
        return None;
    }
    Some((city.to_string(), code))
}

/// Pieces of a street line such as "Rua das Flores, 123 - Apto 4".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetParts {
    pub street: String,
    pub number: Option<String>,
    /// Text after the number, without its leading separator.
    pub tail: Option<String>,
}

/// Split a street line into street name, house number and trailing text.
///
/// The number must follow a comma ("Rua A, 12") so that numbers inside the
/// street name ("Rua 25 de Março") stay put.
pub fn split_street_number(line: &str) -> StreetParts {
    let line = line.trim();
    let Some(caps) = NUMBER_AFTER_COMMA.captures(line) else {
        return StreetParts {
            street: line.to_string(),
            number: None,
            tail: None,
        };
    };
    let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
        return StreetParts {
            street: line.to_string(),
            number: None,
            tail: None,
        };
    };

    let street = line[..whole.start()].trim().trim_end_matches(',').trim();
    let tail = line[whole.end()..]
        .trim_start_matches(|c: char| c == '-' || c == ',' || c == '–' || c.is_whitespace())
        .trim();

    StreetParts {
        street: street.to_string(),
        number: Some(normalize_house_number(number.as_str())),
        tail: (!tail.is_empty()).then(|| tail.to_string()),
    }
}

/// Uppercase "s/n" and drop a leading "nº".
pub fn normalize_house_number(number: &str) -> String {
    let trimmed = number.trim();
    match HOUSE_NUMBER.captures(trimmed) {
        Some(caps) => {
            let value = &caps[1];
            if value.eq_ignore_ascii_case("sn") || value.eq_ignore_ascii_case("s/n") {
                "S/N".to_string()
            } else {
                value.to_uppercase()
            }
        }
        None => trimmed.to_string(),
    }
}

/// Whether text reads as an address complement ("Apto 12", "Sala 3").
pub fn is_complement_text(text: &str) -> bool {
    let folded = fold(text);
    folded
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| COMPLEMENT_WORDS.contains(&w))
}

/// Whether the first word is a thoroughfare type.
pub fn starts_with_street_type(view: &LineView) -> bool {
    view.words.first().is_some_and(|w| STREET_TYPES.contains(&w.as_str()))
}

fn has_street_type(view: &LineView) -> bool {
    view.words.iter().any(|w| STREET_TYPES.contains(&w.as_str()) && w.len() > 2)
        || starts_with_street_type(view)
}

fn starts_with_avenue(view: &LineView) -> bool {
    view.words
        .first()
        .is_some_and(|w| w == "av" || w == "avenida")
}

fn has_corporate_suffix(view: &LineView) -> bool {
    view.words.iter().any(|w| CORPORATE_SUFFIXES.contains(&w.as_str()) && w.len() > 2)
}

fn looks_like_other_field(view: &LineView) -> bool {
    EMAIL.is_match(view.text)
        || CPF_FORMATTED.is_match(view.text)
        || (view.text.contains('/')
            && view.text.chars().filter(|c| c.is_ascii_digit()).count() >= 12)
}

fn is_postal_code(view: &LineView) -> bool {
    CEP_FORMATTED.is_match(view.text)
        && view.text.chars().filter(|c| c.is_alphabetic()).count() < 4
}

fn is_bare_uf(view: &LineView) -> bool {
    BARE_UF.is_match(view.text.trim())
}

fn is_phone(view: &LineView) -> bool {
    PHONE.is_match(view.text)
}

fn is_label(view: &LineView) -> bool {
    view.is_label
}

fn fewer_than_two_words(view: &LineView) -> bool {
    view.word_count() < 2
}

fn low_letter_density(view: &LineView) -> bool {
    view.letter_density() < 0.5
}

fn word_count(view: &LineView) -> f64 {
    view.word_count() as f64
}

fn letter_density(view: &LineView) -> f64 {
    view.letter_density()
}

fn follows_street_label(view: &LineView) -> bool {
    view.follows_label_for(Field::Street)
}

fn follows_non_street_label(view: &LineView) -> bool {
    view.follows_other_label(Field::Street)
}

/// Street lines: "Rua das Flores, 123", "Av. Paulista 1000".
pub static STREET_CARD: ScoreCard = ScoreCard {
    field: Field::Street,
    rules: &[
        Rule::Reject("label", is_label),
        Rule::Reject("postal code", is_postal_code),
        Rule::Reject("state code", is_bare_uf),
        Rule::Reject("other field shape", looks_like_other_field),
        Rule::Reject("phone", is_phone),
        Rule::Reject("single word", fewer_than_two_words),
        Rule::Reject("few letters", low_letter_density),
        Rule::Scaled("words", 3.0, word_count),
        Rule::Bonus("street type", 30.0, has_street_type),
        Rule::Scaled("letter density", 15.0, letter_density),
        Rule::Bonus("after street label", 50.0, follows_street_label),
        Rule::Bonus("after other label", -50.0, follows_non_street_label),
        Rule::Bonus("avenue prefix", 25.0, starts_with_avenue),
        Rule::Bonus("corporate suffix", -40.0, has_corporate_suffix),
    ],
};

fn not_a_house_number(view: &LineView) -> bool {
    !HOUSE_NUMBER.is_match(view.text.trim())
}

fn always(_: &LineView) -> bool {
    true
}

fn follows_number_label(view: &LineView) -> bool {
    view.follows_label_for(Field::HouseNumber)
}

fn follows_street_line(view: &LineView) -> bool {
    view.previous_text.is_some_and(|prev| {
        let folded = fold(prev);
        folded
            .split(|c: char| !c.is_alphanumeric())
            .next()
            .is_some_and(|w| STREET_TYPES.contains(&w))
    })
}

fn follows_non_number_label(view: &LineView) -> bool {
    view.follows_other_label(Field::HouseNumber)
}

/// Bare house numbers on their own line.
pub static NUMBER_CARD: ScoreCard = ScoreCard {
    field: Field::HouseNumber,
    rules: &[
        Rule::Reject("not a number", not_a_house_number),
        Rule::Bonus("number shape", 10.0, always),
        Rule::Bonus("after number label", 50.0, follows_number_label),
        Rule::Bonus("after street line", 25.0, follows_street_line),
        Rule::Bonus("after other label", -50.0, follows_non_number_label),
    ],
};

fn lacks_complement_word(view: &LineView) -> bool {
    !view.has_any_word(&COMPLEMENT_WORDS)
}

fn has_complement_word(view: &LineView) -> bool {
    view.has_any_word(&COMPLEMENT_WORDS)
}

fn follows_complement_label(view: &LineView) -> bool {
    view.follows_label_for(Field::Complement)
}

fn follows_non_complement_label(view: &LineView) -> bool {
    view.follows_other_label(Field::Complement)
}

fn many_words(view: &LineView) -> bool {
    view.word_count() > 6
}

fn has_digit(view: &LineView) -> bool {
    view.has_digit()
}

/// Complement lines: "Apto 12 Bloco B", "Sala 301".
pub static COMPLEMENT_CARD: ScoreCard = ScoreCard {
    field: Field::Complement,
    rules: &[
        Rule::Reject("label", is_label),
        Rule::Reject("no complement word", lacks_complement_word),
        Rule::Reject("street line", starts_with_street_type),
        Rule::Reject("postal code", is_postal_code),
        Rule::Reject("phone", is_phone),
        Rule::Reject("other field shape", looks_like_other_field),
        Rule::Bonus("complement word", 30.0, has_complement_word),
        Rule::Bonus("has digit", 10.0, has_digit),
        Rule::Bonus("after complement label", 50.0, follows_complement_label),
        Rule::Bonus("after other label", -50.0, follows_non_complement_label),
        Rule::Bonus("long line", -20.0, many_words),
    ],
};

fn has_long_digit_run(view: &LineView) -> bool {
    view.text
        .as_bytes()
        .windows(3)
        .any(|w| w.iter().all(u8::is_ascii_digit))
}

fn too_many_words(view: &LineView) -> bool {
    view.word_count() > 5
}

fn has_neighborhood_word(view: &LineView) -> bool {
    view.has_any_word(&NEIGHBORHOOD_WORDS)
}

fn follows_neighborhood_label(view: &LineView) -> bool {
    view.follows_label_for(Field::Neighborhood)
}

fn follows_non_neighborhood_label(view: &LineView) -> bool {
    view.follows_other_label(Field::Neighborhood)
}

fn letter_ratio(view: &LineView) -> f64 {
    view.letter_ratio()
}

fn has_city_uf(view: &LineView) -> bool {
    parse_city_uf(view.text).is_some()
}

/// Neighborhood lines: "Centro", "Jardim Paulista".
pub static NEIGHBORHOOD_CARD: ScoreCard = ScoreCard {
    field: Field::Neighborhood,
    rules: &[
        Rule::Reject("label", is_label),
        Rule::Reject("digits", has_long_digit_run),
        Rule::Reject("street line", starts_with_street_type),
        Rule::Reject("postal code", is_postal_code),
        Rule::Reject("state code", is_bare_uf),
        Rule::Reject("phone", is_phone),
        Rule::Reject("other field shape", looks_like_other_field),
        Rule::Reject("corporate suffix", has_corporate_suffix),
        Rule::Reject("city and state", has_city_uf),
        Rule::Reject("long line", too_many_words),
        Rule::Bonus("neighborhood word", 40.0, has_neighborhood_word),
        Rule::Bonus("after neighborhood label", 50.0, follows_neighborhood_label),
        Rule::Bonus("after other label", -50.0, follows_non_neighborhood_label),
        Rule::Scaled("letters", 10.0, letter_ratio),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::labels::LabelIndex;
    use pretty_assertions::assert_eq;

    fn views_of(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_uf() {
        assert!(validate_uf("SP"));
        assert!(validate_uf("DF"));
        assert!(!validate_uf("XX"));
        assert!(!validate_uf("sp"));
    }

    #[test]
    fn test_uf_from_name() {
        assert_eq!(uf_from_name("São Paulo"), Some("SP"));
        assert_eq!(uf_from_name("rio grande do sul"), Some("RS"));
        assert_eq!(uf_from_name("mg"), Some("MG"));
        assert_eq!(uf_from_name("Atlantis"), None);
    }

    #[test]
    fn test_parse_city_uf() {
        assert_eq!(parse_city_uf("São Paulo - SP"), Some(("São Paulo".to_string(), "SP")));
        assert_eq!(parse_city_uf("Recife/PE"), Some(("Recife".to_string(), "PE")));
        assert_eq!(
            parse_city_uf("Centro - Belo Horizonte - MG"),
            Some(("Belo Horizonte".to_string(), "MG"))
        );
        assert_eq!(parse_city_uf("Rua A, 12 - SP"), None);
        assert_eq!(parse_city_uf("Gotham - XX"), None);
    }

    #[test]
    fn test_split_street_number() {
        assert_eq!(
            split_street_number("Rua das Flores, 123"),
            StreetParts {
                street: "Rua das Flores".to_string(),
                number: Some("123".to_string()),
                tail: None,
            }
        );
        assert_eq!(
            split_street_number("Av. Brasil, nº 45a - Apto 3"),
            StreetParts {
                street: "Av. Brasil".to_string(),
                number: Some("45A".to_string()),
                tail: Some("Apto 3".to_string()),
            }
        );
        assert_eq!(split_street_number("Rua Sem Número, s/n").number.as_deref(), Some("S/N"));
        assert_eq!(split_street_number("Rua 25 de Março").number, None);
    }

    #[test]
    fn test_is_complement_text() {
        assert!(is_complement_text("Apto 12"));
        assert!(is_complement_text("Sala 301, Bloco B"));
        assert!(!is_complement_text("Centro"));
    }

    #[test]
    fn test_street_card() {
        let index = LabelIndex::default();
        let input = views_of(&[
            "Rua das Flores, 123",
            "MARIA DA SILVA SANTOS",
            "01310-100",
            "ACME COMERCIO LTDA",
        ]);
        let views = LineView::build(&input, &index);

        assert!(STREET_CARD.score(&views[0]).unwrap() > 35.0);
        assert!(STREET_CARD.score(&views[1]).unwrap() < 35.0);
        assert_eq!(STREET_CARD.score(&views[2]), None);
        assert!(STREET_CARD.score(&views[3]).unwrap() < 35.0);
    }

    #[test]
    fn test_number_card() {
        let index = LabelIndex::default();
        let input = views_of(&["Rua das Flores", "123", "Total", "456"]);
        let views = LineView::build(&input, &index);

        assert_eq!(NUMBER_CARD.score(&views[1]), Some(35.0));
        assert_eq!(NUMBER_CARD.score(&views[3]), Some(10.0));
        assert_eq!(NUMBER_CARD.score(&views[0]), None);
    }

    #[test]
    fn test_complement_and_neighborhood_cards() {
        let index = LabelIndex::default();
        let input = views_of(&["Apto 12 Bloco B", "Jardim Paulista", "Rua Sala Nova, 10"]);
        let views = LineView::build(&input, &index);

        assert!(COMPLEMENT_CARD.score(&views[0]).unwrap() > 25.0);
        assert_eq!(COMPLEMENT_CARD.score(&views[1]), None);
        assert_eq!(COMPLEMENT_CARD.score(&views[2]), None);

        assert!(NEIGHBORHOOD_CARD.score(&views[1]).unwrap() > 30.0);
        assert_eq!(NEIGHBORHOOD_CARD.score(&views[2]), None);
    }
}
