//! Common regex patterns for Brazilian registration fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CNPJ (company tax ID), always with the '/' separator
    pub static ref CNPJ_FORMATTED: Regex = Regex::new(
        r"\b\d{2}\.?\d{3}\.?\d{3}\s?/\s?\d{4}\s?-?\s?\d{2}\b"
    ).unwrap();

    pub static ref DIGITS_14: Regex = Regex::new(r"\b\d{14}\b").unwrap();

    // CPF (personal tax ID)
    pub static ref CPF_FORMATTED: Regex = Regex::new(
        r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b"
    ).unwrap();

    pub static ref CPF_EXACT: Regex = Regex::new(
        r"^\d{3}\.\d{3}\.\d{3}-\d{2}$"
    ).unwrap();

    pub static ref DIGITS_11: Regex = Regex::new(r"\b\d{11}\b").unwrap();

    pub static ref TRAILING_DIGITS_11: Regex = Regex::new(r"\s+\d{11}$").unwrap();

    pub static ref ISOLATED_DIGITS_11: Regex = Regex::new(r"\s+\d{11}\s+").unwrap();

    // Email
    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"
    ).unwrap();

    pub static ref EMAIL_EXACT: Regex = Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"
    ).unwrap();

    // 'e' read where '@' was printed, before a known suffix
    pub static ref EMAIL_E_AS_AT: Regex = Regex::new(
        r"(?i)([A-Za-z0-9._%+-]{3,})e([A-Za-z]{2,}\.(?:com|net|org|gov|edu)\.br)\b"
    ).unwrap();

    pub static ref EMAIL_E_AS_AT_SHORT: Regex = Regex::new(
        r"(?i)([A-Za-z0-9._%+-]{3,})e([A-Za-z]{2,}\.(?:com|net|org))\b"
    ).unwrap();

    // Q, Z, O, 0 or & read where '@' was printed
    pub static ref EMAIL_SUSPICIOUS_AT: Regex = Regex::new(
        r"([A-Za-z0-9._%+-]{3,})[&QZO0]([A-Za-z0-9._%+-]+\.[A-Za-z]{2,})"
    ).unwrap();

    // Phone: (DD) NNNN-NNNN, DD NNNNN-NNNN, DDNNNNNNNNN, optional +55
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?55\s?)?(?:\(\s?\d{2}\s?\)|\b\d{2})\s?\d{4,5}[-\s]?\d{4}\b"
    ).unwrap();

    // Area code followed by OCR noise instead of ')': "31 tm) 3132-0674"
    pub static ref PHONE_GARBLED_AREA: Regex = Regex::new(
        r"\b(\d{2})\s*\)?\s*[a-z]{1,3}\)?\s*(\d{4,5}-?\d{4})\b"
    ).unwrap();

    // CEP (postal code)
    pub static ref CEP_FORMATTED: Regex = Regex::new(
        r"\b(\d{5})-(\d{3})\b|\b(\d{2})\.(\d{3})-(\d{3})\b"
    ).unwrap();

    pub static ref CEP_BARE: Regex = Regex::new(r"^\d{8}$").unwrap();

    // Street lines start with a thoroughfare type
    pub static ref STREET_LINE: Regex = Regex::new(
        r"(?i)\b(?:rua|r\.|avenida|av\.?|travessa|tv\.|alameda|al\.|rodovia|rod\.|estrada|est\.|pra[çc]a|largo|viela|beco)\s+[^\s,][^,]*(?:,\s*(?:n[º°.]?\s*)?\d{1,5}[A-Za-z]?)?"
    ).unwrap();

    // House number after the street name: ", 123", ", nº 45A", ", S/N"
    pub static ref NUMBER_AFTER_COMMA: Regex = Regex::new(
        r"(?i),\s*(?:n[º°.]?\s*)?(\d{1,5}[A-Za-z]?|s/?n)\b"
    ).unwrap();

    pub static ref HOUSE_NUMBER: Regex = Regex::new(
        r"(?i)^(?:n[º°.]?\s*)?(\d{1,6}[A-Za-z]?|s/?n)$"
    ).unwrap();

    // Complement fragments: "Apto 12", "Sala 3", "Bloco B"
    pub static ref COMPLEMENT: Regex = Regex::new(
        r"(?i)\b(?:apto|apartamento|ap|bloco|bl|sala|sl|andar|conjunto|cj|loja|lj|casa|lote|torre|galp[aã]o|box|fundos)\.?\s*(?:n[º°.]?\s*)?[0-9A-Z]{1,5}\b"
    ).unwrap();

    // City and UF on one line: "São Paulo - SP", "Recife/PE"
    pub static ref CITY_UF: Regex = Regex::new(
        r"^([^\d,;:/@]{2,}?)\s*[-/]\s*([A-Z]{2})$"
    ).unwrap();

    pub static ref TRAILING_UF: Regex = Regex::new(r"[-/]\s*([A-Z]{2})$").unwrap();

    pub static ref BARE_UF: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();

    // "Neighborhood, City - UF"
    pub static ref NEIGHBORHOOD_BEFORE_CITY: Regex = Regex::new(
        r"^([^,\d]{3,40}),\s*[^,\d]+\s*[-/]\s*[A-Z]{2}$"
    ).unwrap();

    pub static ref TWO_OR_MORE_DIGITS: Regex = Regex::new(r"\d{2,}").unwrap();
}

/// Brazilian federative unit codes.
pub const UF_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
    "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Folded state names and their codes.
pub const UF_NAMES: [(&str, &str); 27] = [
    ("acre", "AC"),
    ("alagoas", "AL"),
    ("amapa", "AP"),
    ("amazonas", "AM"),
    ("bahia", "BA"),
    ("ceara", "CE"),
    ("distrito federal", "DF"),
    ("espirito santo", "ES"),
    ("goias", "GO"),
    ("maranhao", "MA"),
    ("mato grosso", "MT"),
    ("mato grosso do sul", "MS"),
    ("minas gerais", "MG"),
    ("para", "PA"),
    ("paraiba", "PB"),
    ("parana", "PR"),
    ("pernambuco", "PE"),
    ("piaui", "PI"),
    ("rio de janeiro", "RJ"),
    ("rio grande do norte", "RN"),
    ("rio grande do sul", "RS"),
    ("rondonia", "RO"),
    ("roraima", "RR"),
    ("santa catarina", "SC"),
    ("sao paulo", "SP"),
    ("sergipe", "SE"),
    ("tocantins", "TO"),
];

/// Email domain suffixes recognized during reconstruction.
pub const KNOWN_DOMAIN_SUFFIXES: [&str; 9] = [
    ".com.br", ".net.br", ".org.br", ".gov.br", ".edu.br", ".com", ".net", ".org", ".br",
];

/// Folded corporate suffixes.
pub const CORPORATE_SUFFIXES: [&str; 9] = [
    "ltda", "ltd", "s.a", "s/a", "sa", "eireli", "me", "epp", "mei",
];

/// Folded thoroughfare types.
pub const STREET_TYPES: [&str; 22] = [
    "rua", "r", "avenida", "av", "travessa", "tv", "alameda", "al", "rodovia", "rod",
    "estrada", "est", "praca", "largo", "viela", "beco", "via", "quadra", "qd", "ladeira",
    "servidao", "passagem",
];

/// Folded complement keywords.
pub const COMPLEMENT_WORDS: [&str; 20] = [
    "apto", "apartamento", "ap", "bloco", "bl", "sala", "sl", "andar", "conjunto", "cj",
    "loja", "lj", "casa", "fundos", "lote", "torre", "galpao", "box", "edificio", "terreo",
];

/// Folded neighborhood keywords.
pub const NEIGHBORHOOD_WORDS: [&str; 17] = [
    "jardim", "jd", "vila", "vl", "parque", "pq", "centro", "bairro", "conjunto", "residencial",
    "chacara", "setor", "bosque", "recanto", "nucleo", "cidade", "alto",
];
