//! Post-processing for common OCR merge and misread errors.
//!
//! Every function here is a best-effort guess over one line. Callers can
//! turn each one off through [`ExtractionConfig`](crate::ExtractionConfig).

use tracing::debug;

use super::labels::fold;
use super::rules::names::has_corporate_suffix;
use super::rules::patterns::{
    CORPORATE_SUFFIXES, CPF_FORMATTED, EMAIL_E_AS_AT, EMAIL_E_AS_AT_SHORT, EMAIL_SUSPICIOUS_AT,
    ISOLATED_DIGITS_11, KNOWN_DOMAIN_SUFFIXES, TRAILING_DIGITS_11,
};
use super::rules::validate_email;

/// Characters OCR reads where an `@` was printed.
const AT_LOOKALIKES: [u8; 4] = [b'Q', b'Z', b'O', b'0'];

/// Longest echoed fragment considered around a lost `@`.
const MAX_ECHO: usize = 12;

/// Shared mailbox names common on company registration forms.
const ROLE_MAILBOXES: [&str; 24] = [
    "adm",
    "administrativo",
    "atendimento",
    "cobranca",
    "comercial",
    "compras",
    "contabil",
    "contabilidade",
    "contato",
    "diretoria",
    "faturamento",
    "financeiro",
    "fiscal",
    "gerencia",
    "juridico",
    "logistica",
    "marketing",
    "nfe",
    "recepcao",
    "rh",
    "sac",
    "secretaria",
    "suporte",
    "vendas",
];

fn bare_word(word: &str) -> String {
    fold(word)
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

fn is_suffix_word(word: &str) -> bool {
    let folded = fold(word);
    let folded = folded.trim_matches(|c: char| c == '.' || c == ',');
    CORPORATE_SUFFIXES.contains(&folded)
}

/// Split a merged "LEGAL NAME TRADE" line into legal and trade names.
///
/// The trailing word is taken as the trade name when it repeats an earlier
/// word of the line ("ACME SOLUCOES LTDA ACME"), or when it is short and
/// directly follows a corporate suffix ("PAES E DOCES LTDA DOCURA").
pub fn split_legal_and_trade_name(line: &str) -> Option<(String, String)> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 3 {
        return None;
    }

    let (last, head) = words.split_last()?;
    let last_bare = bare_word(last);
    let letters = last_bare.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 2 || is_suffix_word(last) {
        return None;
    }

    let len = last_bare.chars().count();
    let repeats = (2..=15).contains(&len) && head.iter().any(|w| bare_word(w) == last_bare);
    let after_suffix = len <= 10 && words.len() >= 4 && is_suffix_word(head[head.len() - 1]);

    if !repeats && !after_suffix {
        return None;
    }

    let legal = head.join(" ");
    if !has_corporate_suffix(&legal) && !repeats {
        return None;
    }
    debug!("split {:?} into {:?} / {:?}", line, legal, last);
    Some((legal, last.to_string()))
}

/// Remove CPF-shaped digits that OCR merged into a legal name.
pub fn strip_cpf_from_legal_name(name: &str) -> String {
    let stripped = CPF_FORMATTED.replace_all(name, " ");
    let stripped = TRAILING_DIGITS_11.replace_all(&stripped, " ");
    let stripped = ISOLATED_DIGITS_11.replace_all(&stripped, " ");

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .to_string()
}

/// Rebuild an email whose `@` was misread by OCR.
///
/// Tried in order: an echoed fragment around the lost `@`
/// ("contabilzacQzacassessoria.com.br"), a literal `&`, an `e` before a
/// known domain, then a lone `Q`/`Z`/`O`/`0` before a known domain. Web
/// addresses are never rewritten, and every candidate must still pass
/// [`validate_email`].
pub fn reconstruct_email(line: &str) -> Option<String> {
    if !is_rewritable(line) {
        return None;
    }

    let found = echoed_at(line)
        .or_else(|| ampersand_at(line))
        .or_else(|| e_as_at(line))
        .or_else(|| suspicious_at(line));
    log_reconstructed(&found, line);
    found
}

/// [`reconstruct_email`] for a line with no email label nearby.
///
/// A bare domain such as "acmesolucoes.com.br" reads as an `e` before a
/// known suffix, so the `e` and lookalike guesses are only kept when the
/// local part is a shared mailbox name ("contato", "vendas").
pub fn reconstruct_unlabeled_email(line: &str) -> Option<String> {
    if !is_rewritable(line) {
        return None;
    }

    let found = echoed_at(line)
        .or_else(|| ampersand_at(line))
        .or_else(|| e_as_at(line).filter(|email| is_role_mailbox(email)))
        .or_else(|| suspicious_at(line).filter(|email| is_role_mailbox(email)));
    log_reconstructed(&found, line);
    found
}

fn is_rewritable(line: &str) -> bool {
    let lower = line.to_lowercase();
    !(lower.contains("www") || lower.contains("http") || line.contains('@'))
}

fn log_reconstructed(found: &Option<String>, line: &str) {
    if let Some(email) = found {
        debug!("reconstructed email {:?} from {:?}", email, line);
    }
}

fn is_role_mailbox(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default().to_ascii_lowercase();
    let head = local
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default();
    ROLE_MAILBOXES.contains(&head)
}

/// End of the first known domain suffix in `token`, if any.
fn domain_end(token: &str) -> Option<usize> {
    let lower = token.to_ascii_lowercase();
    KNOWN_DOMAIN_SUFFIXES
        .iter()
        .find_map(|suffix| lower.find(suffix).map(|i| i + suffix.len()))
}

fn ends_with_known_suffix(domain: &str) -> bool {
    KNOWN_DOMAIN_SUFFIXES.iter().any(|s| domain.ends_with(s))
}

fn accept(local: &str, domain: &str) -> Option<String> {
    let email = format!("{}@{}", local, domain.to_lowercase());
    validate_email(&email).then_some(email)
}

fn echoed_at(line: &str) -> Option<String> {
    let bytes = line.as_bytes();

    for start in 0..bytes.len() {
        let longest = MAX_ECHO.min((bytes.len().saturating_sub(start + 1)) / 2);
        for len in (2..=longest).rev() {
            let base = &bytes[start..start + len];
            let echo = &bytes[start + len + 1..start + 2 * len + 1];
            if !base.iter().all(u8::is_ascii_alphabetic)
                || !AT_LOOKALIKES.contains(&bytes[start + len])
                || !base.eq_ignore_ascii_case(echo)
            {
                continue;
            }

            let token_start = line[..start]
                .rfind(char::is_whitespace)
                .map_or(0, |i| i + 1);
            let local = &line[token_start..start];
            let rest = &line[start + len + 1..];
            let token = rest.split_whitespace().next().unwrap_or_default();
            let Some(end) = domain_end(token) else {
                continue;
            };
            if local.is_empty() {
                continue;
            }

            if let Some(email) = accept(local, &token[..end]) {
                return Some(email);
            }
        }
    }

    None
}

fn ampersand_at(line: &str) -> Option<String> {
    line.split_whitespace()
        .filter(|token| token.matches('&').count() == 1)
        .map(|token| token.trim_end_matches('.').replace('&', "@"))
        .find(|candidate| {
            candidate
                .split_once('@')
                .is_some_and(|(_, domain)| ends_with_known_suffix(&domain.to_lowercase()))
                && validate_email(candidate)
        })
        .map(|candidate| match candidate.split_once('@') {
            Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
            None => candidate,
        })
}

fn e_as_at(line: &str) -> Option<String> {
    [&*EMAIL_E_AS_AT, &*EMAIL_E_AS_AT_SHORT]
        .into_iter()
        .find_map(|re| {
            let caps = re.captures(line)?;
            accept(&caps[1], &caps[2])
        })
}

fn suspicious_at(line: &str) -> Option<String> {
    for caps in EMAIL_SUSPICIOUS_AT.captures_iter(line) {
        let mut local = &caps[1];
        let domain = caps[2].trim_end_matches('.').to_lowercase();
        if !ends_with_known_suffix(&domain) {
            continue;
        }

        let first_label = domain.split('.').next().unwrap_or_default();
        if first_label.len() < 2 {
            continue;
        }

        // OCR sometimes echoes the domain's first letters before the lost '@'.
        for trim in (2..=first_label.len().min(4)).rev() {
            if local.len() >= trim + 3
                && local[local.len() - trim..].eq_ignore_ascii_case(&first_label[..trim])
            {
                local = &local[..local.len() - trim];
                break;
            }
        }

        if let Some(email) = accept(local, &domain) {
            return Some(email);
        }
    }

    None
}
