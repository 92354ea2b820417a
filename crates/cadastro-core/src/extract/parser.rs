//! Registration form parser combining label search, ranking and regex fallbacks.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::cascade::{Cascade, Strategy};
use super::correction::{
    reconstruct_email, reconstruct_unlabeled_email, split_legal_and_trade_name,
    strip_cpf_from_legal_name,
};
use super::diagnostics::{Diagnostic, Diagnostics, Outcome, Attempt, Rejection};
use super::labels::{LabelIndex, LabelTable};
use super::locator::{LabelLocator, LocateOptions};
use super::normalize::{normalize, RawInput};
use super::rules::address::{
    is_complement_text, normalize_house_number, starts_with_street_type, COMPLEMENT_CARD,
    NEIGHBORHOOD_CARD, NUMBER_CARD, STREET_CARD,
};
use super::rules::names::{has_corporate_suffix, is_plausible_name, NAME_CARD};
use super::rules::patterns::{
    BARE_UF, CNPJ_FORMATTED, COMPLEMENT, CPF_EXACT, CPF_FORMATTED, DIGITS_11, DIGITS_14,
    HOUSE_NUMBER, NEIGHBORHOOD_BEFORE_CITY, NUMBER_AFTER_COMMA, STREET_LINE, TRAILING_UF,
    TWO_OR_MORE_DIGITS,
};
use super::rules::phone::phone_digits;
use super::rules::{
    digits_of, format_cnpj, format_cpf, parse_city_uf, split_street_number, uf_from_name,
    validate_cnpj_shape, validate_cpf, validate_municipal_registration,
    validate_state_registration, validate_uf, CepExtractor, CnpjExtractor, CpfExtractor,
    EmailExtractor, ExtractionMatch, FieldExtractor, PhoneExtractor, StreetParts,
};
use super::scoring::{rank, LineView, ScoreCard};
use super::RecordExtractor;
use crate::error::Result;
use crate::models::config::{CadastroConfig, ExtractionConfig, MAX_LOOKAHEAD_LINES};
use crate::models::record::{ExtractionResult, Field};

/// Result of parsing one input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    /// Extracted record.
    pub result: ExtractionResult,
    /// What each strategy tried, when diagnostics are enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Non-empty lines after normalization.
    pub line_count: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based parser for Brazilian registration data.
///
/// Holds only immutable settings, so one parser can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct FormParser {
    config: ExtractionConfig,
    labels: LabelIndex,
}

impl FormParser {
    /// Create a new parser with default settings and labels.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            labels: LabelIndex::default(),
        }
    }

    /// Create a parser from a configuration, validating it first.
    pub fn from_config(config: &CadastroConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.extraction.clone(),
            labels: config.labels.index(),
        })
    }

    /// Set OCR error correction (email reconstruction, area-code recovery).
    pub fn with_ocr_correction(mut self, enabled: bool) -> Self {
        self.config.correct_ocr_errors = enabled;
        self
    }

    /// Set CNPJ check-digit validation.
    pub fn with_cnpj_validation(mut self, validate: bool) -> Self {
        self.config.validate_cnpj_checksum = validate;
        self
    }

    /// Set CPF check-digit validation.
    pub fn with_cpf_checksum(mut self, validate: bool) -> Self {
        self.config.validate_cpf_checksum = validate;
        self
    }

    /// Set legal/trade name splitting.
    pub fn with_trade_name_split(mut self, enabled: bool) -> Self {
        self.config.split_trade_name = enabled;
        self
    }

    /// Set diagnostics collection.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.config.collect_diagnostics = enabled;
        self
    }

    /// Set the label lookahead window, clamped to the supported range.
    pub fn with_lookahead(mut self, lines: usize) -> Self {
        self.config.lookahead_lines = lines.clamp(1, MAX_LOOKAHEAD_LINES);
        self
    }

    /// Replace the label table.
    pub fn with_labels(mut self, table: &LabelTable) -> Self {
        self.labels = table.index();
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Parse raw text blocks (OCR regions or pasted text).
    pub fn parse<S: AsRef<str>>(&self, blocks: &[S]) -> ParseReport {
        let start = Instant::now();
        let input = normalize(blocks);

        info!(
            "Parsing registration data from {} lines ({} chars)",
            input.len(),
            input.full_text().chars().count()
        );

        let mut diagnostics = Diagnostics::new(self.config.collect_diagnostics);
        let result = self.extract_fields(&input, &mut diagnostics);

        debug!(
            "Extracted {} fields: {:?}",
            result.present_fields().len(),
            result.present_fields()
        );

        ParseReport {
            result,
            diagnostics: diagnostics.into_entries(),
            line_count: input.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Parse a single block of text.
    pub fn parse_text(&self, text: &str) -> ParseReport {
        self.parse(&[text])
    }

    fn extract_fields(&self, input: &RawInput, diagnostics: &mut Diagnostics) -> ExtractionResult {
        if input.is_empty() {
            return ExtractionResult::default();
        }

        let mut ctx = Ctx::new(input, &self.labels, &self.config);

        // Identity: the raw legal name guards the tax ID searches.
        ctx.raw_legal_name = run(Field::LegalName, &ctx, diagnostics);
        let company = run(Field::TaxIdCompany, &ctx, diagnostics);
        ctx.record.tax_id_company = company;
        let person = run(Field::TaxIdPerson, &ctx, diagnostics);
        ctx.record.tax_id_person = person;
        self.settle_legal_name(&mut ctx, diagnostics);
        let trade = run(Field::TradeName, &ctx, diagnostics);
        ctx.record.trade_name = trade;

        for field in [Field::Email, Field::Phone, Field::PostalCode] {
            let value = run(field, &ctx, diagnostics);
            ctx.record.set(field, value);
        }

        // Address: a full street line also yields number and tail parts.
        if let Some(line) = run(Field::Street, &ctx, diagnostics) {
            let parts = split_street_number(&line);
            ctx.tail = parts
                .tail
                .as_deref()
                .map(AddressTail::parse)
                .unwrap_or_default();
            ctx.record.street = Some(parts.street.clone()).filter(|s| !s.is_empty());
            ctx.street = Some(parts);
        }

        for field in [
            Field::HouseNumber,
            Field::Complement,
            Field::Neighborhood,
            Field::City,
            Field::State,
            Field::StateRegistration,
            Field::MunicipalRegistration,
        ] {
            let value = run(field, &ctx, diagnostics);
            ctx.record.set(field, value);
        }

        // Display name last, once every other line has been claimed.
        let scored = run(Field::Name, &ctx, diagnostics);
        if ctx.record.legal_name.is_none() {
            if let Some(name) = scored.as_ref().filter(|n| has_corporate_suffix(n)) {
                diagnostics.record(
                    Field::LegalName,
                    "scored_name",
                    Outcome::matched(name.clone()),
                );
                ctx.record.legal_name = Some(name.clone());
            }
        }
        ctx.record.name = ctx
            .record
            .trade_name
            .clone()
            .or(scored)
            .or_else(|| ctx.record.legal_name.clone());

        ctx.record
    }

    /// Apply CPF stripping and trade-name splitting to the raw legal name.
    fn settle_legal_name(&self, ctx: &mut Ctx<'_>, diagnostics: &mut Diagnostics) {
        let Some(mut legal) = ctx.raw_legal_name.clone() else {
            return;
        };

        if self.config.strip_cpf_from_legal_name {
            let stripped = strip_cpf_from_legal_name(&legal);
            if stripped != legal && !stripped.is_empty() {
                diagnostics.record(
                    Field::LegalName,
                    "strip_personal_id",
                    Outcome::matched(stripped.clone()),
                );
                legal = stripped;
            }
        }

        if self.config.split_trade_name {
            if let Some((head, trade)) = split_legal_and_trade_name(&legal) {
                diagnostics.record(
                    Field::LegalName,
                    "trade_name_split",
                    Outcome::matched(head.clone()),
                );
                legal = head;
                ctx.trade_from_split = Some(trade);
            }
        }

        ctx.record.legal_name = Some(legal);
    }
}

impl Default for FormParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor for FormParser {
    fn extract(&self, blocks: &[String]) -> ExtractionResult {
        self.parse(blocks).result
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse_text(text).result
    }
}

/// Complement, neighborhood, city and state printed after a house number.
#[derive(Debug, Default)]
struct AddressTail {
    complement: Option<String>,
    neighborhood: Option<String>,
    city: Option<String>,
    state: Option<&'static str>,
}

impl AddressTail {
    fn parse(tail: &str) -> Self {
        let mut out = Self::default();
        let mut parts: Vec<&str> = tail
            .split(',')
            .flat_map(|p| p.split(" - "))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() >= 2 {
            let joined = format!("{} - {}", parts[parts.len() - 2], parts[parts.len() - 1]);
            if let Some((city, uf)) = parse_city_uf(&joined) {
                out.city = Some(city);
                out.state = Some(uf);
                parts.truncate(parts.len() - 2);
            }
        }
        if out.city.is_none() {
            if let Some((city, uf)) = parts.last().and_then(|p| parse_city_uf(p)) {
                out.city = Some(city);
                out.state = Some(uf);
                parts.pop();
            }
        }

        for part in parts {
            if out.complement.is_none() && is_complement_text(part) {
                out.complement = Some(part.to_string());
            } else if out.neighborhood.is_none()
                && part.chars().filter(|c| c.is_alphabetic()).count() >= 3
                && !TWO_OR_MORE_DIGITS.is_match(part)
            {
                out.neighborhood = Some(part.to_string());
            }
        }

        out
    }
}

/// Everything a strategy may read. Fields are filled in extraction order.
struct Ctx<'a> {
    lines: &'a [String],
    full_text: &'a str,
    labels: &'a LabelIndex,
    config: &'a ExtractionConfig,
    views: Vec<LineView<'a>>,
    record: ExtractionResult,
    raw_legal_name: Option<String>,
    trade_from_split: Option<String>,
    street: Option<StreetParts>,
    tail: AddressTail,
}

impl<'a> Ctx<'a> {
    fn new(input: &'a RawInput, labels: &'a LabelIndex, config: &'a ExtractionConfig) -> Self {
        Self {
            lines: input.lines(),
            full_text: input.full_text(),
            labels,
            config,
            views: LineView::build(input.lines(), labels),
            record: ExtractionResult::default(),
            raw_legal_name: None,
            trade_from_split: None,
            street: None,
            tail: AddressTail::default(),
        }
    }

    fn locator(&self) -> LabelLocator<'a> {
        LabelLocator::new(self.labels)
    }

    fn options(&self) -> LocateOptions {
        LocateOptions::default().with_lookahead(self.config.lookahead_lines)
    }

    /// Whether a line already supplied the value of some field.
    fn is_used(&self, line: &str) -> bool {
        let line = line.trim();
        if self.raw_legal_name.as_deref() == Some(line) {
            return true;
        }
        Field::ALL
            .into_iter()
            .filter_map(|f| self.record.get(f))
            .any(|value| value == line || (value.chars().count() >= 4 && line.starts_with(value)))
    }

    fn inside_legal_name(&self, digits: &str) -> bool {
        self.raw_legal_name
            .as_deref()
            .map(digits_of)
            .is_some_and(|legal| !digits.is_empty() && legal.contains(digits))
    }

    fn tax_id_digits(&self) -> impl Iterator<Item = String> + '_ {
        [&self.record.tax_id_company, &self.record.tax_id_person]
            .into_iter()
            .flatten()
            .map(|id| digits_of(id))
    }

    /// Best unclaimed line for a score card.
    fn ranked(&self, card: &ScoreCard, threshold: f64, attempt: &mut Attempt) -> Option<String> {
        let ranking = rank(
            self.views.iter().filter(|v| !self.is_used(v.text)),
            card,
            threshold,
        );
        let winner = ranking.winner?;
        if ranking.is_ambiguous() {
            attempt.ambiguous(
                ranking.contenders.iter().map(|c| c.index).collect(),
                winner.index,
            );
        }
        Some(self.lines[winner.index].clone())
    }
}

fn run(field: Field, ctx: &Ctx<'_>, diagnostics: &mut Diagnostics) -> Option<String> {
    let strategies = strategies(field);
    Cascade::new(field, &strategies).run(ctx, diagnostics)
}

/// Ordered strategies per field, most contextual first.
fn strategies<'a>(field: Field) -> Vec<Strategy<Ctx<'a>>> {
    match field {
        Field::LegalName => vec![Strategy::new("label", legal_name_from_label)],
        Field::TaxIdCompany => vec![
            Strategy::new("label", cnpj_from_label),
            Strategy::new("formatted", cnpj_formatted),
            Strategy::new("digit_run", cnpj_digit_run),
        ],
        Field::TaxIdPerson => vec![
            Strategy::new("label", cpf_from_label),
            Strategy::new("formatted", cpf_formatted),
            Strategy::new("digit_run", cpf_digit_run),
        ],
        Field::TradeName => vec![
            Strategy::new("label", trade_name_from_label),
            Strategy::new("legal_name_split", trade_name_from_split),
        ],
        Field::Name => vec![
            Strategy::new("label", name_from_label),
            Strategy::new("ranked", name_ranked),
        ],
        Field::Email => vec![
            Strategy::new("label", email_from_label),
            Strategy::new("any_line", email_any_line),
            Strategy::new("reconstructed", email_reconstructed),
        ],
        Field::Phone => vec![
            Strategy::new("label", phone_from_label),
            Strategy::new("any_line", phone_any_line),
            Strategy::new("area_code_recovery", phone_recovered),
        ],
        Field::PostalCode => vec![
            Strategy::new("label", cep_from_label),
            Strategy::new("formatted", cep_formatted),
            Strategy::new("bare_line", cep_bare_line),
        ],
        Field::Street => vec![
            Strategy::new("label", street_from_label),
            Strategy::new("ranked", street_ranked),
            Strategy::new("pattern", street_pattern),
        ],
        Field::HouseNumber => vec![
            Strategy::new("street_line", number_from_street),
            Strategy::new("label", number_from_label),
            Strategy::new("ranked", number_ranked),
            Strategy::new("after_comma", number_after_comma),
        ],
        Field::Complement => vec![
            Strategy::new("street_line", complement_from_street),
            Strategy::new("label", complement_from_label),
            Strategy::new("ranked", complement_ranked),
            Strategy::new("pattern", complement_pattern),
        ],
        Field::Neighborhood => vec![
            Strategy::new("street_line", neighborhood_from_street),
            Strategy::new("label", neighborhood_from_label),
            Strategy::new("ranked", neighborhood_ranked),
            Strategy::new("before_city", neighborhood_before_city),
        ],
        Field::City => vec![
            Strategy::new("street_line", city_from_street),
            Strategy::new("label", city_from_label),
            Strategy::new("city_state_line", city_from_city_state_line),
        ],
        Field::State => vec![
            Strategy::new("street_line", state_from_street),
            Strategy::new("label", state_from_label),
            Strategy::new("city_state_line", state_from_city_state_line),
            Strategy::new("bare_code", state_bare_code),
        ],
        Field::StateRegistration => vec![Strategy::new("label", state_registration_from_label)],
        Field::MunicipalRegistration => {
            vec![Strategy::new("label", municipal_registration_from_label)]
        }
    }
}

fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

// Names

fn legal_name_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate(ctx.lines, Field::LegalName, ctx.options(), is_plausible_name)
}

fn trade_name_from_label(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::TradeName, ctx.options(), |value| {
            if !is_plausible_name(value) {
                return None;
            }
            if ctx.raw_legal_name.as_deref() == Some(value) {
                attempt.reject(value, Rejection::AlreadyUsed);
                return None;
            }
            Some(value.to_string())
        })
}

fn trade_name_from_split(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.trade_from_split.clone()
}

fn name_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate(ctx.lines, Field::Name, ctx.options(), is_plausible_name)
}

fn name_ranked(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.ranked(&NAME_CARD, ctx.config.thresholds.name, attempt)
}

/// Run `accept` on a rule match and cite the match when its value is kept.
fn cited(
    m: ExtractionMatch<String>,
    attempt: &mut Attempt,
    accept: impl FnOnce(String, &mut Attempt) -> Option<String>,
) -> Option<String> {
    let ExtractionMatch {
        value,
        confidence,
        source,
    } = m;
    let kept = accept(value, attempt)?;
    Some(attempt.cite(ExtractionMatch::new(kept, confidence, source)))
}

// Tax IDs

fn accept_cnpj(ctx: &Ctx<'_>, candidate: String, attempt: &mut Attempt) -> Option<String> {
    if !validate_cnpj_shape(&candidate) {
        attempt.reject(candidate, Rejection::InvalidShape);
        return None;
    }
    let extractor = CnpjExtractor::new().with_validation(ctx.config.validate_cnpj_checksum);
    if !extractor.accepts(&candidate) {
        attempt.reject(candidate, Rejection::Checksum);
        return None;
    }
    if ctx.inside_legal_name(&digits_of(&candidate)) {
        attempt.reject(candidate, Rejection::InsideLegalName);
        return None;
    }
    Some(candidate)
}

fn cnpj_from_label(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::TaxIdCompany, ctx.options(), |value| {
            if CPF_EXACT.is_match(value.trim()) {
                attempt.reject(value, Rejection::PersonalIdShape);
                return None;
            }
            CnpjExtractor::new()
                .with_validation(false)
                .candidates(value)
                .into_iter()
                .find_map(|m| cited(m, attempt, |value, attempt| accept_cnpj(ctx, value, attempt)))
        })
}

fn cnpj_formatted(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    CNPJ_FORMATTED
        .find_iter(ctx.full_text)
        .find_map(|m| accept_cnpj(ctx, format_cnpj(m.as_str()), attempt))
}

fn cnpj_digit_run(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    DIGITS_14
        .find_iter(ctx.full_text)
        .find_map(|m| accept_cnpj(ctx, format_cnpj(m.as_str()), attempt))
}

fn accept_cpf(ctx: &Ctx<'_>, candidate: String, attempt: &mut Attempt) -> Option<String> {
    if !validate_cpf(&candidate) {
        attempt.reject(candidate, Rejection::InvalidShape);
        return None;
    }
    let extractor = CpfExtractor::new().with_checksum(ctx.config.validate_cpf_checksum);
    if !extractor.accepts(&candidate) {
        attempt.reject(candidate, Rejection::Checksum);
        return None;
    }
    let digits = digits_of(&candidate);
    let coincides = ctx
        .record
        .tax_id_company
        .as_deref()
        .is_some_and(|cnpj| digits_of(cnpj).contains(&digits));
    if coincides {
        attempt.reject(candidate, Rejection::CoincidesWithTaxId);
        return None;
    }
    Some(candidate)
}

fn cpf_candidates(text: &str) -> impl Iterator<Item = String> + '_ {
    CPF_FORMATTED
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .chain(DIGITS_11.find_iter(text).map(|m| format_cpf(m.as_str())))
}

fn cpf_from_label(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::TaxIdPerson, ctx.options(), |value| {
            cpf_candidates(value).find_map(|c| accept_cpf(ctx, c, attempt))
        })
}

fn cpf_formatted(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    if ctx.record.tax_id_company.is_some() {
        return None;
    }
    ctx.lines.iter().find_map(|line| {
        CPF_FORMATTED
            .find_iter(line)
            .find_map(|m| accept_cpf(ctx, m.as_str().to_string(), attempt))
    })
}

fn cpf_digit_run(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    if ctx.record.tax_id_company.is_some() {
        return None;
    }
    ctx.views
        .iter()
        .filter(|view| {
            !ctx.labels.classify(view.text).is_some_and(|hit| hit.names(Field::Phone))
                && !view
                    .previous_label
                    .as_ref()
                    .is_some_and(|hit| hit.names(Field::Phone))
        })
        .find_map(|view| {
            DIGITS_11
                .find_iter(view.text)
                .find_map(|m| accept_cpf(ctx, format_cpf(m.as_str()), attempt))
        })
}

// Contact

fn email_from_label(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::Email, ctx.options(), |value| {
            EmailExtractor::new().extract(value).map(|m| attempt.cite(m))
        })
}

fn email_any_line(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.lines
        .iter()
        .find_map(|line| EmailExtractor::new().extract(line).map(|m| attempt.cite(m)))
}

fn email_reconstructed(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    if !ctx.config.correct_ocr_errors {
        return None;
    }
    ctx.locator()
        .locate_map(ctx.lines, Field::Email, ctx.options(), reconstruct_email)
        .or_else(|| ctx.lines.iter().find_map(|line| reconstruct_unlabeled_email(line)))
}

fn accept_phone(ctx: &Ctx<'_>, candidate: String, attempt: &mut Attempt) -> Option<String> {
    let digits = phone_digits(&candidate);
    if ctx.tax_id_digits().any(|id| id.contains(&digits)) {
        attempt.reject(candidate, Rejection::CoincidesWithTaxId);
        return None;
    }
    Some(candidate)
}

fn phone_from_label(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::Phone, ctx.options(), |value| {
            PhoneExtractor::new()
                .extract_all(value)
                .into_iter()
                .find_map(|m| cited(m, attempt, |value, attempt| accept_phone(ctx, value, attempt)))
        })
}

fn phone_any_line(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.lines.iter().find_map(|line| {
        PhoneExtractor::new()
            .extract_all(line)
            .into_iter()
            .find_map(|m| cited(m, attempt, |value, attempt| accept_phone(ctx, value, attempt)))
    })
}

fn phone_recovered(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    if !ctx.config.correct_ocr_errors {
        return None;
    }
    let extractor = PhoneExtractor::new().with_area_code_recovery(true);
    ctx.lines.iter().find_map(|line| {
        extractor
            .recover(line)
            .into_iter()
            .find_map(|m| cited(m, attempt, |value, attempt| accept_phone(ctx, value, attempt)))
    })
}

// Postal code

fn cep_from_label(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    let extractor = CepExtractor::new();
    ctx.locator()
        .locate_map(ctx.lines, Field::PostalCode, ctx.options(), |value| {
            extractor
                .extract(value)
                .map(|m| attempt.cite(m))
                .or_else(|| extractor.bare_line(value))
        })
}

fn cep_formatted(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    let extractor = CepExtractor::new();
    ctx.lines
        .iter()
        .find_map(|line| extractor.extract(line).map(|m| attempt.cite(m)))
}

fn cep_bare_line(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    let extractor = CepExtractor::new();
    ctx.views
        .iter()
        .filter(|view| {
            !view.previous_label.as_ref().is_some_and(|hit| {
                hit.names(Field::StateRegistration) || hit.names(Field::MunicipalRegistration)
            })
        })
        .find_map(|view| extractor.bare_line(view.text))
}

// Street and house number

fn street_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate(ctx.lines, Field::Street, ctx.options(), |value| {
            letter_count(value) >= 3
        })
}

fn street_ranked(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.ranked(&STREET_CARD, ctx.config.thresholds.street, attempt)
}

fn street_pattern(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.lines
        .iter()
        .filter(|line| !ctx.is_used(line))
        .find_map(|line| STREET_LINE.find(line).map(|m| m.as_str().trim().to_string()))
}

fn number_from_street(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.street.as_ref()?.number.clone()
}

fn number_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::HouseNumber, ctx.options(), |value| {
            HOUSE_NUMBER
                .is_match(value.trim())
                .then(|| normalize_house_number(value))
        })
}

fn number_ranked(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.ranked(&NUMBER_CARD, ctx.config.thresholds.house_number, attempt)
        .map(|line| normalize_house_number(&line))
}

fn number_after_comma(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.views
        .iter()
        .filter(|view| starts_with_street_type(view))
        .find_map(|view| {
            NUMBER_AFTER_COMMA
                .captures(view.text)
                .map(|caps| normalize_house_number(&caps[1]))
        })
}

// Complement and neighborhood

fn complement_from_street(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.tail.complement.clone()
}

fn complement_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate(ctx.lines, Field::Complement, ctx.options(), |value| {
            value.chars().any(char::is_alphanumeric)
        })
}

fn complement_ranked(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.ranked(&COMPLEMENT_CARD, ctx.config.thresholds.complement, attempt)
}

fn complement_pattern(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.lines
        .iter()
        .filter(|line| !ctx.is_used(line))
        .find_map(|line| {
            COMPLEMENT
                .find(line)
                .filter(|m| m.as_str().chars().any(|c| c.is_ascii_digit()))
                .map(|m| m.as_str().trim().to_string())
        })
}

fn neighborhood_from_street(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.tail.neighborhood.clone()
}

fn neighborhood_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate(ctx.lines, Field::Neighborhood, ctx.options(), |value| {
            letter_count(value) >= 2 && !value.contains('@')
        })
}

fn neighborhood_ranked(ctx: &Ctx<'_>, attempt: &mut Attempt) -> Option<String> {
    ctx.ranked(&NEIGHBORHOOD_CARD, ctx.config.thresholds.neighborhood, attempt)
}

fn neighborhood_before_city(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.lines.iter().find_map(|line| {
        NEIGHBORHOOD_BEFORE_CITY
            .captures(line)
            .map(|caps| caps[1].trim().to_string())
    })
}

// City and state

/// "City - UF" at the end of a line, after any comma-separated prefix.
fn city_uf_in(text: &str) -> Option<(String, &'static str)> {
    text.rsplit(',').next().and_then(parse_city_uf)
}

fn is_city_name(value: &str) -> bool {
    letter_count(value) >= 2
        && !value.chars().any(|c| c.is_ascii_digit())
        && !value.contains('@')
}

fn city_from_street(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.tail.city.clone()
}

fn city_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::City, ctx.options(), |value| {
            parse_city_uf(value)
                .map(|(city, _)| city)
                .or_else(|| is_city_name(value).then(|| value.to_string()))
        })
}

fn city_from_city_state_line(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.views
        .iter()
        .filter(|view| !view.is_label)
        .find_map(|view| city_uf_in(view.text))
        .map(|(city, _)| city)
}

fn state_from_street(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.tail.state.map(str::to_string)
}

fn state_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator()
        .locate_map(ctx.lines, Field::State, ctx.options(), |value| {
            uf_from_name(value)
                .or_else(|| {
                    TRAILING_UF
                        .captures(value)
                        .and_then(|caps| uf_from_name(&caps[1]))
                })
                .map(str::to_string)
        })
}

fn state_from_city_state_line(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.views
        .iter()
        .filter(|view| !view.is_label)
        .find_map(|view| city_uf_in(view.text))
        .map(|(_, uf)| uf.to_string())
}

fn state_bare_code(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.lines
        .iter()
        .map(|line| line.trim())
        .find(|line| BARE_UF.is_match(line) && validate_uf(line))
        .map(str::to_string)
}

// Registrations

fn state_registration_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator().locate(
        ctx.lines,
        Field::StateRegistration,
        ctx.options(),
        validate_state_registration,
    )
}

fn municipal_registration_from_label(ctx: &Ctx<'_>, _: &mut Attempt) -> Option<String> {
    ctx.locator().locate(
        ctx.lines,
        Field::MunicipalRegistration,
        ctx.options(),
        validate_municipal_registration,
    )
}
