//! Declarative line scoring for fields that usually have no label.
//!
//! A [`ScoreCard`] is a list of rules evaluated against a [`LineView`].
//! Any matching `Reject` rule removes the line from the ranking; the other
//! rules add points. The best line above the threshold wins, with ties
//! going to the earliest line.

use tracing::trace;

use super::labels::{fold, LabelHit, LabelIndex};
use crate::models::record::Field;

/// Precomputed facts about one input line.
#[derive(Debug, Clone)]
pub struct LineView<'a> {
    pub index: usize,
    pub text: &'a str,
    /// Folded text.
    pub folded: String,
    /// Folded words with surrounding punctuation trimmed.
    pub words: Vec<String>,
    /// The line is a label or a section header.
    pub is_label: bool,
    /// Label on the previous line, if it was one.
    pub previous_label: Option<LabelHit>,
    /// Folded section header on the previous line, if it was one.
    pub previous_section: Option<String>,
    /// Text of the previous line.
    pub previous_text: Option<&'a str>,
}

impl<'a> LineView<'a> {
    /// Build views for every line.
    pub fn build(lines: &'a [String], labels: &LabelIndex) -> Vec<LineView<'a>> {
        let hits: Vec<Option<LabelHit>> = lines.iter().map(|l| labels.classify(l)).collect();
        let headers: Vec<bool> = lines.iter().map(|l| labels.is_section_header(l)).collect();

        lines
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let folded = fold(text);
                let words = folded
                    .split_whitespace()
                    .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                    .filter(|w| !w.is_empty())
                    .collect();
                let previous = index.checked_sub(1);

                LineView {
                    index,
                    text: text.as_str(),
                    folded,
                    words,
                    is_label: hits[index].is_some() || headers[index],
                    previous_label: previous.and_then(|p| hits[p].clone()),
                    previous_section: previous
                        .filter(|p| headers[*p])
                        .map(|p| fold(lines[p].trim()).trim_end_matches(':').trim().to_string()),
                    previous_text: previous.map(|p| lines[p].as_str()),
                }
            })
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Whether a folded word appears as a whole word.
    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Whether any of the folded words appears as a whole word.
    pub fn has_any_word(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.has_word(w))
    }

    /// Letters over non-whitespace characters.
    pub fn letter_density(&self) -> f64 {
        let total = self.text.chars().filter(|c| !c.is_whitespace()).count();
        if total == 0 {
            return 0.0;
        }
        let letters = self.text.chars().filter(|c| c.is_alphabetic()).count();
        letters as f64 / total as f64
    }

    /// Letters and spaces over all characters.
    pub fn letter_ratio(&self) -> f64 {
        let total = self.text.chars().count();
        if total == 0 {
            return 0.0;
        }
        let letters = self
            .text
            .chars()
            .filter(|c| c.is_alphabetic() || *c == ' ')
            .count();
        letters as f64 / total as f64
    }

    /// Share of words starting with an uppercase letter.
    pub fn capital_ratio(&self) -> f64 {
        let words: Vec<&str> = self.text.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        let capitalized = words
            .iter()
            .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
            .count();
        capitalized as f64 / words.len() as f64
    }

    pub fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }

    /// Previous line is a bare label for `field`.
    pub fn follows_label_for(&self, field: Field) -> bool {
        self.previous_label
            .as_ref()
            .is_some_and(|hit| hit.names(field) && hit.value.is_none())
    }

    /// Previous line is a label for some field other than `field`.
    pub fn follows_other_label(&self, field: Field) -> bool {
        self.previous_label
            .as_ref()
            .is_some_and(|hit| !hit.names(field))
    }
}

/// One scoring rule.
pub enum Rule {
    /// Remove the line from the ranking when the predicate holds.
    Reject(&'static str, fn(&LineView) -> bool),
    /// Add a fixed weight (possibly negative) when the predicate holds.
    Bonus(&'static str, f64, fn(&LineView) -> bool),
    /// Add weight times a measured quantity.
    Scaled(&'static str, f64, fn(&LineView) -> f64),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Reject(name, _) | Rule::Bonus(name, _, _) | Rule::Scaled(name, _, _) => name,
        }
    }
}

/// Rules for one field.
pub struct ScoreCard {
    pub field: Field,
    pub rules: &'static [Rule],
}

impl ScoreCard {
    /// Score a line, or `None` when a reject rule fires.
    pub fn score(&self, view: &LineView) -> Option<f64> {
        self.breakdown(view)
            .map(|parts| parts.iter().map(|(_, points)| points).sum())
    }

    /// Points contributed by each non-zero rule, or `None` when rejected.
    pub fn breakdown(&self, view: &LineView) -> Option<Vec<(&'static str, f64)>> {
        let mut parts = Vec::new();

        for rule in self.rules {
            match rule {
                Rule::Reject(name, when) => {
                    if when(view) {
                        trace!("{} line {}: rejected by {}", self.field, view.index, name);
                        return None;
                    }
                }
                Rule::Bonus(name, weight, when) => {
                    if when(view) {
                        parts.push((*name, *weight));
                    }
                }
                Rule::Scaled(name, weight, measure) => {
                    let points = weight * measure(view);
                    if points != 0.0 {
                        parts.push((*name, points));
                    }
                }
            }
        }

        Some(parts)
    }
}

/// A scored line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub score: f64,
}

/// Outcome of ranking lines for one field.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Highest-scoring line above the threshold.
    pub winner: Option<Candidate>,
    /// Every line above the threshold, in input order.
    pub contenders: Vec<Candidate>,
}

impl Ranking {
    pub fn is_ambiguous(&self) -> bool {
        self.contenders.len() > 1
    }
}

/// Rank lines with `card`, keeping those strictly above `threshold`.
pub fn rank<'v, 'a: 'v, I>(views: I, card: &ScoreCard, threshold: f64) -> Ranking
where
    I: IntoIterator<Item = &'v LineView<'a>>,
{
    let mut ranking = Ranking::default();

    for view in views {
        let Some(score) = card.score(view) else {
            continue;
        };
        trace!("{} line {} scored {:.1}: {:?}", card.field, view.index, score, view.text);
        if score <= threshold {
            continue;
        }

        let candidate = Candidate {
            index: view.index,
            score,
        };
        ranking.contenders.push(candidate);

        let better = ranking.winner.is_none_or(|best| score > best.score);
        if better {
            ranking.winner = Some(candidate);
        }
    }

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn is_short(view: &LineView) -> bool {
        view.text.len() < 3
    }

    fn per_word(view: &LineView) -> f64 {
        view.word_count() as f64
    }

    fn after_city_label(view: &LineView) -> bool {
        view.follows_label_for(Field::City)
    }

    static CARD: ScoreCard = ScoreCard {
        field: Field::City,
        rules: &[
            Rule::Reject("short", is_short),
            Rule::Scaled("words", 10.0, per_word),
            Rule::Bonus("after label", 50.0, after_city_label),
        ],
    };

    #[test]
    fn test_line_view_facts() {
        let index = LabelIndex::default();
        let input = lines(&["Cidade", "São José dos Campos", "Dados de contato", "x"]);
        let views = LineView::build(&input, &index);

        assert!(views[0].is_label);
        assert!(!views[1].is_label);
        assert_eq!(views[1].words, vec!["sao", "jose", "dos", "campos"]);
        assert!(views[1].follows_label_for(Field::City));
        assert!(!views[1].follows_other_label(Field::City));
        assert!(views[1].follows_other_label(Field::State));
        assert_eq!(views[3].previous_section.as_deref(), Some("dados de contato"));
    }

    #[test]
    fn test_ratios() {
        let index = LabelIndex::default();
        let input = lines(&["Rua A, 12", "Maria silva"]);
        let views = LineView::build(&input, &index);

        assert!((views[0].letter_density() - 4.0 / 7.0).abs() < 1e-9);
        assert_eq!(views[1].letter_ratio(), 1.0);
        assert_eq!(views[1].capital_ratio(), 0.5);
    }

    #[test]
    fn test_breakdown_and_rejection() {
        let index = LabelIndex::default();
        let input = lines(&["Cidade", "Porto Alegre", "ab"]);
        let views = LineView::build(&input, &index);

        assert_eq!(
            CARD.breakdown(&views[1]),
            Some(vec![("words", 20.0), ("after label", 50.0)])
        );
        assert_eq!(CARD.score(&views[2]), None);
    }

    #[test]
    fn test_rank_threshold_and_tie_break() {
        let index = LabelIndex::default();
        let input = lines(&["alpha beta", "gamma delta", "one"]);
        let views = LineView::build(&input, &index);

        let ranking = rank(&views, &CARD, 15.0);
        assert_eq!(ranking.winner.map(|c| c.index), Some(0));
        assert!(ranking.is_ambiguous());
        assert_eq!(ranking.contenders.len(), 2);

        let ranking = rank(&views, &CARD, 20.0);
        assert!(ranking.winner.is_none());
    }
}
