//! Ordered strategy lists combined by "first success wins".

use tracing::debug;

use super::diagnostics::{Diagnostics, Outcome, Attempt};
use crate::models::record::Field;

/// A named extraction strategy over a context `C`.
pub type StrategyFn<C> = fn(&C, &mut Attempt) -> Option<String>;

/// One entry of a cascade.
pub struct Strategy<C> {
    pub name: &'static str,
    pub run: StrategyFn<C>,
}

impl<C> Strategy<C> {
    pub const fn new(name: &'static str, run: StrategyFn<C>) -> Self {
        Self { name, run }
    }
}

/// Strategies for one field, most contextual first.
pub struct Cascade<'s, C> {
    field: Field,
    strategies: &'s [Strategy<C>],
}

impl<'s, C> Cascade<'s, C> {
    pub fn new(field: Field, strategies: &'s [Strategy<C>]) -> Self {
        Self { field, strategies }
    }

    /// Run strategies in order and return the first value found.
    ///
    /// Every attempt is written to `diagnostics`: its rejected candidates,
    /// any ambiguity, and the final match or absence.
    pub fn run(&self, ctx: &C, diagnostics: &mut Diagnostics) -> Option<String> {
        for strategy in self.strategies {
            let mut attempt = Attempt::default();
            let found = (strategy.run)(ctx, &mut attempt);

            for (candidate, reason) in attempt.rejected {
                debug!(
                    "{} [{}]: rejected {:?} ({:?})",
                    self.field, strategy.name, candidate, reason
                );
                diagnostics.record(
                    self.field,
                    strategy.name,
                    Outcome::Rejected { candidate, reason },
                );
            }
            if let Some((lines, winner)) = attempt.ambiguous {
                debug!(
                    "{} [{}]: {} lines above threshold, line {} wins",
                    self.field,
                    strategy.name,
                    lines.len(),
                    winner
                );
                diagnostics.record(self.field, strategy.name, Outcome::Ambiguous { lines, winner });
            }

            match found {
                Some(value) => {
                    debug!("{} [{}]: matched {:?}", self.field, strategy.name, value);
                    let (source, confidence) = match attempt.evidence {
                        Some((source, confidence)) => {
                            ((source != value).then_some(source), Some(confidence))
                        }
                        None => (None, None),
                    };
                    diagnostics.record(
                        self.field,
                        strategy.name,
                        Outcome::Matched {
                            value: value.clone(),
                            source,
                            confidence,
                        },
                    );
                    return Some(value);
                }
                None => diagnostics.record(self.field, strategy.name, Outcome::Absent),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::diagnostics::Rejection;
    use crate::extract::rules::ExtractionMatch;

    struct Ctx {
        text: &'static str,
    }

    fn never(_: &Ctx, _: &mut Attempt) -> Option<String> {
        None
    }

    fn refuses(ctx: &Ctx, attempt: &mut Attempt) -> Option<String> {
        attempt.reject(ctx.text, Rejection::InvalidShape);
        None
    }

    fn echo(ctx: &Ctx, _: &mut Attempt) -> Option<String> {
        Some(ctx.text.to_string())
    }

    fn shout(ctx: &Ctx, _: &mut Attempt) -> Option<String> {
        Some(ctx.text.to_uppercase())
    }

    fn cites(ctx: &Ctx, attempt: &mut Attempt) -> Option<String> {
        Some(attempt.cite(ExtractionMatch::new(ctx.text.to_uppercase(), 0.5, ctx.text)))
    }

    const STRATEGIES: [Strategy<Ctx>; 4] = [
        Strategy::new("never", never),
        Strategy::new("refuses", refuses),
        Strategy::new("echo", echo),
        Strategy::new("shout", shout),
    ];

    #[test]
    fn test_first_success_wins() {
        let cascade = Cascade::new(Field::City, &STRATEGIES);
        let mut diagnostics = Diagnostics::new(true);

        let found = cascade.run(&Ctx { text: "recife" }, &mut diagnostics);
        assert_eq!(found.as_deref(), Some("recife"));

        let entries = diagnostics.into_entries();
        let strategies: Vec<&str> = entries.iter().map(|d| d.strategy.as_str()).collect();
        assert_eq!(strategies, vec!["never", "refuses", "refuses", "echo"]);
        assert_eq!(
            entries[1].outcome,
            Outcome::Rejected {
                candidate: "recife".to_string(),
                reason: Rejection::InvalidShape
            }
        );
    }

    #[test]
    fn test_all_absent() {
        let cascade = Cascade::new(Field::City, &STRATEGIES[..2]);
        let mut diagnostics = Diagnostics::new(true);

        assert_eq!(cascade.run(&Ctx { text: "x" }, &mut diagnostics), None);
    }

    #[test]
    fn test_match_carries_rule_evidence() {
        const CITING: [Strategy<Ctx>; 2] =
            [Strategy::new("echo", echo), Strategy::new("cites", cites)];
        let mut diagnostics = Diagnostics::new(true);

        Cascade::new(Field::City, &CITING[1..]).run(&Ctx { text: "recife" }, &mut diagnostics);
        Cascade::new(Field::City, &CITING[..1]).run(&Ctx { text: "recife" }, &mut diagnostics);

        let entries = diagnostics.into_entries();
        assert_eq!(
            entries[0].outcome,
            Outcome::Matched {
                value: "RECIFE".to_string(),
                source: Some("recife".to_string()),
                confidence: Some(0.5),
            }
        );
        assert_eq!(entries[1].outcome, Outcome::matched("recife"));
    }
}
