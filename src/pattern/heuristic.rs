//! Priority-ordered composite step pattern.

use itertools::Itertools as _;

use crate::error::BuildError;

use super::{RawCapture, StepPattern};

/// Composite pattern trying every constructible strategy in fixed
/// priority order: exact string, then Cucumber Expression, then
/// template, then regex.
///
/// Construction failures of individual strategies are swallowed; a
/// strategy that fails to compile for the pattern text simply doesn't
/// take part. At match time the held strategies are asked in the same
/// priority order and the first one matching answers.
#[derive(Clone, Debug)]
pub struct Heuristic {
    source: String,
    strategies: Vec<StepPattern>,
}

impl Heuristic {
    /// Builds a [`Heuristic`] for the given pattern text.
    ///
    /// # Errors
    ///
    /// If no strategy at all can be constructed for the pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, BuildError> {
        let source = pattern.into();

        let mut strategies = vec![StepPattern::exact(source.as_str())];
        strategies.extend(StepPattern::expression(source.as_str()).ok());
        strategies.extend(StepPattern::template(source.as_str()).ok());
        strategies.extend(StepPattern::regex(source.as_str()).ok());

        if strategies.is_empty() {
            return Err(BuildError::NoStrategy { pattern: source });
        }
        Ok(Self { source, strategies })
    }

    /// Original pattern text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Constructible strategies, in priority order.
    #[must_use]
    pub fn strategies(&self) -> &[StepPattern] {
        &self.strategies
    }

    /// Indicates whether any held strategy matches `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.strategies.iter().any(|s| s.is_match(text))
    }

    /// Extracts via the first strategy, in priority order, matching
    /// `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<Vec<RawCapture>> {
        self.strategies.iter().find(|s| s.is_match(text))?.extract(text)
    }

    /// Union of the held strategies' named slots, first occurrence wins.
    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        self.strategies
            .iter()
            .flat_map(StepPattern::slot_names)
            .unique()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_text_wins_over_everything() {
        // The pattern text itself contains `{n}`, so the literal step
        // text "I have {n} cukes" must answer via the exact strategy,
        // while other texts fall through to the template strategy.
        let p = Heuristic::new("I have {n} cukes").unwrap();
        assert_eq!(
            p.extract("I have {n} cukes").unwrap(),
            Vec::<RawCapture>::new(),
        );
        assert_eq!(
            p.extract("I have 5 cukes").unwrap(),
            vec![(Some("n".to_owned()), "5".to_owned())],
        );
    }

    #[test]
    fn expression_parameters_match() {
        let p = Heuristic::new("I have {int} Euro").unwrap();
        let caps = p.extract("I have 6 Euro").unwrap();
        assert_eq!(caps, vec![(None, "6".to_owned())]);
    }

    #[test]
    fn regex_pattern_falls_through_to_regex_strategy() {
        // `(\d+)` parses as a Cucumber Expression (optional text), which
        // never matches digits, and as a template literal, which doesn't
        // either, so the regex strategy answers.
        let p = Heuristic::new(r"I should have (\d+) Euro").unwrap();
        let caps = p.extract("I should have 0 Euro").unwrap();
        assert_eq!(caps, vec![(None, "0".to_owned())]);
    }

    #[test]
    fn no_match_anywhere_is_none() {
        let p = Heuristic::new("I have a wallet").unwrap();
        assert!(!p.is_match("I have a purse"));
        assert!(p.extract("I have a purse").is_none());
    }

    #[test]
    fn slot_names_union_is_deduplicated() {
        let p = Heuristic::new("there are {n} cukes").unwrap();
        assert_eq!(p.slot_names(), vec!["n"]);
    }
}
