// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step-pattern strategies deciding whether a step text answers a
//! registered pattern and extracting its named arguments.
//!
//! A [`StepPattern`] is one of:
//! - [`Exact`]: literal equality, no arguments;
//! - [`RegexPattern`]: anchored regex with named/unnamed groups;
//! - [`Template`]: `{name}` / `{name:type}` fields compiled to a regex;
//! - [`CucumberExpression`]: a Cucumber Expression compiled via
//!   [`cucumber_expressions`];
//! - [`Heuristic`]: tries the others in fixed priority order.
//!
//! Contract: if [`StepPattern::is_match()`] returns `true` for a text,
//! [`StepPattern::extract()`] returns `Some` for that same text.

pub mod exact;
pub mod expression;
pub mod heuristic;
pub mod regex;
pub mod template;

use std::fmt;

use ::regex::Regex;

use crate::error::BuildError;

pub use self::{
    exact::Exact,
    expression::CucumberExpression,
    heuristic::Heuristic,
    regex::RegexPattern,
    template::Template,
};

/// One capture group extracted from a step text: the group's name (when
/// the strategy names it) and the matched text.
///
/// Unnamed groups keep document order, so a definition can assign them
/// names positionally.
pub type RawCapture = (Option<String>, String);

/// Pattern a step definition is registered under.
#[derive(Clone, Debug)]
pub enum StepPattern {
    /// Literal string equality.
    Exact(Exact),

    /// Anchored regex.
    Regex(RegexPattern),

    /// Templated `{field}` syntax.
    Template(Template),

    /// Cucumber Expression.
    Expression(CucumberExpression),

    /// Priority-ordered composite of the above.
    Heuristic(Heuristic),
}

impl StepPattern {
    /// Creates an [`Exact`] pattern. Never fails.
    #[must_use]
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self::Exact(Exact::new(pattern))
    }

    /// Compiles a [`RegexPattern`].
    ///
    /// # Errors
    ///
    /// If the pattern is not a valid regex.
    pub fn regex(pattern: impl Into<String>) -> Result<Self, BuildError> {
        RegexPattern::new(pattern).map(Self::Regex)
    }

    /// Compiles a [`Template`] pattern.
    ///
    /// # Errors
    ///
    /// If a `{field}` is unbalanced, misnamed, or of an unsupported type.
    pub fn template(pattern: impl Into<String>) -> Result<Self, BuildError> {
        Template::new(pattern).map(Self::Template)
    }

    /// Compiles a [`CucumberExpression`] pattern.
    ///
    /// # Errors
    ///
    /// If the pattern is not a valid Cucumber Expression.
    pub fn expression(pattern: impl Into<String>) -> Result<Self, BuildError> {
        CucumberExpression::new(pattern).map(Self::Expression)
    }

    /// Builds a [`Heuristic`] composite for the pattern.
    ///
    /// # Errors
    ///
    /// If no strategy at all can be constructed for the pattern.
    pub fn heuristic(pattern: impl Into<String>) -> Result<Self, BuildError> {
        Heuristic::new(pattern).map(Self::Heuristic)
    }

    /// Original pattern text, as registered.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Exact(p) => p.source(),
            Self::Regex(p) => p.source(),
            Self::Template(p) => p.source(),
            Self::Expression(p) => p.source(),
            Self::Heuristic(p) => p.source(),
        }
    }

    /// Indicates whether the given step `text` answers this pattern.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Exact(p) => p.is_match(text),
            Self::Regex(p) => p.is_match(text),
            Self::Template(p) => p.is_match(text),
            Self::Expression(p) => p.is_match(text),
            Self::Heuristic(p) => p.is_match(text),
        }
    }

    /// Extracts this pattern's capture groups from the step `text`.
    ///
    /// Returns [`None`] iff [`is_match()`] is `false` for the same text.
    ///
    /// [`is_match()`]: StepPattern::is_match
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<Vec<RawCapture>> {
        match self {
            Self::Exact(p) => p.extract(text),
            Self::Regex(p) => p.extract(text),
            Self::Template(p) => p.extract(text),
            Self::Expression(p) => p.extract(text),
            Self::Heuristic(p) => p.extract(text),
        }
    }

    /// Named argument slots this pattern can produce.
    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        match self {
            Self::Exact(p) => p.slot_names(),
            Self::Regex(p) => p.slot_names(),
            Self::Template(p) => p.slot_names(),
            Self::Expression(p) => p.slot_names(),
            Self::Heuristic(p) => p.slot_names(),
        }
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

/// Collects a compiled regex's capture groups for `text`, excluding the
/// whole match. Unmatched optional groups extract as empty strings.
pub(crate) fn captures_of(re: &Regex, text: &str) -> Option<Vec<RawCapture>> {
    let caps = re.captures(text)?;
    Some(
        re.capture_names()
            .zip(caps.iter())
            .skip(1)
            .map(|(name, m)| {
                (
                    name.map(str::to_owned),
                    m.map_or_else(String::new, |m| m.as_str().to_owned()),
                )
            })
            .collect(),
    )
}
