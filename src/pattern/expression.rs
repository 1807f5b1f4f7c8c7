//! Cucumber Expression step pattern.

use cucumber_expressions::Expression;
use regex::Regex;

use crate::error::BuildError;

use super::{captures_of, RawCapture};

/// Pattern written as a [Cucumber Expression], compiled to an anchored
/// regex through [`cucumber_expressions`].
///
/// Expression parameters (`{int}`, `{word}`, …) compile to unnamed
/// capture groups; the owning definition assigns them names
/// positionally.
///
/// [Cucumber Expression]: https://github.com/cucumber/cucumber-expressions#readme
#[derive(Clone, Debug)]
pub struct CucumberExpression {
    source: String,
    regex: Regex,
}

impl CucumberExpression {
    /// Compiles a new [`CucumberExpression`] pattern.
    ///
    /// # Errors
    ///
    /// If the pattern is not a valid Cucumber Expression.
    pub fn new(pattern: impl Into<String>) -> Result<Self, BuildError> {
        let source = pattern.into();
        let regex = Expression::regex(source.as_str()).map_err(|e| {
            BuildError::Expression {
                pattern: source.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { source, regex })
    }

    /// Original pattern text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Indicates whether the whole `text` matches the expression.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Extracts the expression's parameters from `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<Vec<RawCapture>> {
        captures_of(&self.regex, text)
    }

    /// Expression parameters are unnamed, so no named slots.
    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        self.regex.capture_names().flatten().map(str::to_owned).collect()
    }
}
