// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of the engine, by domain: pattern construction, step
//! lookup, argument conversion, step execution and whole-scenario
//! failure.
//!
//! All fatal errors propagate to the host as [`Result`]s; the engine
//! never swallows one. Ambiguous matches are deliberately *not* errors
//! (see [`matcher`]).
//!
//! [`matcher`]: crate::matcher

use derive_more::with_trait::{Display, Error, From};

/// Opaque failure returned by a step callable.
pub type StepFault = Box<dyn std::error::Error + Send + Sync>;

/// Error of compiling a step pattern at declaration time.
///
/// Fatal to that registration only; raised before any scenario runs.
#[derive(Debug, Display, Error)]
pub enum BuildError {
    /// Regex pattern failed to compile.
    #[display("invalid regex step pattern \"{pattern}\": {source}")]
    Regex {
        /// Original pattern text.
        #[error(not(source))]
        pattern: String,

        /// Compilation failure.
        source: regex::Error,
    },

    /// Template pattern failed to compile.
    #[display("invalid template step pattern \"{pattern}\": {message}")]
    Template {
        /// Original pattern text.
        #[error(not(source))]
        pattern: String,

        /// What went wrong.
        message: String,
    },

    /// Cucumber-expression pattern failed to compile.
    #[display("invalid expression step pattern \"{pattern}\": {message}")]
    Expression {
        /// Original pattern text.
        #[error(not(source))]
        pattern: String,

        /// What went wrong.
        message: String,
    },

    /// No strategy at all could be constructed for the pattern.
    #[display("no pattern strategy could be built for \"{pattern}\"")]
    NoStrategy {
        /// Original pattern text.
        #[error(not(source))]
        pattern: String,
    },
}

/// Error of a converter transforming an extracted argument value.
#[derive(Clone, Debug, Display, Error)]
#[display("{message}")]
pub struct ConvertError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl ConvertError {
    /// Creates a new [`ConvertError`] with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Error of a [`Matcher`] finding no definition for a step anywhere up
/// the scope chain.
///
/// The [`Runner`] wraps this with scenario and feature identity into a
/// [`LookupError`] before surfacing it to the host.
///
/// [`Matcher`]: crate::matcher::Matcher
/// [`Runner`]: crate::runner::Runner
#[derive(Clone, Debug, Display, Error)]
#[display("no step definition matched \"{step_text}\"")]
pub struct NoMatch {
    /// Text of the unmatched step.
    pub step_text: String,
}

/// Error of dispatching a step no registered definition answers.
///
/// Aborts the scenario; the message identifies the step, its keyword and
/// source line, and the owning scenario and feature.
#[derive(Clone, Debug, Display, Error)]
#[display(
    "Step definition is not found: \"{step_text}\". \
     Step keyword: \"{keyword}\". \
     Line {line} \
     in scenario \"{scenario}\" \
     in the feature \"{feature}\""
)]
pub struct LookupError {
    /// Text of the unmatched step.
    pub step_text: String,

    /// Keyword of the unmatched step, as written.
    pub keyword: String,

    /// Source line of the unmatched step.
    pub line: u32,

    /// Name of the owning scenario.
    pub scenario: String,

    /// Identity of the owning feature.
    pub feature: String,
}

/// Error of executing one matched step.
#[derive(Debug, Display, Error)]
pub enum StepError {
    /// Converter failed on an extracted argument.
    #[display("converter failed for argument \"{name}\": {source}")]
    Convert {
        /// Argument the converter was registered for.
        #[error(not(source))]
        name: String,

        /// Conversion failure.
        source: ConvertError,
    },

    /// A declared parameter resolved nowhere.
    ///
    /// Tried, in order: extracted arguments, step metadata, the ambient
    /// value store, the parameter's declared default.
    #[display("cannot resolve parameter \"{param}\" of the step callable")]
    Unresolved {
        /// Name of the unresolvable parameter.
        #[error(not(source))]
        param: String,
    },

    /// The step callable returned an error.
    #[display("{_0}")]
    Failed(#[error(not(source))] StepFault),

    /// The step callable panicked.
    #[display("step panicked: {message}")]
    Panicked {
        /// Panic payload, coerced to text.
        #[error(not(source))]
        message: String,
    },
}

impl StepError {
    /// Creates a [`StepError::Failed`] from a plain message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into().into())
    }
}

/// Terminal failure of a scenario run, as surfaced to the host.
///
/// Once raised, no further steps of the scenario are dispatched.
#[derive(Debug, Display, Error, From)]
pub enum ScenarioError {
    /// A step had no matching definition.
    #[display("{_0}")]
    Lookup(LookupError),

    /// A matched step failed to execute.
    #[display("step \"{step_text}\" failed: {source}")]
    #[from(ignore)]
    Step {
        /// Text of the failing step.
        #[error(not(source))]
        step_text: String,

        /// Underlying failure.
        source: StepError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_names_step_and_scenario() {
        let err = LookupError {
            step_text: "I have a wallet".into(),
            keyword: "Given".into(),
            line: 3,
            scenario: "Opening balance".into(),
            feature: "wallet.feature".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"I have a wallet\""));
        assert!(msg.contains("\"Given\""));
        assert!(msg.contains("Line 3"));
        assert!(msg.contains("\"Opening balance\""));
        assert!(msg.contains("\"wallet.feature\""));
    }

    #[test]
    fn step_error_display() {
        let convert = StepError::Convert {
            name: "n".into(),
            source: ConvertError::new("invalid digit"),
        };
        assert!(convert.to_string().contains("\"n\""));
        assert!(convert.to_string().contains("invalid digit"));

        let unresolved = StepError::Unresolved { param: "browser".into() };
        assert!(unresolved.to_string().contains("\"browser\""));

        let failed = StepError::failed("boom");
        assert_eq!(failed.to_string(), "boom");
    }

    #[test]
    fn scenario_error_wraps_lookup() {
        let err: ScenarioError = LookupError {
            step_text: "x".into(),
            keyword: "When".into(),
            line: 1,
            scenario: "s".into(),
            feature: "f".into(),
        }
        .into();
        assert!(matches!(err, ScenarioError::Lookup(_)));
    }

    #[test]
    fn build_error_display() {
        let err = BuildError::NoStrategy { pattern: "((".into() };
        assert!(err.to_string().contains("(("));
    }
}
