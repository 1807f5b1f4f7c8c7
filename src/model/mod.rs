// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Document model the engine consumes: [`Feature`]s, [`Scenario`]s and
//! [`Step`]s, as produced upstream by a parser/outline-expander.
//!
//! Everything here is read-only input: the engine never mutates a
//! [`Scenario`] or its [`Step`]s, it only walks them in document order.

pub mod table;

use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::with_trait::Display;

pub use self::table::DataTable;

/// Stable identity of a [`Step`] within one scenario instantiation.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("step#{_0}")]
pub struct StepId(u64);

impl StepId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);

        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Declared kind of a [`Step`].
///
/// `Given`/`When`/`Then` keywords map to [`Context`]/[`Action`]/[`Outcome`];
/// `And`, `But` and the `*` wildcard are [`Conjunction`]s inheriting the
/// kind of the last non-conjunction step; anything else is [`Unknown`].
///
/// [`Context`]: StepKind::Context
/// [`Action`]: StepKind::Action
/// [`Outcome`]: StepKind::Outcome
/// [`Conjunction`]: StepKind::Conjunction
/// [`Unknown`]: StepKind::Unknown
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StepKind {
    /// Precondition step (`Given`).
    #[display("context")]
    Context,

    /// Action step (`When`).
    #[display("action")]
    Action,

    /// Assertion step (`Then`).
    #[display("outcome")]
    Outcome,

    /// Continuation step (`And`, `But`, `*`).
    #[display("conjunction")]
    Conjunction,

    /// Step with no recognizable keyword.
    #[display("unknown")]
    Unknown,
}

impl StepKind {
    /// Resolves a keyword's [`StepKind`].
    ///
    /// Trailing whitespace and the trailing `:` of continuation-style
    /// keywords are ignored.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().trim_end_matches(':') {
            "Given" => Self::Context,
            "When" => Self::Action,
            "Then" => Self::Outcome,
            "And" | "But" | "*" => Self::Conjunction,
            _ => Self::Unknown,
        }
    }

    /// Indicates whether this kind inherits its matching context from the
    /// preceding non-conjunction step.
    #[must_use]
    pub fn is_conjunction(&self) -> bool {
        matches!(self, Self::Conjunction)
    }
}

/// Structured argument block attached to a [`Step`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepArg {
    /// Tabular argument.
    Table(DataTable),

    /// Multi-line text argument.
    DocString(String),
}

/// One line of a [`Scenario`].
///
/// Created once per scenario instantiation by the upstream parser, never
/// mutated by the engine, discarded after the scenario finishes.
#[derive(Clone, Debug)]
pub struct Step {
    /// Stable identity of this step.
    pub id: StepId,

    /// Literal keyword as written (e.g. `"Given"`), kept for error
    /// messages.
    pub keyword: String,

    /// Declared kind, normally derived from [`keyword`].
    ///
    /// [`keyword`]: Step::keyword
    pub kind: StepKind,

    /// Step text with the keyword stripped.
    pub text: String,

    /// Optional structured argument block.
    pub arg: Option<StepArg>,

    /// Source line, for error messages.
    pub line: u32,

    /// Identity of the step immediately preceding this one in the same
    /// scenario, if any.
    pub previous: Option<StepId>,
}

impl Step {
    /// Creates a new [`Step`] with its kind derived from the `keyword`.
    #[must_use]
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let kind = StepKind::from_keyword(&keyword);
        Self {
            id: StepId::next(),
            keyword,
            kind,
            text: text.into(),
            arg: None,
            line: 0,
            previous: None,
        }
    }

    /// Overrides the derived [`StepKind`].
    #[must_use]
    pub fn with_kind(mut self, kind: StepKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attaches a [`DataTable`] argument.
    #[must_use]
    pub fn with_table(mut self, table: DataTable) -> Self {
        self.arg = Some(StepArg::Table(table));
        self
    }

    /// Attaches a doc string argument.
    #[must_use]
    pub fn with_docstring(mut self, text: impl Into<String>) -> Self {
        self.arg = Some(StepArg::DocString(text.into()));
        self
    }

    /// Records the source line.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

/// Fully-expanded scenario instance: outline placeholders resolved and
/// background steps already prepended, in document order.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Scenario name, for error messages.
    pub name: String,

    /// Ordered steps of this scenario.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates a new [`Scenario`], wiring each step's predecessor link in
    /// document order.
    #[must_use]
    pub fn new(name: impl Into<String>, mut steps: Vec<Step>) -> Self {
        let mut previous = None;
        for step in &mut steps {
            step.previous = previous;
            previous = Some(step.id);
        }
        Self { name: name.into(), steps }
    }
}

/// Feature identity, carried along for error messages and hooks.
#[derive(Clone, Debug, Default)]
pub struct Feature {
    /// Feature name.
    pub name: String,

    /// Path of the source document, if known.
    pub path: Option<String>,
}

impl Feature {
    /// Creates a new [`Feature`] with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), path: None }
    }

    /// Records the source document path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Best identity for error messages: the path when known, the name
    /// otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_keyword() {
        assert_eq!(StepKind::from_keyword("Given"), StepKind::Context);
        assert_eq!(StepKind::from_keyword("When"), StepKind::Action);
        assert_eq!(StepKind::from_keyword("Then"), StepKind::Outcome);
        assert_eq!(StepKind::from_keyword("And"), StepKind::Conjunction);
        assert_eq!(StepKind::from_keyword("But"), StepKind::Conjunction);
        assert_eq!(StepKind::from_keyword("*"), StepKind::Conjunction);
        assert_eq!(StepKind::from_keyword("Whenever"), StepKind::Unknown);
    }

    #[test]
    fn kind_from_keyword_tolerates_decorations() {
        assert_eq!(StepKind::from_keyword("Given "), StepKind::Context);
        assert_eq!(StepKind::from_keyword("And:"), StepKind::Conjunction);
    }

    #[test]
    fn step_ids_are_unique() {
        let a = Step::new("Given", "a");
        let b = Step::new("Given", "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn scenario_wires_predecessor_links() {
        let scenario = Scenario::new(
            "wiring",
            vec![
                Step::new("Given", "a"),
                Step::new("And", "b"),
                Step::new("When", "c"),
            ],
        );

        assert_eq!(scenario.steps[0].previous, None);
        assert_eq!(scenario.steps[1].previous, Some(scenario.steps[0].id));
        assert_eq!(scenario.steps[2].previous, Some(scenario.steps[1].id));
    }

    #[test]
    fn feature_display_name_prefers_path() {
        let feature = Feature::new("Wallet").with_path("features/wallet.feature");
        assert_eq!(feature.display_name(), "features/wallet.feature");
        assert_eq!(Feature::new("Wallet").display_name(), "Wallet");
    }
}
