// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step registration, matching and scenario dispatch engine for
//! behavior-driven tests.
//!
//! The engine turns a human-readable scenario (`Given`/`When`/`Then`
//! steps) into calls against registered step implementations: a
//! hierarchical [`Registry`] of [`StepDefinition`]s, a multi-tier
//! [`Matcher`] deciding which definition answers which step text,
//! pluggable [`StepPattern`] strategies for argument extraction, and a
//! [`Runner`] walking a scenario's steps, invoking matched
//! implementations with resolved arguments and broadcasting lifecycle
//! [`Hooks`].
//!
//! Out of scope, by design: parsing Gherkin text, outline expansion,
//! reporters and process lifecycle. The engine consumes an
//! already-expanded document model (see [`model`]) and an external
//! by-name [`ValueStore`] for inter-step data passing.
//!
//! # Example
//!
//! ```rust
//! use cornichon::{
//!     converter, Feature, Registry, Returned, Runner, Scenario,
//!     ScenarioValues, Step, StepDefinition, StepPattern,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut registry = Registry::new();
//! registry.register(
//!     StepDefinition::given(
//!         StepPattern::template("there are {n} cukes").unwrap(),
//!     )
//!     .converter("n", converter::parsed::<u64>())
//!     .output("count")
//!     .to_sync(|ctx| Ok(Returned::of(*ctx.get::<u64>("n").unwrap()))),
//! );
//! registry.register(
//!     StepDefinition::then(
//!         StepPattern::template("I should have {n} cukes").unwrap(),
//!     )
//!     .converter("n", converter::parsed::<u64>())
//!     .params(["n", "count"])
//!     .to_sync(|ctx| {
//!         assert_eq!(ctx.get::<u64>("n"), ctx.get::<u64>("count"));
//!         Ok(Returned::Unit)
//!     }),
//! );
//!
//! let feature = Feature::new("Cukes");
//! let scenario = Scenario::new(
//!     "counting",
//!     vec![
//!         Step::new("Given", "there are 5 cukes"),
//!         Step::new("Then", "I should have 5 cukes"),
//!     ],
//! );
//!
//! let mut values = ScenarioValues::new();
//! Runner::new()
//!     .run_scenario(&registry, &feature, &scenario, &mut values)
//!     .await
//!     .unwrap();
//! # }
//! ```

pub mod error;
pub mod hook;
pub mod matcher;
pub mod model;
pub mod pattern;
pub mod registry;
pub mod runner;
pub mod step;
pub mod value;

pub use self::{
    error::{
        BuildError, ConvertError, LookupError, NoMatch, ScenarioError,
        StepError, StepFault,
    },
    hook::{Hooks, HookSet},
    matcher::{MatchConfig, MatchContext, Matcher, Resolution, Tier},
    model::{
        DataTable, Feature, Scenario, Step, StepArg, StepId, StepKind,
    },
    pattern::StepPattern,
    registry::Registry,
    runner::{Runner, DATATABLE_PARAM, DOCSTRING_PARAM, STEP_PARAM},
    step::{
        converter, DefinitionBuilder, ExposePolicy, Location, ParamSpec,
        Returned, StepContext, StepDefinition, StepFn,
    },
    value::{ScenarioValues, Value, ValueStore},
};
