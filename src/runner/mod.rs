// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Runner`]: drives one scenario, step by step.
//!
//! For each step, in order: match it against the [`Registry`] chain,
//! extract and convert its arguments, publish what the definition's
//! exposure policy allows, resolve the callable's parameters, invoke it
//! inside the lifecycle-callback sandwich, and bind declared outputs
//! into the ambient [`ValueStore`] for later steps.
//!
//! Steps run strictly sequentially on the caller's task; an async step
//! callable is awaited to completion before the next step starts. There
//! is no backtracking: the first failing step terminal-fails the
//! scenario and no further steps are dispatched.
//!
//! [`Registry`]: crate::registry::Registry

mod invoke;

use std::sync::Arc;

use crate::{
    error::{LookupError, ScenarioError},
    hook::{Hooks, HookSet},
    matcher::{MatchConfig, MatchContext, Matcher},
    model::{Feature, Scenario, Step},
    registry::Registry,
    value::ValueStore,
};

/// Reserved parameter name resolving to the [`Step`] being executed.
pub const STEP_PARAM: &str = "step";

/// Reserved argument name a step's table block is exposed under.
pub const DATATABLE_PARAM: &str = "datatable";

/// Reserved argument name a step's doc string block is exposed under.
pub const DOCSTRING_PARAM: &str = "docstring";

/// Per-scenario mutable state threaded explicitly through dispatch: the
/// matching context and the names published into the value store so
/// far (undone when the scenario ends).
#[derive(Debug, Default)]
struct RunContext {
    matching: MatchContext,
    bound: Vec<String>,
}

/// Sequential scenario executor.
#[derive(Debug, Default)]
pub struct Runner {
    config: MatchConfig,
    hooks: HookSet,
}

impl Runner {
    /// Creates a [`Runner`] with the default [`MatchConfig`] and no
    /// subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the ambient [`MatchConfig`].
    #[must_use]
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribes `hooks` to this runner's lifecycle callbacks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn Hooks>) -> Self {
        self.hooks.add(hooks);
        self
    }

    /// Runs one scenario to completion or first failure.
    ///
    /// Exactly one `before_scenario`/`after_scenario` pair is broadcast,
    /// and every name published into `values` during the run is unset
    /// before returning, so scenario-scoped values never leak.
    ///
    /// # Errors
    ///
    /// [`ScenarioError`], if a step matches nothing or a matched step
    /// fails; steps after the failing one are not dispatched.
    pub async fn run_scenario(
        &self,
        registry: &Registry,
        feature: &Feature,
        scenario: &Scenario,
        values: &mut dyn ValueStore,
    ) -> Result<(), ScenarioError> {
        self.hooks.before_scenario(feature, scenario);
        tracing::debug!(
            feature = %feature.display_name(),
            scenario = %scenario.name,
            steps = scenario.steps.len(),
            "scenario started"
        );

        let matcher = Matcher::with_config(registry, self.config);
        let mut ctx = RunContext::default();

        let mut result = Ok(());
        for step in &scenario.steps {
            if let Err(e) = self
                .run_step(&matcher, feature, scenario, step, &mut ctx, values)
                .await
            {
                result = Err(e);
                break;
            }
        }

        for name in ctx.bound.drain(..) {
            values.unset(&name);
        }
        self.hooks.after_scenario(feature, scenario);
        result
    }

    async fn run_step(
        &self,
        matcher: &Matcher<'_>,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        ctx: &mut RunContext,
        values: &mut dyn ValueStore,
    ) -> Result<(), ScenarioError> {
        let Ok(resolution) = matcher.resolve(step, &mut ctx.matching) else {
            let error = LookupError {
                step_text: step.text.clone(),
                keyword: step.keyword.clone(),
                line: step.line,
                scenario: scenario.name.clone(),
                feature: feature.display_name().to_owned(),
            };
            self.hooks.on_step_lookup_error(feature, scenario, step, &error);
            return Err(ScenarioError::Lookup(error));
        };
        let definition = resolution.definition;

        self.hooks.before_step(feature, scenario, step, definition);

        match self
            .dispatch(definition, feature, scenario, step, ctx, values)
            .await
        {
            Ok(returned) => {
                invoke::bind_outputs(definition, returned, ctx, values);
                self.hooks.after_step(feature, scenario, step, definition);
                Ok(())
            }
            Err(error) => {
                self.hooks
                    .on_step_error(feature, scenario, step, definition, &error);
                Err(ScenarioError::Step {
                    step_text: step.text.clone(),
                    source: error,
                })
            }
        }
    }
}
