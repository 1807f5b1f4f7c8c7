// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lifecycle callbacks broadcast around scenario and step execution.
//!
//! Subscribers implement [`Hooks`], overriding only the callbacks they
//! care about; the [`Runner`] broadcasts every callback to every
//! subscriber, in subscription order. Correctness of the engine never
//! depends on that order.
//!
//! Guarantees, even on failure: exactly one
//! [`before_scenario`]/[`after_scenario`] pair per scenario, and exactly
//! one [`before_step`] paired with either [`after_step`] or
//! [`on_step_error`] per attempted step. A step whose lookup fails gets
//! [`on_step_lookup_error`] instead of the pair.
//!
//! [`Runner`]: crate::runner::Runner
//! [`before_scenario`]: Hooks::before_scenario
//! [`after_scenario`]: Hooks::after_scenario
//! [`before_step`]: Hooks::before_step
//! [`after_step`]: Hooks::after_step
//! [`on_step_error`]: Hooks::on_step_error
//! [`on_step_lookup_error`]: Hooks::on_step_lookup_error

use std::{fmt, sync::Arc};

use crate::{
    error::{LookupError, StepError},
    model::{Feature, Scenario, Step},
    step::{StepContext, StepDefinition},
};

/// Subscriber to scenario and step lifecycle events.
///
/// Every callback has a no-op default body.
pub trait Hooks: Send + Sync {
    /// A scenario is about to run.
    fn before_scenario(&self, _feature: &Feature, _scenario: &Scenario) {}

    /// A scenario finished, successfully or not.
    fn after_scenario(&self, _feature: &Feature, _scenario: &Scenario) {}

    /// A step matched and is about to be prepared.
    fn before_step(
        &self,
        _feature: &Feature,
        _scenario: &Scenario,
        _step: &Step,
        _definition: &StepDefinition,
    ) {
    }

    /// A step's call arguments are resolved and its callable is about to
    /// be invoked.
    fn before_step_call(
        &self,
        _feature: &Feature,
        _scenario: &Scenario,
        _step: &Step,
        _definition: &StepDefinition,
        _args: &StepContext,
    ) {
    }

    /// A step finished successfully.
    fn after_step(
        &self,
        _feature: &Feature,
        _scenario: &Scenario,
        _step: &Step,
        _definition: &StepDefinition,
    ) {
    }

    /// A matched step failed (conversion, resolution, invocation or
    /// panic).
    fn on_step_error(
        &self,
        _feature: &Feature,
        _scenario: &Scenario,
        _step: &Step,
        _definition: &StepDefinition,
        _error: &StepError,
    ) {
    }

    /// A step matched no definition anywhere up the scope chain.
    fn on_step_lookup_error(
        &self,
        _feature: &Feature,
        _scenario: &Scenario,
        _step: &Step,
        _error: &LookupError,
    ) {
    }
}

/// Broadcast set of [`Hooks`] subscribers.
#[derive(Clone, Default)]
pub struct HookSet {
    subscribers: Vec<Arc<dyn Hooks>>,
}

impl HookSet {
    /// Creates an empty [`HookSet`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber.
    pub fn add(&mut self, hooks: Arc<dyn Hooks>) {
        self.subscribers.push(hooks);
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Indicates whether nobody subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub(crate) fn before_scenario(&self, feature: &Feature, scenario: &Scenario) {
        for s in &self.subscribers {
            s.before_scenario(feature, scenario);
        }
    }

    pub(crate) fn after_scenario(&self, feature: &Feature, scenario: &Scenario) {
        for s in &self.subscribers {
            s.after_scenario(feature, scenario);
        }
    }

    pub(crate) fn before_step(
        &self,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        definition: &StepDefinition,
    ) {
        for s in &self.subscribers {
            s.before_step(feature, scenario, step, definition);
        }
    }

    pub(crate) fn before_step_call(
        &self,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        definition: &StepDefinition,
        args: &StepContext,
    ) {
        for s in &self.subscribers {
            s.before_step_call(feature, scenario, step, definition, args);
        }
    }

    pub(crate) fn after_step(
        &self,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        definition: &StepDefinition,
    ) {
        for s in &self.subscribers {
            s.after_step(feature, scenario, step, definition);
        }
    }

    pub(crate) fn on_step_error(
        &self,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        definition: &StepDefinition,
        error: &StepError,
    ) {
        for s in &self.subscribers {
            s.on_step_error(feature, scenario, step, definition, error);
        }
    }

    pub(crate) fn on_step_lookup_error(
        &self,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        error: &LookupError,
    ) {
        for s in &self.subscribers {
            s.on_step_lookup_error(feature, scenario, step, error);
        }
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<&'static str>>);

    impl Hooks for Recorder {
        fn before_scenario(&self, _: &Feature, _: &Scenario) {
            self.0.lock().unwrap().push("before_scenario");
        }

        fn after_scenario(&self, _: &Feature, _: &Scenario) {
            self.0.lock().unwrap().push("after_scenario");
        }
    }

    #[test]
    fn broadcasts_to_every_subscriber() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let mut set = HookSet::new();
        set.add(Arc::clone(&first) as Arc<dyn Hooks>);
        set.add(Arc::clone(&second) as Arc<dyn Hooks>);
        assert_eq!(set.len(), 2);

        let feature = Feature::new("f");
        let scenario = Scenario::new("s", Vec::new());
        set.before_scenario(&feature, &scenario);
        set.after_scenario(&feature, &scenario);

        for recorder in [first, second] {
            assert_eq!(
                *recorder.0.lock().unwrap(),
                vec!["before_scenario", "after_scenario"],
            );
        }
    }
}
