//! Builder assembling immutable [`StepDefinition`]s.

use std::{collections::HashMap, sync::Arc};

use futures::{future, FutureExt as _};
use linked_hash_map::LinkedHashMap;

use crate::{
    error::StepFault,
    model::StepKind,
    pattern::StepPattern,
    value::Value,
};

use super::{
    context::StepContext,
    converter::Converter,
    location::Location,
    ExposePolicy, ParamSpec, Returned, StepDefinition, StepFn,
};

/// Builder for a [`StepDefinition`].
///
/// Obtained from [`StepDefinition::given()`] / [`when()`] / [`then()`] /
/// [`any()`]; finished with [`to()`] (async callable) or [`to_sync()`].
///
/// If no parameters are declared explicitly, the definition consumes
/// exactly its pattern's named slots plus its anonymous-group names, in
/// that order.
///
/// [`when()`]: StepDefinition::when
/// [`then()`]: StepDefinition::then
/// [`any()`]: StepDefinition::any
/// [`to()`]: DefinitionBuilder::to
/// [`to_sync()`]: DefinitionBuilder::to_sync
#[must_use]
pub struct DefinitionBuilder {
    pattern: StepPattern,
    kind: Option<StepKind>,
    converters: HashMap<String, Converter>,
    outputs: Vec<String>,
    liberal: Option<bool>,
    params: Vec<ParamSpec>,
    expose: ExposePolicy,
    anonymous_groups: Vec<String>,
    location: Option<Location>,
}

impl DefinitionBuilder {
    pub(crate) fn new(pattern: StepPattern, kind: Option<StepKind>) -> Self {
        Self {
            pattern,
            kind,
            converters: HashMap::new(),
            outputs: Vec::new(),
            liberal: None,
            params: Vec::new(),
            expose: ExposePolicy::default(),
            anonymous_groups: Vec::new(),
            location: None,
        }
    }

    /// Registers a [`Converter`] for the argument `name`.
    pub fn converter(mut self, name: impl Into<String>, conv: Converter) -> Self {
        _ = self.converters.insert(name.into(), conv);
        self
    }

    /// Declares a single output-binding name for the return value.
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Declares the output-binding names the return value(s) are exposed
    /// under.
    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Overrides the ambient liberal/strict default for this definition.
    pub fn liberal(mut self, liberal: bool) -> Self {
        self.liberal = Some(liberal);
        self
    }

    /// Declares one consumed parameter.
    pub fn param(mut self, spec: impl Into<ParamSpec>) -> Self {
        self.params.push(spec.into());
        self
    }

    /// Declares the consumed parameters, in call-argument order.
    pub fn params<I, P>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParamSpec>,
    {
        self.params.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Declares a parameter with a fallback value.
    pub fn param_default(
        mut self,
        name: impl Into<String>,
        default: Value,
    ) -> Self {
        self.params.push(ParamSpec::defaulted(name, default));
        self
    }

    /// Sets the exposure policy for extracted arguments.
    pub fn expose(mut self, policy: ExposePolicy) -> Self {
        self.expose = policy;
        self
    }

    /// Shorthand for [`ExposePolicy::Remap`].
    pub fn expose_as<I, S, T>(mut self, mapping: I, expose_rest: bool) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mapping: LinkedHashMap<String, String> = mapping
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();
        self.expose = ExposePolicy::Remap { mapping, expose_rest };
        self
    }

    /// Names the pattern's unnamed capture groups, in group order.
    pub fn anonymous_groups<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anonymous_groups.extend(names.into_iter().map(Into::into));
        self
    }

    /// Records the registration site (see the [`location!`] macro).
    ///
    /// [`location!`]: crate::location
    pub fn located(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Finishes the definition with an async callable.
    #[must_use]
    pub fn to<F>(self, callable: F) -> StepDefinition
    where
        F: Fn(StepContext) -> futures::future::LocalBoxFuture<'static, Result<Returned, StepFault>>
            + Send
            + Sync
            + 'static,
    {
        self.finish(Arc::new(callable))
    }

    /// Finishes the definition with a synchronous callable.
    ///
    /// The callable runs when the returned future is polled, so the
    /// runner's panic handling covers it like any async step.
    #[must_use]
    pub fn to_sync<F>(self, callable: F) -> StepDefinition
    where
        F: Fn(StepContext) -> Result<Returned, StepFault>
            + Send
            + Sync
            + 'static,
    {
        let callable = Arc::new(callable);
        self.finish(Arc::new(move |ctx| {
            let callable = Arc::clone(&callable);
            future::lazy(move |_| callable(ctx)).boxed_local()
        }))
    }

    fn finish(self, callable: StepFn) -> StepDefinition {
        let params = if self.params.is_empty() {
            self.pattern
                .slot_names()
                .into_iter()
                .chain(self.anonymous_groups.iter().cloned())
                .map(ParamSpec::required)
                .collect()
        } else {
            self.params
        };

        StepDefinition::from_parts(
            self.pattern,
            self.kind,
            callable,
            self.converters,
            self.outputs,
            self.liberal,
            params,
            self.expose,
            self.anonymous_groups,
            self.location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_params_follow_the_pattern_slots() {
        let def = StepDefinition::given(
            StepPattern::template("there are {n} cukes").unwrap(),
        )
        .to_sync(|_| Ok(Returned::Unit));

        let names: Vec<_> =
            def.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["n"]);
    }

    #[test]
    fn implicit_params_include_anonymous_groups() {
        let def = StepDefinition::when(
            StepPattern::regex(r"I pay (\d+) Euro").unwrap(),
        )
        .anonymous_groups(["euro"])
        .to_sync(|_| Ok(Returned::Unit));

        let names: Vec<_> =
            def.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["euro"]);
    }

    #[test]
    fn explicit_params_win_over_implicit_ones() {
        let def = StepDefinition::given(
            StepPattern::template("there are {n} cukes").unwrap(),
        )
        .params(["n", "step"])
        .to_sync(|_| Ok(Returned::Unit));

        let names: Vec<_> =
            def.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["n", "step"]);
    }

    #[test]
    fn builder_records_outputs_and_liberal_flag() {
        let def = StepDefinition::any(StepPattern::exact("x"))
            .outputs(["a", "b"])
            .liberal(true)
            .to_sync(|_| Ok(Returned::Unit));

        assert_eq!(def.outputs(), ["a", "b"]);
        assert_eq!(def.liberal(), Some(true));
    }
}
