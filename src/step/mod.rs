// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`StepDefinition`]: an immutable record binding a step pattern to a
//! callable, together with everything dispatch needs to feed it.
//!
//! Definitions are created through the [`DefinitionBuilder`]
//! ([`StepDefinition::given()`] and friends), appended to a
//! [`Registry`], and never mutated afterwards.
//!
//! [`Registry`]: crate::registry::Registry

pub mod builder;
pub mod context;
pub mod converter;
pub mod location;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use derive_more::with_trait::{Debug, Display};
use futures::future::LocalBoxFuture;
use linked_hash_map::LinkedHashMap;
use once_cell::sync::OnceCell;
use smart_default::SmartDefault;

use crate::{
    error::StepFault,
    model::StepKind,
    pattern::StepPattern,
    value::Value,
};

pub use self::{
    builder::DefinitionBuilder,
    context::StepContext,
    converter::Converter,
    location::Location,
};

/// What a step callable hands back.
#[derive(Debug)]
pub enum Returned {
    /// Nothing meaningful.
    Unit,

    /// A single value.
    One(Value),

    /// A positional sequence, for definitions declaring several output
    /// names.
    Many(Vec<Value>),
}

impl Returned {
    /// Wraps a single payload.
    #[must_use]
    pub fn of<T: std::any::Any + Send + Sync>(payload: T) -> Self {
        Self::One(Value::new(payload))
    }
}

/// Step callable: consumes its [`StepContext`] and yields a value (or a
/// failure) once awaited.
pub type StepFn = Arc<
    dyn Fn(StepContext) -> LocalBoxFuture<'static, Result<Returned, StepFault>>
        + Send
        + Sync,
>;

/// One parameter a step callable declares, resolvable from extracted
/// arguments, step metadata, the ambient value store, or this declared
/// default.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,

    /// Fallback value when the name resolves nowhere else.
    pub default: Option<Value>,
}

impl ParamSpec {
    /// Declares a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), default: None }
    }

    /// Declares a parameter falling back to `default`.
    #[must_use]
    pub fn defaulted(name: impl Into<String>, default: Value) -> Self {
        Self { name: name.into(), default: Some(default) }
    }
}

impl From<&str> for ParamSpec {
    fn from(name: &str) -> Self {
        Self::required(name)
    }
}

/// Which extracted argument names get published into the ambient value
/// store for later steps of the same scenario to resolve.
///
/// Declared output names are published at output binding regardless of
/// this policy; values the policy keeps private remain available as
/// direct call arguments of the current step only.
#[derive(Clone, Debug, SmartDefault)]
pub enum ExposePolicy {
    /// Publish every extracted name under its own name.
    All,

    /// Publish nothing.
    #[default]
    None,

    /// Publish only the listed names.
    Listed(Vec<String>),

    /// Publish under renamed keys.
    Remap {
        /// extracted name → published name.
        mapping: LinkedHashMap<String, String>,

        /// Whether names absent from the mapping are published under
        /// their own name.
        expose_rest: bool,
    },
}

impl ExposePolicy {
    /// Name `arg` gets published under, if any.
    #[must_use]
    pub fn exposed_name(&self, arg: &str) -> Option<String> {
        match self {
            Self::All => Some(arg.to_owned()),
            Self::None => None,
            Self::Listed(names) => {
                names.iter().any(|n| n == arg).then(|| arg.to_owned())
            }
            Self::Remap { mapping, expose_rest } => mapping
                .get(arg)
                .cloned()
                .or_else(|| expose_rest.then(|| arg.to_owned())),
        }
    }
}

/// Identity of a [`StepDefinition`], assigned lazily on first use and
/// memoized.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("definition#{_0}")]
pub struct DefinitionId(u64);

impl DefinitionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);

        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A registered step implementation bound to one pattern.
///
/// Immutable after creation; owned by the [`Registry`] it was registered
/// into. One implementation registered under several patterns or kinds
/// yields one [`StepDefinition`] per registration.
///
/// [`Registry`]: crate::registry::Registry
#[derive(Debug)]
pub struct StepDefinition {
    pattern: StepPattern,
    kind: Option<StepKind>,
    #[debug(skip)]
    callable: StepFn,
    #[debug(skip)]
    converters: HashMap<String, Converter>,
    outputs: Vec<String>,
    liberal: Option<bool>,
    params: Vec<ParamSpec>,
    expose: ExposePolicy,
    anonymous_groups: Vec<String>,
    location: Option<Location>,
    id: OnceCell<DefinitionId>,
}

impl StepDefinition {
    /// Starts building a definition answering context (`Given`) steps.
    #[must_use]
    pub fn given(pattern: StepPattern) -> DefinitionBuilder {
        DefinitionBuilder::new(pattern, Some(StepKind::Context))
    }

    /// Starts building a definition answering action (`When`) steps.
    #[must_use]
    pub fn when(pattern: StepPattern) -> DefinitionBuilder {
        DefinitionBuilder::new(pattern, Some(StepKind::Action))
    }

    /// Starts building a definition answering outcome (`Then`) steps.
    #[must_use]
    pub fn then(pattern: StepPattern) -> DefinitionBuilder {
        DefinitionBuilder::new(pattern, Some(StepKind::Outcome))
    }

    /// Starts building a definition answering steps of any kind.
    #[must_use]
    pub fn any(pattern: StepPattern) -> DefinitionBuilder {
        DefinitionBuilder::new(pattern, None)
    }

    /// Starts building a definition of an explicit kind (or [`None`] for
    /// any).
    #[must_use]
    pub fn of_kind(
        pattern: StepPattern,
        kind: Option<StepKind>,
    ) -> DefinitionBuilder {
        DefinitionBuilder::new(pattern, kind)
    }

    pub(crate) fn from_parts(
        pattern: StepPattern,
        kind: Option<StepKind>,
        callable: StepFn,
        converters: HashMap<String, Converter>,
        outputs: Vec<String>,
        liberal: Option<bool>,
        params: Vec<ParamSpec>,
        expose: ExposePolicy,
        anonymous_groups: Vec<String>,
        location: Option<Location>,
    ) -> Self {
        Self {
            pattern,
            kind,
            callable,
            converters,
            outputs,
            liberal,
            params,
            expose,
            anonymous_groups,
            location,
            id: OnceCell::new(),
        }
    }

    /// Pattern this definition is registered under.
    #[must_use]
    pub fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    /// Declared step kind, or [`None`] for "any".
    #[must_use]
    pub fn kind(&self) -> Option<StepKind> {
        self.kind
    }

    /// Declared output-binding names.
    #[must_use]
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Tri-state liberal flag: [`None`] defers to the ambient default.
    #[must_use]
    pub fn liberal(&self) -> Option<bool> {
        self.liberal
    }

    /// Liberal flag with the ambient `default` applied.
    #[must_use]
    pub fn effective_liberal(&self, default: bool) -> bool {
        self.liberal.unwrap_or(default)
    }

    /// Declared callable parameters.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Exposure policy for extracted arguments.
    #[must_use]
    pub fn expose(&self) -> &ExposePolicy {
        &self.expose
    }

    /// Names assigned, in order, to the pattern's unnamed capture
    /// groups.
    #[must_use]
    pub fn anonymous_groups(&self) -> &[String] {
        &self.anonymous_groups
    }

    /// Registration site, when recorded.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Converter registered for the argument `name`, if any.
    #[must_use]
    pub fn converter(&self, name: &str) -> Option<&Converter> {
        self.converters.get(name)
    }

    /// This definition's identity, assigned on first access.
    pub fn id(&self) -> DefinitionId {
        *self.id.get_or_init(DefinitionId::next)
    }

    /// Invokes the callable with the given context.
    pub fn call(
        &self,
        ctx: StepContext,
    ) -> LocalBoxFuture<'static, Result<Returned, StepFault>> {
        (self.callable)(ctx)
    }

    /// One-line description for warnings and traces.
    #[must_use]
    pub fn describe(&self) -> String {
        let kind = self
            .kind
            .map_or_else(|| "any".to_owned(), |k| k.to_string());
        match self.location {
            Some(loc) => format!("{kind} \"{}\" at {loc}", self.pattern),
            None => format!("{kind} \"{}\"", self.pattern),
        }
    }
}
