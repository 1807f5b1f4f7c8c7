// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Matcher`]: selects the single [`StepDefinition`] answering a step.
//!
//! Matching walks three tiers in fixed order against each scope:
//! 1. **strict** — definitions declared exactly for the step's effective
//!    kind;
//! 2. **unspecified** — definitions declared for any kind, or any
//!    matching definition when the effective kind is unknown;
//! 3. **liberal** — definitions of a *different* kind whose effective
//!    liberal flag allows answering anyway.
//!
//! All three tiers exhaust the local [`Registry`] before the parent
//! scope is consulted at all, so an inner-scope liberal match shadows an
//! outer-scope strict one. That total shadowing is intentional API
//! behavior, not an accident of implementation; keep it when touching
//! this module.

use itertools::Itertools as _;
use smart_default::SmartDefault;

use crate::{
    error::NoMatch,
    model::{Step, StepKind},
    registry::Registry,
    step::StepDefinition,
};

/// Ambient matching configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct MatchConfig {
    /// Default for definitions whose liberal flag is unspecified.
    #[default = false]
    pub liberal_by_default: bool,
}

/// Tier a resolution was found in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    /// Definition kind equals the step's effective kind.
    Strict,

    /// Definition declared for any kind, or effective kind unknown.
    Unspecified,

    /// Definition of a different kind, allowed by its liberal flag.
    Liberal,
}

impl Tier {
    const ALL: [Self; 3] = [Self::Strict, Self::Unspecified, Self::Liberal];
}

/// Per-scenario matching state: the current step-kind context.
///
/// Starts undefined; every non-conjunction step updates it, and
/// conjunction (`And`/`But`/`*`) or unknown steps inherit it. Scoped to
/// a single scenario run, never shared.
#[derive(Debug, Default)]
pub struct MatchContext {
    current: Option<StepKind>,
}

impl MatchContext {
    /// Creates a fresh, undefined context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently inherited step kind, if any step established one.
    #[must_use]
    pub fn current(&self) -> Option<StepKind> {
        self.current
    }

    /// Resolves the effective kind of a step declared as `declared`,
    /// updating the context on non-inheriting steps.
    pub fn effective_kind(&mut self, declared: StepKind) -> StepKind {
        match (declared, self.current) {
            (StepKind::Conjunction | StepKind::Unknown, Some(current)) => {
                current
            }
            _ => {
                self.current = Some(declared);
                declared
            }
        }
    }
}

/// Resolution of one step against a [`Registry`] chain.
#[derive(Debug)]
pub struct Resolution<'r> {
    /// Chosen definition: the first registered within the winning tier.
    pub definition: &'r StepDefinition,

    /// Tier the winning scope answered in.
    pub tier: Tier,

    /// How many parent hops from the queried registry the winning scope
    /// is (0 = local).
    pub scope_depth: usize,

    /// Every definition of the winning tier in registration order;
    /// more than one means the match was ambiguous.
    pub candidates: Vec<&'r StepDefinition>,
}

impl Resolution<'_> {
    /// Indicates whether more than one definition matched in the winning
    /// tier.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Pure matcher over a [`Registry`] chain.
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'r> {
    registry: &'r Registry,
    config: MatchConfig,
}

impl<'r> Matcher<'r> {
    /// Creates a [`Matcher`] with the default [`MatchConfig`].
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry, config: MatchConfig::default() }
    }

    /// Creates a [`Matcher`] with the given [`MatchConfig`].
    #[must_use]
    pub fn with_config(registry: &'r Registry, config: MatchConfig) -> Self {
        Self { registry, config }
    }

    /// Finds the [`StepDefinition`] answering `step`.
    ///
    /// On an ambiguous match a warning naming every candidate is
    /// emitted and the first by registration order wins; the returned
    /// [`Resolution`] carries the full candidate list.
    ///
    /// # Errors
    ///
    /// [`NoMatch`], if no tier yields a definition anywhere up the scope
    /// chain.
    pub fn resolve(
        &self,
        step: &Step,
        ctx: &mut MatchContext,
    ) -> Result<Resolution<'r>, NoMatch> {
        let effective = ctx.effective_kind(step.kind);

        let mut scope = Some(self.registry);
        let mut scope_depth = 0;
        while let Some(registry) = scope {
            for tier in Tier::ALL {
                let candidates: Vec<_> = registry
                    .iter()
                    .filter(|def| self.accepts(def, tier, effective, &step.text))
                    .collect();
                let Some(&definition) = candidates.first() else {
                    continue;
                };

                if candidates.len() > 1 {
                    let listing =
                        candidates.iter().map(|d| d.describe()).join("; ");
                    tracing::warn!(
                        step = %step.text,
                        candidates = %listing,
                        "ambiguous step match, choosing the first registered"
                    );
                }
                tracing::trace!(
                    step = %step.text,
                    definition = %definition.describe(),
                    ?tier,
                    scope_depth,
                    "step matched"
                );
                return Ok(Resolution {
                    definition,
                    tier,
                    scope_depth,
                    candidates,
                });
            }
            scope = registry.parent();
            scope_depth += 1;
        }

        Err(NoMatch { step_text: step.text.clone() })
    }

    fn accepts(
        &self,
        def: &StepDefinition,
        tier: Tier,
        effective: StepKind,
        text: &str,
    ) -> bool {
        let eligible = match tier {
            Tier::Strict => def.kind() == Some(effective),
            Tier::Unspecified => {
                effective == StepKind::Unknown || def.kind().is_none()
            }
            Tier::Liberal => {
                def.kind().is_some_and(|kind| kind != effective)
                    && def.effective_liberal(self.config.liberal_by_default)
            }
        };
        eligible && def.pattern().is_match(text)
    }
}
