// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Append-only, optionally parented collection of [`StepDefinition`]s
//! defining one declaration scope.

use std::sync::Arc;

use crate::step::StepDefinition;

/// One declaration scope of step definitions.
///
/// Populated by the declaration-time collection process, strictly before
/// any scenario runs; read-only afterwards, so it is safely shared
/// across concurrently running scenarios without locking.
///
/// Registration order is preserved and observable: ambiguous matches are
/// broken in favor of the earliest registration. Identical patterns may
/// coexist deliberately.
///
/// The parent link, set once at construction, establishes scope nesting
/// (inner scopes shadow outer ones totally, see [`Matcher`]). Scope
/// teardown is just dropping the [`Registry`].
///
/// [`Matcher`]: crate::matcher::Matcher
#[derive(Debug, Default)]
pub struct Registry {
    definitions: Vec<StepDefinition>,
    parent: Option<Arc<Registry>>,
}

impl Registry {
    /// Creates a new outermost-scope [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Registry`] falling back to `parent` when a step
    /// matches nothing locally.
    #[must_use]
    pub fn with_parent(parent: Arc<Registry>) -> Self {
        Self { definitions: Vec::new(), parent: Some(parent) }
    }

    /// Appends a definition to this scope and returns it.
    ///
    /// No dedup happens; registering the same pattern twice keeps both.
    pub fn register(&mut self, definition: StepDefinition) -> &StepDefinition {
        self.definitions.push(definition);
        // Just pushed, so never empty.
        self.definitions.last().unwrap_or_else(|| unreachable!())
    }

    /// Iterates this scope's own definitions, in registration order.
    ///
    /// Parent scopes are not traversed.
    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.definitions.iter()
    }

    /// Parent scope, if this registry has one.
    #[must_use]
    pub fn parent(&self) -> Option<&Registry> {
        self.parent.as_deref()
    }

    /// Number of definitions in this scope alone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Indicates whether this scope has no definitions of its own.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
