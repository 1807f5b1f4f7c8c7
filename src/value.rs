// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Type-erased scenario values and the [`ValueStore`] facility steps
//! read from and write to for inter-step data passing.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::Arc,
};

/// Opaque value passed between steps of a scenario.
///
/// Extracted step arguments start out as [`String`]s; converters and step
/// return values may put anything [`Send`] + [`Sync`] inside. Cloning is
/// cheap (the payload is [`Arc`]ed and shared).
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// Marker payload of [`Value::absent()`].
struct Absent;

impl Value {
    /// Wraps the given payload into a [`Value`].
    #[must_use]
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            inner: Arc::new(payload),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the "no value" marker.
    ///
    /// Used to pad output bindings whose return value is shorter than the
    /// declared name list, so a shortfall binds an absent marker instead of
    /// erroring.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(Absent)
    }

    /// Indicates whether this [`Value`] is the [`absent`] marker.
    ///
    /// [`absent`]: Value::absent
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.is::<Absent>()
    }

    /// Indicates whether the payload is of type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Returns a reference to the payload, if it's of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Name of the payload's type, as captured at construction.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the payload as a [`str`], if it holds a [`String`].
    ///
    /// Convenience for the common case of raw extracted arguments.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<String>().map(String::as_str)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            write!(f, "Value(<absent>)")
        } else {
            write!(f, "Value({})", self.type_name)
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::new(s.to_owned())
    }
}

/// By-name value store a scenario run resolves dependencies from and
/// publishes bindings into.
///
/// The engine requires only these three operations of its host; how values
/// are stored or torn down is the host's concern. The provided
/// [`ScenarioValues`] is the scenario-scoped in-memory implementation used
/// when the host has nothing of its own.
pub trait ValueStore {
    /// Looks up a value by `name`.
    fn get(&self, name: &str) -> Option<Value>;

    /// Publishes `value` under `name` for later steps of the current
    /// scenario.
    fn set(&mut self, name: &str, value: Value);

    /// Undoes a binding, so scenario-scoped values never leak past the
    /// scenario's end.
    fn unset(&mut self, name: &str);
}

/// In-memory [`ValueStore`] scoped to a single scenario run.
#[derive(Debug, Default)]
pub struct ScenarioValues {
    values: HashMap<String, Value>,
}

impl ScenarioValues {
    /// Creates a new empty [`ScenarioValues`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Indicates whether no names are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueStore for ScenarioValues {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) {
        _ = self.values.insert(name.to_owned(), value);
    }

    fn unset(&mut self, name: &str) {
        _ = self.values.remove(name);
    }
}
