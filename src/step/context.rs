//! Call context handed to a step callable.

use std::any::Any;
use std::str::FromStr;

use linked_hash_map::LinkedHashMap;

use crate::{model::Step, value::Value};

/// Everything a step callable receives: the step being executed and its
/// resolved call arguments, keyed by declared parameter name in
/// declaration order.
#[derive(Clone, Debug)]
pub struct StepContext {
    step: Step,
    args: LinkedHashMap<String, Value>,
}

impl StepContext {
    /// Creates a new [`StepContext`].
    #[must_use]
    pub fn new(step: Step, args: LinkedHashMap<String, Value>) -> Self {
        Self { step, args }
    }

    /// The step being executed.
    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Raw argument [`Value`] by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Typed argument by name.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.args.get(name)?.downcast_ref::<T>()
    }

    /// Parses a raw string argument by name.
    ///
    /// Convenience for arguments that carry their extracted text without
    /// a registered converter.
    #[must_use]
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.args.get(name)?.as_str()?.parse().ok()
    }

    /// Argument names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.args.keys().map(String::as_str)
    }

    /// Number of resolved arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Indicates whether no arguments were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> StepContext {
        let mut args = LinkedHashMap::new();
        _ = args.insert("n".to_owned(), Value::new(5_u64));
        _ = args.insert("raw".to_owned(), Value::from("17"));
        StepContext::new(Step::new("Given", "there are 5 cukes"), args)
    }

    #[test]
    fn typed_access() {
        let ctx = context();
        assert_eq!(ctx.get::<u64>("n"), Some(&5));
        assert_eq!(ctx.get::<String>("n"), None);
        assert_eq!(ctx.get::<u64>("missing"), None);
    }

    #[test]
    fn parse_access() {
        let ctx = context();
        assert_eq!(ctx.parse::<u32>("raw"), Some(17));
        assert_eq!(ctx.parse::<u32>("n"), None);
    }

    #[test]
    fn names_keep_declaration_order() {
        let ctx = context();
        assert_eq!(ctx.names().collect::<Vec<_>>(), vec!["n", "raw"]);
    }
}
