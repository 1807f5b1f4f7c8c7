//! Step preparation and invocation: argument extraction, conversion,
//! exposure, parameter resolution, the call itself, and output binding.

use std::panic::AssertUnwindSafe;

use futures::FutureExt as _;
use itertools::{EitherOrBoth, Itertools as _};
use linked_hash_map::LinkedHashMap;

use crate::{
    error::StepError,
    model::{Feature, Scenario, Step, StepArg},
    step::{Returned, StepContext, StepDefinition},
    value::{Value, ValueStore},
};

use super::{RunContext, Runner, DATATABLE_PARAM, DOCSTRING_PARAM, STEP_PARAM};

impl Runner {
    /// Prepares and invokes one matched step, yielding its return value.
    ///
    /// Every failure in here is a step failure: the caller broadcasts
    /// `on_step_error` and terminal-fails the scenario.
    pub(super) async fn dispatch(
        &self,
        definition: &StepDefinition,
        feature: &Feature,
        scenario: &Scenario,
        step: &Step,
        ctx: &mut RunContext,
        values: &mut dyn ValueStore,
    ) -> Result<Returned, StepError> {
        let args = extracted_args(definition, step)?;
        expose_args(definition, &args, ctx, values);
        let call_args = resolve_params(definition, step, &args, &*values)?;

        let step_ctx = StepContext::new(step.clone(), call_args);
        self.hooks
            .before_step_call(feature, scenario, step, definition, &step_ctx);

        // A callable may panic while constructing its future, not only
        // while it is polled; both surface as a step failure.
        let fut = std::panic::catch_unwind(AssertUnwindSafe(|| {
            definition.call(step_ctx)
        }))
        .map_err(|payload| StepError::Panicked {
            message: panic_message(payload.as_ref()),
        })?;
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(returned)) => Ok(returned),
            Ok(Err(fault)) => Err(StepError::Failed(fault)),
            Err(payload) => Err(StepError::Panicked {
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

/// Extracts the definition's arguments from the step text, names
/// anonymous capture groups, appends the structured block under its
/// reserved name, and runs every value through its registered converter.
fn extracted_args(
    definition: &StepDefinition,
    step: &Step,
) -> Result<LinkedHashMap<String, Value>, StepError> {
    let Some(captures) = definition.pattern().extract(&step.text) else {
        // `extract()` cannot fail on a matched text; a pattern breaking
        // that contract is a defect of the pattern, surfaced as a step
        // failure rather than a panic.
        return Err(StepError::failed(format!(
            "pattern \"{}\" matched but extracted nothing from \"{}\"",
            definition.pattern(),
            step.text,
        )));
    };

    let mut args = LinkedHashMap::new();
    let mut anonymous = definition.anonymous_groups().iter();
    for (name, raw) in captures {
        let Some(key) = name.or_else(|| anonymous.next().cloned()) else {
            continue;
        };
        _ = args.insert(key, Value::from(raw));
    }

    match &step.arg {
        Some(StepArg::Table(table)) => {
            _ = args.insert(DATATABLE_PARAM.to_owned(), Value::new(table.clone()));
        }
        Some(StepArg::DocString(text)) => {
            _ = args.insert(DOCSTRING_PARAM.to_owned(), Value::from(text.clone()));
        }
        None => {}
    }

    for (name, value) in args.iter_mut() {
        if let Some(converter) = definition.converter(name) {
            *value = converter(value).map_err(|source| StepError::Convert {
                name: name.clone(),
                source,
            })?;
        }
    }

    Ok(args)
}

/// Publishes the extracted names the definition's exposure policy
/// allows, recording each published name for scenario-end cleanup.
fn expose_args(
    definition: &StepDefinition,
    args: &LinkedHashMap<String, Value>,
    ctx: &mut RunContext,
    values: &mut dyn ValueStore,
) {
    for (name, value) in args {
        if let Some(public) = definition.expose().exposed_name(name) {
            values.set(&public, value.clone());
            ctx.bound.push(public);
        }
    }
}

/// Resolves each declared parameter, in order: extracted arguments, step
/// metadata, the ambient value store, the declared default.
fn resolve_params(
    definition: &StepDefinition,
    step: &Step,
    args: &LinkedHashMap<String, Value>,
    values: &dyn ValueStore,
) -> Result<LinkedHashMap<String, Value>, StepError> {
    let mut call_args = LinkedHashMap::new();
    for spec in definition.params() {
        let resolved = args
            .get(&spec.name)
            .cloned()
            .or_else(|| {
                (spec.name == STEP_PARAM).then(|| Value::new(step.clone()))
            })
            .or_else(|| values.get(&spec.name))
            .or_else(|| spec.default.clone());
        match resolved {
            Some(value) => {
                _ = call_args.insert(spec.name.clone(), value);
            }
            None => {
                return Err(StepError::Unresolved { param: spec.name.clone() });
            }
        }
    }
    Ok(call_args)
}

/// Binds the return value to the definition's declared output names.
///
/// One name gets the whole value as-is; several names zip against the
/// value as a positional sequence, padding a shortfall with
/// [`Value::absent()`]; zero names discard the value.
pub(super) fn bind_outputs(
    definition: &StepDefinition,
    returned: Returned,
    ctx: &mut RunContext,
    values: &mut dyn ValueStore,
) {
    let outputs = definition.outputs();
    match outputs.len() {
        0 => {}
        1 => {
            let value = match returned {
                Returned::Unit => Value::absent(),
                Returned::One(v) => v,
                Returned::Many(vs) => Value::new(vs),
            };
            values.set(&outputs[0], value);
            ctx.bound.push(outputs[0].clone());
        }
        _ => {
            let sequence = match returned {
                Returned::Unit => Vec::new(),
                Returned::One(v) => vec![v],
                Returned::Many(vs) => vs,
            };
            for pair in outputs.iter().zip_longest(sequence) {
                let (name, value) = match pair {
                    EitherOrBoth::Both(name, value) => (name, value),
                    EitherOrBoth::Left(name) => (name, Value::absent()),
                    EitherOrBoth::Right(_) => break,
                };
                values.set(name, value);
                ctx.bound.push(name.clone());
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        model::DataTable,
        pattern::StepPattern,
        step::converter,
        value::ScenarioValues,
    };

    fn unit(_: StepContext) -> Result<Returned, crate::error::StepFault> {
        Ok(Returned::Unit)
    }

    #[test]
    fn extraction_names_anonymous_groups() {
        let def = StepDefinition::when(
            StepPattern::regex(r"I pay (\d+) Euro").unwrap(),
        )
        .anonymous_groups(["euro"])
        .to_sync(unit);

        let step = Step::new("When", "I pay 2 Euro");
        let args = extracted_args(&def, &step).unwrap();
        assert_eq!(args.get("euro").unwrap().as_str(), Some("2"));
    }

    #[test]
    fn extraction_applies_converters() {
        let def = StepDefinition::given(
            StepPattern::template("there are {n} cukes").unwrap(),
        )
        .converter("n", converter::parsed::<u64>())
        .to_sync(unit);

        let step = Step::new("Given", "there are 5 cukes");
        let args = extracted_args(&def, &step).unwrap();
        assert_eq!(args.get("n").unwrap().downcast_ref::<u64>(), Some(&5));
    }

    #[test]
    fn converter_failure_is_a_convert_error() {
        let def = StepDefinition::given(
            StepPattern::template("there are {n} cukes").unwrap(),
        )
        .converter("n", converter::parsed::<u64>())
        .to_sync(unit);

        let step = Step::new("Given", "there are some cukes");
        let err = extracted_args(&def, &step).unwrap_err();
        assert!(matches!(err, StepError::Convert { .. }));
    }

    #[test]
    fn structured_blocks_get_reserved_names() {
        let def = StepDefinition::given(
            StepPattern::exact("the following users"),
        )
        .to_sync(unit);

        let table = DataTable::from(vec![vec!["name"], vec!["Alice"]]);
        let step = Step::new("Given", "the following users")
            .with_table(table.clone());
        let args = extracted_args(&def, &step).unwrap();
        assert_eq!(
            args.get(DATATABLE_PARAM).unwrap().downcast_ref::<DataTable>(),
            Some(&table),
        );

        let step = Step::new("Given", "the following users")
            .with_docstring("payload");
        let args = extracted_args(&def, &step).unwrap();
        assert_eq!(args.get(DOCSTRING_PARAM).unwrap().as_str(), Some("payload"));
    }

    #[test]
    fn params_resolve_from_args_then_step_then_store_then_default() {
        let def = StepDefinition::when(
            StepPattern::template("I pay {euro} Euro").unwrap(),
        )
        .params(["euro", "step", "wallet"])
        .param_default("tip", Value::new(0_u64))
        .to_sync(unit);

        let step = Step::new("When", "I pay 2 Euro");
        let args = extracted_args(&def, &step).unwrap();

        let mut store = ScenarioValues::new();
        store.set("wallet", Value::from("leather"));

        let resolved = resolve_params(&def, &step, &args, &store).unwrap();
        assert_eq!(resolved.get("euro").unwrap().as_str(), Some("2"));
        assert!(resolved.get("step").unwrap().is::<Step>());
        assert_eq!(resolved.get("wallet").unwrap().as_str(), Some("leather"));
        assert_eq!(
            resolved.get("tip").unwrap().downcast_ref::<u64>(),
            Some(&0),
        );
    }

    #[test]
    fn unresolvable_param_fails() {
        let def = StepDefinition::given(StepPattern::exact("x"))
            .params(["browser"])
            .to_sync(unit);

        let step = Step::new("Given", "x");
        let args = extracted_args(&def, &step).unwrap();
        let store = ScenarioValues::new();

        let err = resolve_params(&def, &step, &args, &store).unwrap_err();
        assert!(matches!(err, StepError::Unresolved { param } if param == "browser"));
    }
}
