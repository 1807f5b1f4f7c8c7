//! Converters transforming raw extracted arguments before dispatch.

use std::{any::Any, fmt::Display, str::FromStr, sync::Arc};

use crate::{error::ConvertError, value::Value};

/// Transformation applied to one extracted argument value before it is
/// handed to the step callable (and before it is exposed to later
/// steps). An argument without a registered [`Converter`] passes through
/// unchanged.
pub type Converter =
    Arc<dyn Fn(&Value) -> Result<Value, ConvertError> + Send + Sync>;

/// [`Converter`] parsing the raw string through [`FromStr`].
///
/// # Example
///
/// ```rust
/// use cornichon::{converter, Value};
///
/// let to_int = converter::parsed::<u64>();
/// let n = to_int(&Value::from("42")).unwrap();
/// assert_eq!(n.downcast_ref::<u64>(), Some(&42));
/// ```
#[must_use]
pub fn parsed<T>() -> Converter
where
    T: FromStr + Any + Send + Sync,
    T::Err: Display,
{
    Arc::new(|raw: &Value| {
        let s = raw.as_str().ok_or_else(|| {
            ConvertError::new(format!(
                "expected a raw string to parse, got {}",
                raw.type_name(),
            ))
        })?;
        s.parse::<T>().map(Value::new).map_err(|e| {
            ConvertError::new(format!("cannot parse \"{s}\": {e}"))
        })
    })
}

/// [`Converter`] trimming surrounding whitespace off the raw string.
#[must_use]
pub fn trimmed() -> Converter {
    Arc::new(|raw: &Value| {
        let s = raw.as_str().ok_or_else(|| {
            ConvertError::new(format!(
                "expected a raw string to trim, got {}",
                raw.type_name(),
            ))
        })?;
        Ok(Value::from(s.trim()))
    })
}
