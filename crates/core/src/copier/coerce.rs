//! Coercion of raw non-null cells to a field's primary declared type.

use serde_json::{Number, Value};

use crate::error::{CopyError, CopyResult};
use crate::metadata::FieldDescriptor;
use crate::value::{FieldType, kind_of};

/// Convert `value` to the primary type of `field`.
///
/// Null is not handled here; the copier resolves it against nullability
/// before coercion runs.
pub(crate) fn coerce(field: &FieldDescriptor, value: Value) -> CopyResult<Value> {
    let target = field.primary_type();
    let fail = |reason: String| CopyError::coercion(field.name(), target, reason);

    match target {
        FieldType::Any => Ok(value),
        FieldType::Bool => to_bool(value).map(Value::Bool).map_err(fail),
        FieldType::Int => to_int(value).map(Value::from).map_err(fail),
        FieldType::Float => to_float(value).map_err(fail),
        FieldType::String => to_string(value).map(Value::String).map_err(fail),
    }
}

/// Only the literals `"true"` and `"1"` are true; every other string is false.
pub(crate) fn text_to_bool(text: &str) -> bool {
    text == "true" || text == "1"
}

fn not_scalar(value: &Value) -> String {
    format!("{} is not a scalar", kind_of(value))
}

fn to_bool(value: Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::String(s) => Ok(text_to_bool(&s)),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        other => Err(not_scalar(&other)),
    }
}

fn float_to_int(f: f64) -> Result<i64, String> {
    let truncated = f.trunc();
    if f.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Ok(truncated as i64)
    } else {
        Err(format!("{f} does not fit a 64-bit integer"))
    }
}

fn to_int(value: Value) -> Result<i64, String> {
    match value {
        Value::Bool(b) => Ok(i64::from(b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(format!("{n} does not fit a 64-bit integer"))
            } else {
                float_to_int(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(i);
            }
            match trimmed.parse::<f64>() {
                Ok(f) => float_to_int(f),
                Err(_) => Err(format!("'{s}' is not numeric")),
            }
        }
        other => Err(not_scalar(&other)),
    }
}

fn to_float(value: Value) -> Result<Value, String> {
    let f = match value {
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not numeric"))?,
        other => return Err(not_scalar(&other)),
    };
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| format!("{f} is not a finite number"))
}

/// Booleans render as `"1"` and `""`, the same literals the boolean rule
/// reads back.
fn to_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(not_scalar(&other)),
    }
}
