//! Declared field types and the conversion between typed Rust fields and the
//! loosely-typed [`Value`] cell the copier moves around.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive kind a field declares.
///
/// `Any` stands for an untyped field: values are passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    Any,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Any => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Rust type that can back a copyable field.
///
/// `TYPES` lists the declared alternatives in order; the first one drives
/// coercion. Implementations are expected to accept whatever the coercion of
/// their primary type produces.
pub trait PropertyValue: Sized {
    const TYPES: &'static [FieldType];
    const NULLABLE: bool = false;

    /// Build the field value from an already-coerced cell.
    fn from_value(value: Value) -> Result<Self, String>;

    /// Expose the field value to object sources.
    fn to_value(&self) -> Value;
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {expected}, got {}", kind_of(got))
}

/// Short name of a cell's shape, used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl PropertyValue for bool {
    const TYPES: &'static [FieldType] = &[FieldType::Bool];

    fn from_value(value: Value) -> Result<Self, String> {
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl PropertyValue for i64 {
    const TYPES: &'static [FieldType] = &[FieldType::Int];

    fn from_value(value: Value) -> Result<Self, String> {
        value.as_i64().ok_or_else(|| mismatch("int", &value))
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl PropertyValue for i32 {
    const TYPES: &'static [FieldType] = &[FieldType::Int];

    fn from_value(value: Value) -> Result<Self, String> {
        let wide = value.as_i64().ok_or_else(|| mismatch("int", &value))?;
        i32::try_from(wide).map_err(|_| format!("{wide} is out of range for a 32-bit integer"))
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl PropertyValue for u64 {
    const TYPES: &'static [FieldType] = &[FieldType::Int];

    fn from_value(value: Value) -> Result<Self, String> {
        match value.as_i64() {
            Some(n) => u64::try_from(n).map_err(|_| format!("{n} is negative")),
            None => Err(mismatch("int", &value)),
        }
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl PropertyValue for f64 {
    const TYPES: &'static [FieldType] = &[FieldType::Float];

    fn from_value(value: Value) -> Result<Self, String> {
        value.as_f64().ok_or_else(|| mismatch("float", &value))
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl PropertyValue for String {
    const TYPES: &'static [FieldType] = &[FieldType::String];

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

/// Untyped field: any cell, including null, is stored as is.
impl PropertyValue for Value {
    const TYPES: &'static [FieldType] = &[FieldType::Any];
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self, String> {
        Ok(value)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    const TYPES: &'static [FieldType] = T::TYPES;
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}
