//! String value objects.

use core::fmt;
use core::str::FromStr;

use propfill_core::{FieldType, PropertyValue, Value};
use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};
use crate::value_object::ValueObject;

/// Any string, wrapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringValue(String);

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for StringValue {}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StringValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for StringValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PropertyValue for StringValue {
    const TYPES: &'static [FieldType] = &[FieldType::String];

    fn from_value(value: Value) -> Result<Self, String> {
        String::from_value(value).map(Self)
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

/// A string that is not empty once surrounding whitespace is trimmed.
///
/// The stored value is the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    pub fn new(value: &str) -> ValueResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyString);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for NonEmptyString {}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyString {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl From<NonEmptyString> for StringValue {
    fn from(value: NonEmptyString) -> Self {
        StringValue(value.0)
    }
}

impl PropertyValue for NonEmptyString {
    const TYPES: &'static [FieldType] = &[FieldType::String];

    fn from_value(value: Value) -> Result<Self, String> {
        let text = String::from_value(value)?;
        Self::new(&text).map_err(|e| e.to_string())
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_value_keeps_text_verbatim() {
        let value = StringValue::new("  padded ");
        assert_eq!(value.value(), "  padded ");
        assert_eq!(value.to_string(), "  padded ");
        assert_eq!(StringValue::default().value(), "");
    }

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!(NonEmptyString::new(""), Err(ValueError::EmptyString));
        assert_eq!(NonEmptyString::new(" \t\n"), Err(ValueError::EmptyString));
    }

    #[test]
    fn non_empty_string_is_trimmed() {
        let value = NonEmptyString::new("  hola ").unwrap();
        assert_eq!(value.value(), "hola");
        assert_eq!(value.to_string(), "hola");
        assert_eq!(value.to_string(), value.value());
    }

    #[test]
    fn deserialization_validates() {
        let ok: NonEmptyString = serde_json::from_value(json!("x")).unwrap();
        assert_eq!(ok.value(), "x");
        assert!(serde_json::from_value::<NonEmptyString>(json!("  ")).is_err());
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!("x"));
    }

    #[test]
    fn property_value_rejects_blank_text() {
        assert_eq!(
            NonEmptyString::from_value(json!("")).unwrap_err(),
            "string is empty"
        );
        assert_eq!(
            NonEmptyString::from_value(json!(" a ")).unwrap().value(),
            "a"
        );
    }
}
