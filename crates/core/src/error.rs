//! Copy error model.

use thiserror::Error;

use crate::value::FieldType;

/// Result type used across the copier and the metadata cache.
pub type CopyResult<T> = Result<T, CopyError>;

/// Failure raised while describing a type or copying into it.
///
/// Every variant is raised synchronously at the point of failure. The copier
/// never retries and never rolls back writes that happened before the error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CopyError {
    /// The type was looked up by name but never registered with the cache.
    #[error("type '{0}' is not registered")]
    UnknownType(String),

    /// A named-argument list carried a positional or non-identifier key.
    #[error("invalid argument key '{0}'")]
    InvalidArgumentKey(String),

    /// A null value was given for a field that does not accept null.
    #[error("field '{field}' does not allow null")]
    NullNotAllowed { field: String },

    /// A value could not be converted to the field's declared type.
    #[error("unable to convert field '{field}' to '{target}': {reason}")]
    Coercion {
        field: String,
        target: FieldType,
        reason: String,
    },

    /// A write-hook rejected the value for a non-public field.
    #[error("write hook failed for field '{field}': {message}")]
    Hook { field: String, message: String },

    /// A field accessor was asked for a name it does not declare.
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    /// A descriptor table declared the same name twice.
    #[error("type '{type_name}' declares field '{field}' more than once")]
    DuplicateField { type_name: String, field: String },

    /// An object source did not produce a flat set of named properties.
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),
}

impl CopyError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType(name.into())
    }

    pub fn invalid_argument_key(key: impl Into<String>) -> Self {
        Self::InvalidArgumentKey(key.into())
    }

    pub fn null_not_allowed(field: impl Into<String>) -> Self {
        Self::NullNotAllowed {
            field: field.into(),
        }
    }

    pub fn coercion(field: impl Into<String>, target: FieldType, reason: impl Into<String>) -> Self {
        Self::Coercion {
            field: field.into(),
            target,
            reason: reason.into(),
        }
    }

    pub fn hook(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn duplicate_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Name of the field the error is about, when it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NullNotAllowed { field }
            | Self::Coercion { field, .. }
            | Self::Hook { field, .. }
            | Self::UnknownField { field, .. }
            | Self::DuplicateField { field, .. } => Some(field),
            _ => None,
        }
    }
}
