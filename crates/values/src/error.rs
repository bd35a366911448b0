//! Value object error model.

use thiserror::Error;

pub type ValueResult<T> = Result<T, ValueError>;

/// Construction failure for a value object. Value objects validate on
/// construction, so this is the only way one can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Text or integer pair that does not describe a UUID.
    #[error("invalid uuid format: {0}")]
    InvalidUuidFormat(String),

    /// A non-empty string was empty after trimming.
    #[error("string is empty")]
    EmptyString,

    /// Explicit seed material of the wrong size.
    #[error("uuid seed must be 16 bytes, got {0}")]
    InvalidSeedLength(usize),
}

impl ValueError {
    pub fn invalid_uuid(msg: impl Into<String>) -> Self {
        Self::InvalidUuidFormat(msg.into())
    }
}
