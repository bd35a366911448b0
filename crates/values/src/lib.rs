//! Value objects: validated, immutable wrappers around strings and UUIDs.
//!
//! Each value object also implements `PropertyValue`, so it can be declared
//! as a field of a type described with `describe_properties!`.

pub mod error;
pub mod string;
pub mod uuid;
pub mod value_object;

pub use error::{ValueError, ValueResult};
pub use string::{NonEmptyString, StringValue};
pub use uuid::UuidValue;
pub use value_object::ValueObject;
