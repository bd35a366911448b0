//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: construction is
/// validation, and there are no setters. To "modify" one, build a new one.
///
/// The trait requires:
/// - **Clone**: values are cheap to copy around
/// - **PartialEq**: two values with the same contents are equal
/// - **Debug**: values show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
