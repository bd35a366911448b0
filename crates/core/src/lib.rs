//! `propfill-core` — copy loosely-typed data into typed domain objects.
//!
//! Targets describe their fields once (usually with [`describe_properties!`]);
//! the [`MetadataCache`] memoizes those tables and the [`PropertyCopier`]
//! walks them, coercing each present source value to the declared type.

pub mod copier;
pub mod error;
mod macros;
pub mod metadata;
pub mod value;

pub use copier::{
    ArgKey, CopyFrom, CopyOptions, CopySource, FieldAccess, HookErrorPolicy, HookOutcome, Mapping,
    NamedArgs, PropertyCopier, PropertySource, PropertyTarget, UnhookedPolicy, WritableByName,
    copy_from_mapping, copy_from_named_args, copy_from_object, copy_from_same,
};
pub use error::{CopyError, CopyResult};
pub use metadata::{Describe, FieldDescriptor, FieldSet, MetadataCache, Visibility, VisibilityFilter};
pub use serde_json::{Map, Value};
pub use value::{FieldType, PropertyValue};
