//! Field metadata: descriptors, per-type field sets, and the process-wide
//! cache that memoizes them per (type, visibility filter).

use core::any::TypeId;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bitflags::bitflags;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{CopyError, CopyResult};
use crate::value::{FieldType, PropertyValue};

/// Accessibility of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_filter(self) -> VisibilityFilter {
        match self {
            Visibility::Public => VisibilityFilter::PUBLIC,
            Visibility::Protected => VisibilityFilter::PROTECTED,
            Visibility::Private => VisibilityFilter::PRIVATE,
        }
    }
}

bitflags! {
    /// Subset of visibilities a field set is restricted to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VisibilityFilter: u8 {
        const PUBLIC = 0b001;
        const PROTECTED = 0b010;
        const PRIVATE = 0b100;
    }
}

impl VisibilityFilter {
    pub fn admits(self, visibility: Visibility) -> bool {
        self.contains(visibility.as_filter())
    }
}

/// Metadata for one named, typed member of a target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    types: Vec<FieldType>,
    nullable: bool,
    visibility: Visibility,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        types: Vec<FieldType>,
        nullable: bool,
        visibility: Visibility,
    ) -> Self {
        Self {
            name: name.into(),
            types,
            nullable,
            visibility,
        }
    }

    /// Descriptor for a field backed by the Rust type `T`.
    pub fn of<T: PropertyValue>(name: impl Into<String>, visibility: Visibility) -> Self {
        Self::new(name, T::TYPES.to_vec(), T::NULLABLE, visibility)
    }

    /// First declared alternative of `T`, or `Any` when it declares none.
    pub fn primary_of<T: PropertyValue>() -> FieldType {
        T::TYPES.first().copied().unwrap_or(FieldType::Any)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared alternatives, in declaration order.
    pub fn types(&self) -> &[FieldType] {
        &self.types
    }

    /// The type coercion targets: the first alternative of a union.
    pub fn primary_type(&self) -> FieldType {
        self.types.first().copied().unwrap_or(FieldType::Any)
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A type that can list its own copyable fields.
///
/// Usually implemented through [`describe_properties!`](crate::describe_properties).
pub trait Describe: 'static {
    fn type_name() -> &'static str;

    /// Every declared field, in declaration order.
    fn describe() -> Vec<FieldDescriptor>;
}

/// Ordered fields of one type under one visibility filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    type_name: &'static str,
    fields: IndexMap<String, FieldDescriptor>,
}

impl FieldSet {
    fn build(
        type_name: &'static str,
        declared: Vec<FieldDescriptor>,
        filter: VisibilityFilter,
    ) -> CopyResult<Self> {
        let mut fields = IndexMap::with_capacity(declared.len());
        let mut seen = HashSet::with_capacity(declared.len());
        for field in &declared {
            if !seen.insert(field.name.as_str()) {
                return Err(CopyError::duplicate_field(type_name, field.name.as_str()));
            }
        }
        for field in declared {
            if filter.admits(field.visibility) {
                fields.insert(field.name.clone(), field);
            }
        }
        Ok(Self { type_name, fields })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

type Introspect = fn() -> Vec<FieldDescriptor>;

#[derive(Clone, Copy)]
struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    introspect: Introspect,
}

impl Registration {
    fn of<T: Describe>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: T::type_name(),
            introspect: T::describe,
        }
    }
}

static GLOBAL: Lazy<Arc<MetadataCache>> = Lazy::new(|| Arc::new(MetadataCache::new()));

/// Memoizes [`FieldSet`]s per (type, visibility filter).
///
/// Entries are never evicted: the set of describable types is fixed at
/// compile time. Population happens under the write lock with a re-check, so
/// each key is introspected exactly once even under contention.
#[derive(Default)]
pub struct MetadataCache {
    registry: RwLock<HashMap<&'static str, Registration>>,
    entries: RwLock<HashMap<(TypeId, VisibilityFilter), Arc<FieldSet>>>,
    introspections: AtomicUsize,
}

impl fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataCache")
            .field("registered", &self.registry.read().len())
            .field("entries", &self.entries.read().len())
            .field("introspections", &self.introspections())
            .finish()
    }
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by default copiers.
    pub fn global() -> Arc<MetadataCache> {
        Arc::clone(&GLOBAL)
    }

    /// Make `T` resolvable by name.
    pub fn register<T: Describe>(&self) {
        let registration = Registration::of::<T>();
        let mut registry = self.registry.write();
        let existing = registry.get(registration.type_name).map(|r| r.type_id);
        match existing {
            Some(type_id) if type_id != registration.type_id => {
                tracing::warn!(
                    type_name = registration.type_name,
                    "another type is already registered under this name; keeping the first"
                );
            }
            Some(_) => {}
            None => {
                registry.insert(registration.type_name, registration);
            }
        }
    }

    /// Fields of `T` admitted by `filter`.
    pub fn fields_of<T: Describe>(&self, filter: VisibilityFilter) -> CopyResult<Arc<FieldSet>> {
        if let Some(hit) = self.lookup(TypeId::of::<T>(), filter) {
            return Ok(hit);
        }
        self.register::<T>();
        self.populate(Registration::of::<T>(), filter)
    }

    /// Fields of the type registered under `type_name`.
    pub fn fields_of_named(
        &self,
        type_name: &str,
        filter: VisibilityFilter,
    ) -> CopyResult<Arc<FieldSet>> {
        let registration = self
            .registry
            .read()
            .get(type_name)
            .copied()
            .ok_or_else(|| CopyError::unknown_type(type_name))?;
        if let Some(hit) = self.lookup(registration.type_id, filter) {
            return Ok(hit);
        }
        self.populate(registration, filter)
    }

    /// How many field sets have been computed so far.
    pub fn introspections(&self) -> usize {
        self.introspections.load(Ordering::Relaxed)
    }

    fn lookup(&self, type_id: TypeId, filter: VisibilityFilter) -> Option<Arc<FieldSet>> {
        self.entries.read().get(&(type_id, filter)).cloned()
    }

    fn populate(
        &self,
        registration: Registration,
        filter: VisibilityFilter,
    ) -> CopyResult<Arc<FieldSet>> {
        let key = (registration.type_id, filter);
        let mut entries = self.entries.write();
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }

        let set = Arc::new(FieldSet::build(
            registration.type_name,
            (registration.introspect)(),
            filter,
        )?);
        self.introspections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            type_name = registration.type_name,
            filter = ?filter,
            fields = set.len(),
            "cached field set"
        );
        entries.insert(key, Arc::clone(&set));
        Ok(set)
    }
}
