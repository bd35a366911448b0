//! Property copier: moves matching named values from a source into an
//! already-allocated target, coercing each one to the field's declared type.

mod coerce;
mod source;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CopyError, CopyResult};
use crate::metadata::{Describe, FieldDescriptor, MetadataCache, VisibilityFilter};

pub use source::{ArgKey, CopySource, Mapping, NamedArgs, PropertySource};

/// Direct, by-name access to every declared field of a type.
///
/// Generated by [`describe_properties!`](crate::describe_properties).
pub trait FieldAccess: Describe {
    /// Store an already-coerced value into the named field.
    fn assign(&mut self, field: &str, value: Value) -> CopyResult<()>;

    /// Read the named field regardless of its visibility.
    fn read(&self, field: &str) -> Option<Value>;
}

/// What a write-hook did with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Applied,
    /// The hook does not manage this field.
    Unhandled,
}

/// Catch-all setter for non-public fields.
pub trait WritableByName {
    fn try_set(&mut self, field: &str, value: &Value) -> CopyResult<HookOutcome>;
}

/// A type the copier can write into.
///
/// Override [`write_hook`](PropertyTarget::write_hook) to route writes of
/// protected and private fields through a [`WritableByName`] implementation.
pub trait PropertyTarget: FieldAccess {
    fn write_hook(&mut self) -> Option<&mut dyn WritableByName> {
        None
    }
}

/// What to do when a write-hook returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookErrorPolicy {
    #[default]
    Propagate,
    /// Drop the value and keep copying.
    Ignore,
}

/// What to do with a non-public field no hook handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnhookedPolicy {
    #[default]
    AssignDirect,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyOptions {
    pub on_hook_error: HookErrorPolicy,
    pub unhooked: UnhookedPolicy,
}

/// The single copy implementation behind the free functions and [`CopyFrom`].
///
/// Copies are partial: fields absent from the source are left untouched.
/// They are not transactional: a failing field leaves earlier writes in place.
#[derive(Debug, Clone)]
pub struct PropertyCopier {
    cache: Arc<MetadataCache>,
    options: CopyOptions,
}

impl Default for PropertyCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyCopier {
    /// Copier over the process-wide metadata cache with default options.
    pub fn new() -> Self {
        Self::with_cache(MetadataCache::global())
    }

    pub fn with_cache(cache: Arc<MetadataCache>) -> Self {
        Self {
            cache,
            options: CopyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CopyOptions {
        self.options
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn copy_from_object<'t, T: PropertyTarget>(
        &self,
        target: &'t mut T,
        source: &dyn PropertySource,
    ) -> CopyResult<&'t mut T> {
        self.copy(target, CopySource::Object(source))?;
        Ok(target)
    }

    pub fn copy_from_mapping<'t, T: PropertyTarget>(
        &self,
        target: &'t mut T,
        source: &dyn Mapping,
    ) -> CopyResult<&'t mut T> {
        self.copy(target, CopySource::Mapping(source))?;
        Ok(target)
    }

    /// Fails with [`CopyError::InvalidArgumentKey`] before touching `target`
    /// if any key is positional or not an identifier.
    pub fn copy_from_named_args<'t, T, I, K, V>(
        &self,
        target: &'t mut T,
        args: I,
    ) -> CopyResult<&'t mut T>
    where
        T: PropertyTarget,
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgKey>,
        V: Into<Value>,
    {
        let args = NamedArgs::new(args)?;
        self.copy(target, CopySource::NamedArgs(&args))?;
        Ok(target)
    }

    /// Use any serializable value as an object source; it must serialize to
    /// a JSON object.
    pub fn copy_from_serialized<'t, T: PropertyTarget, S: Serialize + ?Sized>(
        &self,
        target: &'t mut T,
        source: &S,
    ) -> CopyResult<&'t mut T> {
        let object = serde_json::to_value(source)
            .map_err(|e| CopyError::UnsupportedSource(e.to_string()))?;
        if !object.is_object() {
            return Err(CopyError::UnsupportedSource(format!(
                "expected an object, got {}",
                crate::value::kind_of(&object)
            )));
        }
        self.copy(target, CopySource::Object(&object))?;
        Ok(target)
    }

    /// Copy every declared field, public or not, from another value of the
    /// same type. Fields are read through [`FieldAccess::read`] and written
    /// through the same route as any other source, hook included.
    pub fn copy_from_same<'t, T: PropertyTarget>(
        &self,
        target: &'t mut T,
        source: &T,
    ) -> CopyResult<&'t mut T> {
        let fields = self.cache.fields_of::<T>(VisibilityFilter::all())?;
        tracing::trace!(
            type_name = fields.type_name(),
            source = "same type",
            "copying properties"
        );
        for field in fields.iter() {
            if let Some(value) = source.read(field.name()) {
                self.apply(target, field, value)?;
            }
        }
        Ok(target)
    }

    /// Copy every field of `T` present in `source`, in declaration order.
    pub fn copy<T: PropertyTarget>(&self, target: &mut T, source: CopySource<'_>) -> CopyResult<()> {
        if source.is_empty() {
            return Ok(());
        }
        let fields = self.cache.fields_of::<T>(VisibilityFilter::all())?;
        tracing::trace!(
            type_name = fields.type_name(),
            source = source.shape(),
            "copying properties"
        );
        for field in fields.iter() {
            if let Some(value) = source.fetch(field.name()) {
                self.apply(target, field, value)?;
            }
        }
        Ok(())
    }

    fn apply<T: PropertyTarget>(
        &self,
        target: &mut T,
        field: &FieldDescriptor,
        value: Value,
    ) -> CopyResult<()> {
        if value.is_null() {
            if !field.nullable() {
                return Err(CopyError::null_not_allowed(field.name()));
            }
            tracing::trace!(field = field.name(), "assigning null");
            return target.assign(field.name(), Value::Null);
        }

        let value = coerce::coerce(field, value)?;
        if field.is_public() {
            tracing::trace!(field = field.name(), "assigning directly");
            return target.assign(field.name(), value);
        }

        if let Some(hook) = target.write_hook() {
            match hook.try_set(field.name(), &value) {
                Ok(HookOutcome::Applied) => {
                    tracing::trace!(field = field.name(), "assigned through write hook");
                    return Ok(());
                }
                Ok(HookOutcome::Unhandled) => {}
                Err(err) => match self.options.on_hook_error {
                    HookErrorPolicy::Propagate => return Err(err),
                    HookErrorPolicy::Ignore => {
                        tracing::warn!(field = field.name(), error = %err, "ignoring write hook failure");
                        return Ok(());
                    }
                },
            }
        }

        match self.options.unhooked {
            UnhookedPolicy::AssignDirect => {
                tracing::trace!(field = field.name(), "no hook; assigning directly");
                target.assign(field.name(), value)
            }
            UnhookedPolicy::Skip => {
                tracing::trace!(field = field.name(), "no hook; skipped");
                Ok(())
            }
        }
    }
}

/// Fluent copying on the target itself, through the default copier.
pub trait CopyFrom: PropertyTarget + Sized {
    fn fill_from_object(&mut self, source: &dyn PropertySource) -> CopyResult<&mut Self> {
        PropertyCopier::new().copy_from_object(self, source)
    }

    fn fill_from_mapping(&mut self, source: &dyn Mapping) -> CopyResult<&mut Self> {
        PropertyCopier::new().copy_from_mapping(self, source)
    }

    fn fill_from_named_args<I, K, V>(&mut self, args: I) -> CopyResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgKey>,
        V: Into<Value>,
    {
        PropertyCopier::new().copy_from_named_args(self, args)
    }

    fn fill_from_same(&mut self, source: &Self) -> CopyResult<&mut Self> {
        PropertyCopier::new().copy_from_same(self, source)
    }
}

impl<T: PropertyTarget> CopyFrom for T {}

pub fn copy_from_object<'t, T: PropertyTarget>(
    target: &'t mut T,
    source: &dyn PropertySource,
) -> CopyResult<&'t mut T> {
    PropertyCopier::new().copy_from_object(target, source)
}

pub fn copy_from_mapping<'t, T: PropertyTarget>(
    target: &'t mut T,
    source: &dyn Mapping,
) -> CopyResult<&'t mut T> {
    PropertyCopier::new().copy_from_mapping(target, source)
}

pub fn copy_from_same<'t, T: PropertyTarget>(
    target: &'t mut T,
    source: &T,
) -> CopyResult<&'t mut T> {
    PropertyCopier::new().copy_from_same(target, source)
}

pub fn copy_from_named_args<'t, T, I, K, V>(target: &'t mut T, args: I) -> CopyResult<&'t mut T>
where
    T: PropertyTarget,
    I: IntoIterator<Item = (K, V)>,
    K: Into<ArgKey>,
    V: Into<Value>,
{
    PropertyCopier::new().copy_from_named_args(target, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Visibility;
    use serde_json::json;

    /// Hand-written field table, no macro.
    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        hits: i64,
        label: Option<String>,
        audit: Vec<String>,
    }

    impl Describe for Counter {
        fn type_name() -> &'static str {
            "Counter"
        }

        fn describe() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::of::<i64>("hits", Visibility::Public),
                FieldDescriptor::of::<Option<String>>("label", Visibility::Private),
            ]
        }
    }

    impl FieldAccess for Counter {
        fn assign(&mut self, field: &str, value: Value) -> CopyResult<()> {
            self.audit.push(field.to_string());
            match field {
                "hits" => self.hits = value.as_i64().unwrap_or_default(),
                "label" => self.label = value.as_str().map(str::to_string),
                _ => return Err(CopyError::unknown_field("Counter", field)),
            }
            Ok(())
        }

        fn read(&self, field: &str) -> Option<Value> {
            match field {
                "hits" => Some(json!(self.hits)),
                "label" => Some(json!(self.label)),
                _ => None,
            }
        }
    }

    impl PropertyTarget for Counter {}

    fn copier() -> PropertyCopier {
        PropertyCopier::with_cache(Arc::new(MetadataCache::new()))
    }

    #[test]
    fn empty_mapping_skips_introspection() {
        let copier = copier();
        let mut counter = Counter::default();
        copier
            .copy_from_mapping(&mut counter, &serde_json::Map::new())
            .unwrap();
        assert_eq!(copier.cache().introspections(), 0);
        assert!(counter.audit.is_empty());
    }

    #[test]
    fn writes_follow_declaration_order() {
        let copier = copier();
        let mut counter = Counter::default();
        let source = json!({"label": "x", "hits": "3"});
        copier.copy_from_object(&mut counter, &source).unwrap();
        assert_eq!(counter.audit, ["hits", "label"]);
        assert_eq!(counter.hits, 3);
        assert_eq!(counter.label.as_deref(), Some("x"));
    }

    #[test]
    fn unhooked_private_field_can_be_skipped() {
        let copier = copier().with_options(CopyOptions {
            unhooked: UnhookedPolicy::Skip,
            ..CopyOptions::default()
        });
        let mut counter = Counter::default();
        copier
            .copy_from_named_args(&mut counter, [("hits", json!(1)), ("label", json!("x"))])
            .unwrap();
        assert_eq!(counter.hits, 1);
        assert_eq!(counter.label, None);
    }

    #[test]
    fn null_bypasses_the_unhooked_policy() {
        let copier = copier().with_options(CopyOptions {
            unhooked: UnhookedPolicy::Skip,
            ..CopyOptions::default()
        });
        let mut counter = Counter {
            label: Some("before".to_string()),
            ..Counter::default()
        };
        copier
            .copy_from_named_args(&mut counter, [("label", Value::Null)])
            .unwrap();
        assert_eq!(counter.label, None);
    }

    #[test]
    fn same_type_copy_reads_private_fields() {
        let copier = copier();
        let source = Counter {
            hits: 7,
            label: Some("kept".to_string()),
            audit: vec!["ignored".to_string()],
        };
        let mut counter = Counter::default();
        copier.copy_from_same(&mut counter, &source).unwrap();
        assert_eq!(counter.hits, 7);
        assert_eq!(counter.label.as_deref(), Some("kept"));
        assert_eq!(counter.audit, ["hits", "label"]);
    }

    #[test]
    fn same_type_copy_honors_the_unhooked_policy() {
        let copier = copier().with_options(CopyOptions {
            unhooked: UnhookedPolicy::Skip,
            ..CopyOptions::default()
        });
        let source = Counter {
            hits: 2,
            label: Some("hidden".to_string()),
            audit: Vec::new(),
        };
        let mut counter = Counter::default();
        copier.copy_from_same(&mut counter, &source).unwrap();
        assert_eq!(counter.hits, 2);
        assert_eq!(counter.label, None);
    }

    #[test]
    fn serialized_sources_must_be_objects() {
        let copier = copier();
        let mut counter = Counter::default();
        let err = copier.copy_from_serialized(&mut counter, &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            CopyError::UnsupportedSource("expected an object, got array".to_string())
        );
    }
}
