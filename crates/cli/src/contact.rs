//! Demo record used by `propfill copy`.

use propfill_core::{
    CopyError, CopyResult, HookOutcome, PropertyTarget, Value, WritableByName, describe_properties,
};
use propfill_values::{NonEmptyString, UuidValue};
use serde::Serialize;

pub const NOTE_LIMIT: usize = 280;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: Option<UuidValue>,
    pub name: Option<NonEmptyString>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub subscribed: bool,
    note: Option<String>,
    source_ref: Option<String>,
}

describe_properties!(Contact {
    public id: Option<UuidValue>,
    public name: Option<NonEmptyString>,
    public email: Option<String>,
    public age: Option<i32>,
    public subscribed: bool,
    protected note: Option<String>,
    private source_ref: Option<String>,
});

impl Contact {
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }
}

/// Notes are trimmed and capped; `source_ref` is left to the copier's policy.
impl WritableByName for Contact {
    fn try_set(&mut self, field: &str, value: &Value) -> CopyResult<HookOutcome> {
        if field != "note" {
            return Ok(HookOutcome::Unhandled);
        }
        let Some(text) = value.as_str() else {
            return Err(CopyError::hook(field, "expected text"));
        };
        let text = text.trim();
        if text.chars().count() > NOTE_LIMIT {
            return Err(CopyError::hook(
                field,
                format!("note is longer than {NOTE_LIMIT} characters"),
            ));
        }
        self.note = Some(text.to_string());
        Ok(HookOutcome::Applied)
    }
}

impl PropertyTarget for Contact {
    fn write_hook(&mut self) -> Option<&mut dyn WritableByName> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use propfill_core::{
        CopyOptions, HookErrorPolicy, MetadataCache, PropertyCopier, UnhookedPolicy,
    };
    use serde_json::{Map, json};

    use super::*;

    fn copier(options: CopyOptions) -> PropertyCopier {
        PropertyCopier::with_cache(Arc::new(MetadataCache::new())).with_options(options)
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(members) => members,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn copies_and_coerces_loose_json() {
        let source = object(json!({
            "id": "{6BA7B810-9DAD-11D1-80B4-00C04FD430C8}",
            "name": "  Ada ",
            "age": "36",
            "subscribed": "1",
            "note": "  likes tea  ",
            "source_ref": "import-7",
        }));
        let mut contact = Contact::default();
        copier(CopyOptions::default())
            .copy_from_mapping(&mut contact, &source)
            .unwrap();

        assert_eq!(contact.id, Some(UuidValue::NAMESPACE_DNS));
        assert_eq!(contact.name.as_ref().map(|n| n.value()), Some("Ada"));
        assert_eq!(contact.age, Some(36));
        assert!(contact.subscribed);
        assert_eq!(contact.note(), Some("likes tea"));
        assert_eq!(contact.source_ref(), Some("import-7"));
    }

    #[test]
    fn skip_policy_leaves_unhooked_fields_alone() {
        let source = object(json!({ "note": "hi", "source_ref": "import-7" }));
        let mut contact = Contact::default();
        copier(CopyOptions {
            unhooked: UnhookedPolicy::Skip,
            ..CopyOptions::default()
        })
        .copy_from_mapping(&mut contact, &source)
        .unwrap();

        assert_eq!(contact.note(), Some("hi"));
        assert_eq!(contact.source_ref(), None);
    }

    #[test]
    fn overlong_note_follows_the_hook_error_policy() {
        let source = object(json!({ "email": "a@b.c", "note": "x".repeat(NOTE_LIMIT + 1) }));

        let mut contact = Contact::default();
        let err = copier(CopyOptions::default())
            .copy_from_mapping(&mut contact, &source)
            .unwrap_err();
        assert_eq!(err.field(), Some("note"));
        assert_eq!(contact.email.as_deref(), Some("a@b.c"));

        let mut contact = Contact::default();
        copier(CopyOptions {
            on_hook_error: HookErrorPolicy::Ignore,
            ..CopyOptions::default()
        })
        .copy_from_mapping(&mut contact, &source)
        .unwrap();
        assert_eq!(contact.note(), None);
    }

    #[test]
    fn malformed_value_objects_are_coercion_errors() {
        let mut contact = Contact::default();
        let err = copier(CopyOptions::default())
            .copy_from_named_args(&mut contact, [("id", json!("not-a-uuid"))])
            .unwrap_err();
        assert!(matches!(err, CopyError::Coercion { ref field, .. } if field == "id"));

        let err = copier(CopyOptions::default())
            .copy_from_named_args(&mut contact, [("name", json!("   "))])
            .unwrap_err();
        assert!(matches!(err, CopyError::Coercion { ref field, .. } if field == "name"));
    }

    #[test]
    fn serializes_every_field() {
        let contact = Contact {
            id: Some(UuidValue::NAMESPACE_URL),
            ..Contact::default()
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], "6ba7b811-9dad-11d1-80b4-00c04fd430c8");
        assert_eq!(json["subscribed"], false);
        assert!(json["note"].is_null());
    }
}
