//! The three shapes a copy can read from.

use core::fmt;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{CopyError, CopyResult};

/// An instance whose properties can be read by name.
///
/// `None` means the instance has no readable property of that name, which is
/// different from a property holding null.
pub trait PropertySource {
    fn read_property(&self, name: &str) -> Option<Value>;
}

/// A JSON object exposes its members; any other JSON value exposes nothing.
impl PropertySource for Value {
    fn read_property(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|members| members.get(name).cloned())
    }
}

/// A string-keyed dictionary.
pub trait Mapping {
    fn lookup(&self, key: &str) -> Option<&Value>;

    fn is_empty(&self) -> bool;
}

impl Mapping for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn is_empty(&self) -> bool {
        Map::is_empty(self)
    }
}

impl<S: BuildHasher> Mapping for HashMap<String, Value, S> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

impl Mapping for BTreeMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

impl<S: BuildHasher> Mapping for IndexMap<String, Value, S> {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn is_empty(&self) -> bool {
        IndexMap::is_empty(self)
    }
}

/// Key of one entry in a named-argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    Named(String),
    Positional(usize),
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKey::Named(name) => f.write_str(name),
            ArgKey::Positional(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for ArgKey {
    fn from(value: &str) -> Self {
        ArgKey::Named(value.to_string())
    }
}

impl From<String> for ArgKey {
    fn from(value: String) -> Self {
        ArgKey::Named(value)
    }
}

impl From<usize> for ArgKey {
    fn from(value: usize) -> Self {
        ArgKey::Positional(value)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A named-argument list whose keys have all been checked to be identifiers.
///
/// A later argument with the same name replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedArgs {
    args: IndexMap<String, Value>,
}

impl NamedArgs {
    /// Validate every key before keeping any of them.
    pub fn new<I, K, V>(args: I) -> CopyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgKey>,
        V: Into<Value>,
    {
        let mut validated = IndexMap::new();
        for (key, value) in args {
            match key.into() {
                ArgKey::Named(name) if is_identifier(&name) => {
                    validated.insert(name, value.into());
                }
                rejected => {
                    tracing::debug!(key = %rejected, "rejected named-argument key");
                    return Err(CopyError::invalid_argument_key(rejected.to_string()));
                }
            }
        }
        Ok(Self { args: validated })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// One copy source, consumed by a single copy call.
#[derive(Clone, Copy)]
pub enum CopySource<'a> {
    Object(&'a dyn PropertySource),
    Mapping(&'a dyn Mapping),
    NamedArgs(&'a NamedArgs),
}

impl CopySource<'_> {
    pub(crate) fn fetch(&self, name: &str) -> Option<Value> {
        match self {
            CopySource::Object(source) => source.read_property(name),
            CopySource::Mapping(source) => source.lookup(name).cloned(),
            CopySource::NamedArgs(args) => args.get(name).cloned(),
        }
    }

    /// An empty mapping or argument list has nothing to copy.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            CopySource::Object(_) => false,
            CopySource::Mapping(source) => source.is_empty(),
            CopySource::NamedArgs(args) => args.is_empty(),
        }
    }

    pub(crate) fn shape(&self) -> &'static str {
        match self {
            CopySource::Object(_) => "object",
            CopySource::Mapping(_) => "mapping",
            CopySource::NamedArgs(_) => "named_args",
        }
    }
}
