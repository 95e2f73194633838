//! Read-only description queries
//!
//! Every query walks the schema again; nothing is cached.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::schema::{Schema, ID_FIELD};

/// Reserved key carrying the schema-level description in a [`DescriptionMap`]
pub const SCHEMA_SENTINEL: &str = "__schema__";

/// Prefix marking internal fields
pub const INTERNAL_PREFIX: char = '_';

/// Type tag reported when a field has no specific type
pub const MIXED_TYPE: &str = "mixed";

/// Anything that exposes a constructed schema
pub trait SchemaSource {
    fn schema(&self) -> &Schema;
}

impl SchemaSource for Schema {
    fn schema(&self) -> &Schema {
        self
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for Arc<T> {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }
}

/// Ordered mapping of field name (or [`SCHEMA_SENTINEL`]) to description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionMap {
    entries: Vec<(String, String)>,
}

impl DescriptionMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Schema-level entry, if present
    pub fn schema_description(&self) -> Option<&str> {
        self.get(SCHEMA_SENTINEL)
    }

    /// All entries including the sentinel, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field entries only
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| *k != SCHEMA_SENTINEL)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DescriptionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Normalized per-field description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(skip)]
    pub name: String,
    pub semantic_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered field descriptors keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptors {
    entries: Vec<FieldDescriptor>,
}

impl FieldDescriptors {
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldDescriptors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for descriptor in &self.entries {
            map.serialize_entry(&descriptor.name, descriptor)?;
        }
        map.end()
    }
}

/// Schema description under [`SCHEMA_SENTINEL`] followed by every described
/// field in declared order. Undescribed fields are omitted.
pub fn all_descriptions<S: SchemaSource + ?Sized>(source: &S) -> DescriptionMap {
    let schema = source.schema();
    let mut entries = Vec::new();

    if let Some(description) = schema.description().filter(|d| !d.is_empty()) {
        entries.push((SCHEMA_SENTINEL.to_string(), description.to_string()));
    }

    for path in schema.each_path() {
        if let Some(description) = path.description() {
            entries.push((path.path().to_string(), description.to_string()));
        }
    }

    DescriptionMap { entries }
}

/// Description of one field. `None` when the field is undescribed or unknown.
pub fn field_description<'a, S: SchemaSource + ?Sized>(
    source: &'a S,
    field: &str,
) -> Option<&'a str> {
    source.schema().path(field).and_then(|p| p.description())
}

/// The stored schema description, verbatim. An empty description is
/// returned as `Some("")` even though [`all_descriptions`] omits it.
pub fn schema_description<S: SchemaSource + ?Sized>(source: &S) -> Option<&str> {
    source.schema().description()
}

/// One descriptor per field path in declared order, skipping internal
/// fields other than `_id`.
pub fn field_descriptors<S: SchemaSource + ?Sized>(source: &S) -> FieldDescriptors {
    let entries = source
        .schema()
        .each_path()
        .filter(|p| !is_internal(p.path()))
        .map(|p| FieldDescriptor {
            name: p.path().to_string(),
            semantic_type: p.instance().unwrap_or(MIXED_TYPE).to_string(),
            required: p.is_required(),
            description: p.description().map(str::to_string),
        })
        .collect();

    FieldDescriptors { entries }
}

/// Internal fields start with `_`; the identity field is never internal.
pub fn is_internal(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX) && name != ID_FIELD
}
