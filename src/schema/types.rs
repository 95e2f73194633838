//! Field definition types
//!
//! Supported types:
//! - string, number, boolean, date
//! - reference: id of a document in another collection
//! - mixed: any JSON value
//! - array: homogeneous array with element type
//! - object: embedded sub-document (one metadata node)
//! - nested: plain grouping of child paths (no node of its own)

use std::fmt;

use chrono::Utc;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Declared data type of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Any JSON number
    Number,
    /// Boolean
    Boolean,
    /// RFC 3339 timestamp
    Date,
    /// Id of a document, optionally naming the target collection
    Reference {
        #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
        collection: Option<String>,
    },
    /// Any value
    Mixed,
    /// Homogeneous array
    Array {
        #[serde(default = "mixed_element")]
        element_type: Box<FieldType>,
    },
    /// Embedded sub-document
    Object { fields: SchemaDefinition },
    /// Grouping of child paths
    Nested { fields: SchemaDefinition },
}

fn mixed_element() -> Box<FieldType> {
    Box::new(FieldType::Mixed)
}

impl FieldType {
    /// Returns the type tag used in descriptors and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Reference { .. } => "reference",
            FieldType::Mixed => "mixed",
            FieldType::Array { .. } => "array",
            FieldType::Object { .. } => "object",
            FieldType::Nested { .. } => "nested",
        }
    }

    /// Reference to a named collection
    pub fn reference(collection: impl Into<String>) -> Self {
        FieldType::Reference {
            collection: Some(collection.into()),
        }
    }

    /// Array of the given element type
    pub fn array_of(element_type: FieldType) -> Self {
        FieldType::Array {
            element_type: Box::new(element_type),
        }
    }
}

/// Default applied when a field is absent on insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// Current UTC time as an RFC 3339 string
    Now,
    /// A literal value
    Value(Value),
}

impl DefaultValue {
    /// Produces the concrete value for a new document
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Now => Value::String(Utc::now().to_rfc3339()),
            DefaultValue::Value(v) => v.clone(),
        }
    }
}

/// A single field definition as supplied at schema-definition time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must be present
    #[serde(default)]
    pub required: bool,
    /// Value used when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Allowed string values
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Human-readable description, documentation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDefinition {
    /// Optional field of the given type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            enum_values: None,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    pub fn mixed() -> Self {
        Self::new(FieldType::Mixed)
    }

    pub fn reference(collection: impl Into<String>) -> Self {
        Self::new(FieldType::reference(collection))
    }

    pub fn array(element_type: FieldType) -> Self {
        Self::new(FieldType::array_of(element_type))
    }

    pub fn object(fields: SchemaDefinition) -> Self {
        Self::new(FieldType::Object { fields })
    }

    pub fn nested(fields: SchemaDefinition) -> Self {
        Self::new(FieldType::Nested { fields })
    }

    /// Marks the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets a literal default
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Value(value));
        self
    }

    /// Defaults to the current time on insert
    pub fn default_now(mut self) -> Self {
        self.default = Some(DefaultValue::Now);
        self
    }

    /// Restricts the field to the given values
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches a description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered mapping from field name to definition.
///
/// Declaration order is preserved through construction, serialization and
/// deserialization. Inserting an existing name replaces the definition in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition {
    fields: Vec<(String, FieldDefinition)>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SchemaDefinition::insert`]
    pub fn field(mut self, name: impl Into<String>, definition: FieldDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Adds or replaces a field definition
    pub fn insert(&mut self, name: impl Into<String>, definition: FieldDefinition) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = definition,
            None => self.fields.push((name, definition)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates entries in declared order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.fields.iter().map(|(n, def)| (n.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattens `nested` groups into dotted paths, in declared order.
    ///
    /// Every other entry, including `object`, yields exactly one path.
    pub fn flatten(&self) -> Vec<(String, &FieldDefinition)> {
        let mut out = Vec::with_capacity(self.fields.len());
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a FieldDefinition)>) {
        for (name, def) in &self.fields {
            let path = crate::document::join_path(prefix, name);
            match &def.field_type {
                FieldType::Nested { fields } => fields.flatten_into(&path, out),
                _ => out.push((path, def)),
            }
        }
    }
}

impl<S: Into<String>> FromIterator<(S, FieldDefinition)> for SchemaDefinition {
    fn from_iter<I: IntoIterator<Item = (S, FieldDefinition)>>(iter: I) -> Self {
        let mut definition = SchemaDefinition::new();
        for (name, def) in iter {
            definition.insert(name, def);
        }
        definition
    }
}

impl Serialize for SchemaDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, def) in &self.fields {
            map.serialize_entry(name, def)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DefinitionVisitor;

        impl<'de> Visitor<'de> for DefinitionVisitor {
            type Value = SchemaDefinition;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to field definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut definition = SchemaDefinition::new();
                while let Some((name, def)) = access.next_entry::<String, FieldDefinition>()? {
                    definition.insert(name, def);
                }
                Ok(definition)
            }
        }

        deserializer.deserialize_map(DefinitionVisitor)
    }
}

/// Construction options for a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOptions {
    /// Materialize an implicit `_id` path when the definition lacks one
    #[serde(default = "enabled")]
    pub id: bool,
    /// Materialize the `__v` version key
    #[serde(default = "enabled")]
    pub version_key: bool,
}

fn enabled() -> bool {
    true
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            id: true,
            version_key: true,
        }
    }
}

/// Sort direction of an index key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum IndexOrder {
    Ascending,
    Descending,
}

impl TryFrom<i8> for IndexOrder {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IndexOrder::Ascending),
            -1 => Ok(IndexOrder::Descending),
            other => Err(format!("index direction must be 1 or -1, got {}", other)),
        }
    }
}

impl From<IndexOrder> for i8 {
    fn from(order: IndexOrder) -> i8 {
        match order {
            IndexOrder::Ascending => 1,
            IndexOrder::Descending => -1,
        }
    }
}

/// Partial index condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFilter {
    /// Only documents where the path exists are indexed
    Exists(String),
}

/// Declared secondary index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Key paths with direction, in significance order
    pub keys: Vec<(String, IndexOrder)>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_filter: Option<PartialFilter>,
}

impl IndexSpec {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = (S, IndexOrder)>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(|(k, o)| (k.into(), o)).collect(),
            unique: false,
            partial_filter: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn partial_exists(mut self, path: impl Into<String>) -> Self {
        self.partial_filter = Some(PartialFilter::Exists(path.into()));
        self
    }

    /// Conventional index name, e.g. `teamId_1_updateTime_-1`
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|(k, o)| format!("{}_{}", k, i8::from(*o)))
            .collect::<Vec<_>>()
            .join("_")
    }
}
