//! Constructed schema and its per-field metadata nodes
//!
//! Construction materializes one [`SchemaPath`] per field in declared order:
//! - an implicit `_id` first, unless the definition declares one
//! - `nested` groups contribute their children as dotted paths
//! - the `__v` version key last
//!
//! Schema and field descriptions are first-class optional attributes. They
//! are never set by construction; see `describe::annotate`.

use std::collections::HashSet;

use serde_json::Value;

use super::types::{
    DefaultValue, FieldDefinition, FieldType, IndexSpec, SchemaDefinition, SchemaOptions,
};

/// Canonical identity field
pub const ID_FIELD: &str = "_id";

/// Document version key
pub const VERSION_KEY: &str = "__v";

/// Per-field metadata node
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaPath {
    path: String,
    field_type: FieldType,
    required: bool,
    default: Option<DefaultValue>,
    enum_values: Option<Vec<String>>,
    description: Option<String>,
}

impl SchemaPath {
    fn from_definition(path: String, definition: &FieldDefinition) -> Self {
        Self {
            path,
            field_type: definition.field_type.clone(),
            required: definition.required,
            default: definition.default.clone(),
            enum_values: definition.enum_values.clone(),
            description: None,
        }
    }

    /// Full dotted path of the field
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Specific type tag, or `None` when the field accepts any value
    pub fn instance(&self) -> Option<&'static str> {
        match self.field_type {
            FieldType::Mixed => None,
            ref other => Some(other.type_name()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    /// Target collection of a reference field
    pub fn reference(&self) -> Option<&str> {
        match &self.field_type {
            FieldType::Reference { collection } => collection.as_deref(),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }
}

/// A constructed document schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    paths: Vec<SchemaPath>,
    options: SchemaOptions,
    description: Option<String>,
    indexes: Vec<IndexSpec>,
}

impl Schema {
    /// Constructs a schema from a field definition mapping.
    pub fn new(definition: &SchemaDefinition, options: SchemaOptions) -> Self {
        let mut paths = Vec::with_capacity(definition.len() + 2);

        if options.id && !definition.contains(ID_FIELD) {
            paths.push(SchemaPath::from_definition(
                ID_FIELD.to_string(),
                &FieldDefinition::new(FieldType::Reference { collection: None }),
            ));
        }

        for (path, field) in definition.flatten() {
            paths.push(SchemaPath::from_definition(path, field));
        }

        if options.version_key && !paths.iter().any(|p| p.path == VERSION_KEY) {
            paths.push(SchemaPath::from_definition(
                VERSION_KEY.to_string(),
                &FieldDefinition::number().with_default(Value::from(0)),
            ));
        }

        Self {
            paths,
            options,
            description: None,
            indexes: Vec::new(),
        }
    }

    /// Looks up the metadata node for a field path
    pub fn path(&self, name: &str) -> Option<&SchemaPath> {
        self.paths.iter().find(|p| p.path == name)
    }

    /// Mutable metadata node lookup
    pub fn path_mut(&mut self, name: &str) -> Option<&mut SchemaPath> {
        self.paths.iter_mut().find(|p| p.path == name)
    }

    /// Enumerates metadata nodes in declared order
    pub fn each_path(&self) -> impl Iterator<Item = &SchemaPath> {
        self.paths.iter()
    }

    /// True if any materialized path lies under `prefix.`
    pub fn has_paths_under(&self, prefix: &str) -> bool {
        self.paths.iter().any(|p| {
            p.path
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|rest| !rest.is_empty())
        })
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Declares a secondary index
    pub fn index(&mut self, spec: IndexSpec) -> &mut Self {
        self.indexes.push(spec);
        self
    }

    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.options.id && self.path(ID_FIELD).is_none() {
            return Err(format!("Schema must define an '{}' field", ID_FIELD));
        }

        let mut seen = HashSet::new();
        for path in &self.paths {
            if path.path.is_empty() {
                return Err("Field names must not be empty".into());
            }
            if !seen.insert(path.path.as_str()) {
                return Err(format!("Duplicate field path '{}'", path.path));
            }
        }

        for index in &self.indexes {
            if index.keys.is_empty() {
                return Err("Index must declare at least one key".into());
            }
            for (key, _) in &index.keys {
                if self.path(key).is_none() && !self.has_paths_under(key) {
                    return Err(format!("Index key '{}' is not a declared field", key));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::IndexOrder;

    fn sample_definition() -> SchemaDefinition {
        SchemaDefinition::new()
            .field("name", FieldDefinition::string().required().describe("app name"))
            .field("teamId", FieldDefinition::reference("teams").required())
            .field("avatar", FieldDefinition::string())
    }

    #[test]
    fn test_paths_in_declared_order_with_implicit_fields() {
        let schema = Schema::new(&sample_definition(), SchemaOptions::default());
        let names: Vec<_> = schema.each_path().map(|p| p.path()).collect();
        assert_eq!(names, vec!["_id", "name", "teamId", "avatar", "__v"]);
    }

    #[test]
    fn test_construction_ignores_descriptions() {
        let schema = Schema::new(&sample_definition(), SchemaOptions::default());
        assert_eq!(schema.description(), None);
        assert_eq!(schema.path("name").unwrap().description(), None);
    }

    #[test]
    fn test_options_disable_implicit_fields() {
        let options = SchemaOptions {
            id: false,
            version_key: false,
        };
        let schema = Schema::new(&sample_definition(), options);
        let names: Vec<_> = schema.each_path().map(|p| p.path()).collect();
        assert_eq!(names, vec!["name", "teamId", "avatar"]);
    }

    #[test]
    fn test_declared_id_is_kept_in_place() {
        let definition = SchemaDefinition::new()
            .field("name", FieldDefinition::string())
            .field("_id", FieldDefinition::string().required());
        let schema = Schema::new(&definition, SchemaOptions::default());
        let names: Vec<_> = schema.each_path().map(|p| p.path()).collect();
        assert_eq!(names, vec!["name", "_id", "__v"]);
        assert_eq!(schema.path("_id").unwrap().instance(), Some("string"));
    }

    #[test]
    fn test_nested_group_has_no_node() {
        let definition = SchemaDefinition::new().field(
            "trigger",
            FieldDefinition::nested(
                SchemaDefinition::new().field("cron", FieldDefinition::string()),
            ),
        );
        let schema = Schema::new(&definition, SchemaOptions::default());
        assert!(schema.path("trigger").is_none());
        assert!(schema.path("trigger.cron").is_some());
        assert!(schema.has_paths_under("trigger"));
        assert!(!schema.has_paths_under("trig"));
    }

    #[test]
    fn test_path_attributes() {
        let schema = Schema::new(&sample_definition(), SchemaOptions::default());
        let team = schema.path("teamId").unwrap();
        assert!(team.is_required());
        assert_eq!(team.reference(), Some("teams"));
        assert_eq!(team.instance(), Some("reference"));

        let version = schema.path("__v").unwrap();
        assert_eq!(version.default_value().unwrap().resolve(), Value::from(0));
    }

    #[test]
    fn test_mixed_has_no_instance() {
        let definition = SchemaDefinition::new().field("extra", FieldDefinition::mixed());
        let schema = Schema::new(&definition, SchemaOptions::default());
        assert_eq!(schema.path("extra").unwrap().instance(), None);
    }

    #[test]
    fn test_validate_structure() {
        let mut schema = Schema::new(&sample_definition(), SchemaOptions::default());
        assert!(schema.validate_structure().is_ok());

        schema.index(IndexSpec::new([("missing", IndexOrder::Ascending)]));
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn test_validate_structure_requires_id() {
        let options = SchemaOptions {
            id: true,
            version_key: true,
        };
        let definition = SchemaDefinition::new().field("name", FieldDefinition::string());
        let mut schema = Schema::new(&definition, options);
        schema.paths.retain(|p| p.path != ID_FIELD);
        assert!(schema.validate_structure().is_err());
    }
}
