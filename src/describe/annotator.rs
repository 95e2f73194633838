//! Attaching descriptions to a freshly constructed schema

use crate::schema::{Schema, SchemaDefinition, SchemaOptions};

/// Options for [`annotate`].
///
/// The schema-level description is mandatory by convention. It is not
/// checked for emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateOptions {
    pub description: String,
    pub schema: SchemaOptions,
}

impl AnnotateOptions {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            schema: SchemaOptions::default(),
        }
    }

    pub fn with_schema_options(mut self, schema: SchemaOptions) -> Self {
        self.schema = schema;
        self
    }
}

/// Constructs a schema and attaches the schema description and every
/// supplied field description to the matching metadata node.
///
/// Only top-level entries of `definition` are considered. Entries without a
/// (non-empty) description stay unannotated, and entries that did not
/// materialize a node (e.g. `nested` groups) are skipped.
pub fn annotate(definition: &SchemaDefinition, options: AnnotateOptions) -> Schema {
    let mut schema = Schema::new(definition, options.schema);
    schema.set_description(options.description);

    for (name, field) in definition.iter() {
        let Some(description) = field.description.as_deref().filter(|d| !d.is_empty()) else {
            continue;
        };
        if let Some(node) = schema.path_mut(name) {
            node.set_description(description);
        }
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDefinition;

    #[test]
    fn test_annotate_attaches_in_place() {
        let definition = SchemaDefinition::new()
            .field("name", FieldDefinition::string().describe("app name"))
            .field("intro", FieldDefinition::string());
        let schema = annotate(&definition, AnnotateOptions::new("App schema"));

        assert_eq!(schema.description(), Some("App schema"));
        assert_eq!(schema.path("name").unwrap().description(), Some("app name"));
        assert_eq!(schema.path("intro").unwrap().description(), None);
    }

    #[test]
    fn test_empty_field_description_is_not_attached() {
        let definition =
            SchemaDefinition::new().field("name", FieldDefinition::string().describe(""));
        let schema = annotate(&definition, AnnotateOptions::new("App schema"));
        assert_eq!(schema.path("name").unwrap().description(), None);
    }

    #[test]
    fn test_nested_group_description_is_skipped() {
        let definition = SchemaDefinition::new().field(
            "trigger",
            FieldDefinition::nested(
                SchemaDefinition::new().field("cron", FieldDefinition::string()),
            )
            .describe("trigger config"),
        );
        let schema = annotate(&definition, AnnotateOptions::new("s"));
        assert!(schema.path("trigger").is_none());
        assert_eq!(schema.path("trigger.cron").unwrap().description(), None);
    }

    #[test]
    fn test_annotation_keeps_construction_semantics() {
        let definition = SchemaDefinition::new()
            .field("name", FieldDefinition::string().required().describe("app name"));
        let annotated = annotate(&definition, AnnotateOptions::new("s"));
        let plain = Schema::new(&definition, SchemaOptions::default());

        let a = annotated.path("name").unwrap();
        let p = plain.path("name").unwrap();
        assert_eq!(a.field_type(), p.field_type());
        assert_eq!(a.is_required(), p.is_required());
        assert_eq!(
            annotated.each_path().map(|p| p.path()).collect::<Vec<_>>(),
            plain.each_path().map(|p| p.path()).collect::<Vec<_>>()
        );
    }
}
