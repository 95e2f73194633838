//! API reference document

use serde::Serialize;

use super::NAME_WIDTH;
use crate::describe::{field_descriptors, schema_description, SchemaSource, INTERNAL_PREFIX};

/// Placeholder for a missing model or field description
pub const NO_DESCRIPTION: &str = "No description";

const TYPE_WIDTH: usize = 10;
const SEPARATOR_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// API reference for one model.
///
/// Every field starting with `_` is left out, including `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDoc {
    pub model_name: String,
    pub model_description: Option<String>,
    pub fields: Vec<ApiField>,
    pub document_text: String,
}

impl ApiDoc {
    pub fn generate<S: SchemaSource + ?Sized>(source: &S, model: &str) -> Self {
        let model_description = schema_description(source)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let fields: Vec<ApiField> = field_descriptors(source)
            .iter()
            .filter(|d| !d.name.starts_with(INTERNAL_PREFIX))
            .map(|d| ApiField {
                field_name: d.name.clone(),
                field_type: d.semantic_type.clone(),
                required: d.required,
                description: d.description.clone(),
            })
            .collect();

        let rows: String = fields
            .iter()
            .map(|field| {
                let marker = if field.required { "✓" } else { "✗" };
                format!(
                    "{:<name$} | {:<ty$} | {:<3} | {}\n",
                    field.field_name,
                    field.field_type,
                    marker,
                    field.description.as_deref().unwrap_or(NO_DESCRIPTION),
                    name = NAME_WIDTH,
                    ty = TYPE_WIDTH
                )
            })
            .collect();

        let mut text = format!("\n=== {} API reference ===\n", model);
        text.push_str(&format!(
            "Model: {}\n\n",
            model_description.as_deref().unwrap_or(NO_DESCRIPTION)
        ));
        text.push_str("Fields:\n");
        text.push_str(&format!(
            "{:<name$} | {:<ty$} | Required | Description\n",
            "Field",
            "Type",
            name = NAME_WIDTH,
            ty = TYPE_WIDTH
        ));
        text.push_str(&"-".repeat(SEPARATOR_WIDTH));
        text.push('\n');
        text.push_str(&rows);

        Self {
            model_name: model.to_string(),
            model_description,
            fields,
            document_text: text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{annotate, AnnotateOptions};
    use crate::schema::{FieldDefinition, Schema, SchemaDefinition};

    fn schema() -> Schema {
        let definition = SchemaDefinition::new()
            .field(
                "teamId",
                FieldDefinition::reference("teams").required().describe("owning team id"),
            )
            .field("name", FieldDefinition::string().required().describe("app name"))
            .field("avatar", FieldDefinition::string())
            .field("extra", FieldDefinition::mixed());
        annotate(&definition, AnnotateOptions::new("App schema"))
    }

    #[test]
    fn test_api_doc_skips_all_underscore_fields() {
        let doc = ApiDoc::generate(&schema(), "App");
        let names: Vec<_> = doc.fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["teamId", "name", "avatar", "extra"]);
    }

    #[test]
    fn test_api_doc_rows() {
        let doc = ApiDoc::generate(&schema(), "App");

        assert!(doc.document_text.contains("=== App API reference ==="));
        assert!(doc.document_text.contains("Model: App schema\n"));
        assert!(doc
            .document_text
            .contains("teamId               | reference  | ✓   | owning team id\n"));
        assert!(doc
            .document_text
            .contains("name                 | string     | ✓   | app name\n"));
        assert!(doc
            .document_text
            .contains("avatar               | string     | ✗   | No description\n"));
        assert!(doc
            .document_text
            .contains("extra                | mixed      | ✗   | No description\n"));
    }

    #[test]
    fn test_api_doc_full_text() {
        let definition = SchemaDefinition::new()
            .field("name", FieldDefinition::string().required().describe("app name"))
            .field("intro", FieldDefinition::string());
        let schema = annotate(&definition, AnnotateOptions::new("App schema"));
        let doc = ApiDoc::generate(&schema, "App");

        let expected = format!(
            "\n=== App API reference ===\nModel: App schema\n\nFields:\n\
             Field                | Type       | Required | Description\n{}\n\
             name                 | string     | ✓   | app name\n\
             intro                | string     | ✗   | No description\n",
            "-".repeat(60)
        );
        assert_eq!(doc.document_text, expected);
    }

    #[test]
    fn test_api_doc_without_model_description() {
        let definition = SchemaDefinition::new().field("name", FieldDefinition::string());
        let doc = ApiDoc::generate(&Schema::new(&definition, Default::default()), "Plain");

        assert_eq!(doc.model_description, None);
        assert!(doc.document_text.contains("Model: No description\n"));
    }
}
