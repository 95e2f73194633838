//! Table design document

use serde::Serialize;

use super::NAME_WIDTH;
use crate::describe::{all_descriptions, schema_description, SchemaSource};

const SEPARATOR_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableField {
    pub field_name: String,
    pub description: String,
}

/// Table design document for one collection. Only described fields appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDoc {
    pub table_name: String,
    pub table_description: Option<String>,
    pub fields: Vec<TableField>,
    pub document_text: String,
}

impl TableDoc {
    pub fn generate<S: SchemaSource + ?Sized>(source: &S, table: &str) -> Self {
        let descriptions = all_descriptions(source);
        let table_description = schema_description(source)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let fields: Vec<TableField> = descriptions
            .fields()
            .map(|(name, description)| TableField {
                field_name: name.to_string(),
                description: description.to_string(),
            })
            .collect();

        let rows: String = fields
            .iter()
            .map(|field| {
                format!(
                    "{:<width$} | {}\n",
                    field.field_name,
                    field.description,
                    width = NAME_WIDTH
                )
            })
            .collect();

        let mut text = format!("\n=== {} table design ===\n", table);
        if let Some(description) = &table_description {
            text.push_str(&format!("Description: {}\n\n", description));
        }
        text.push_str("Fields:\n");
        text.push_str(&format!("{:<width$} | Description\n", "Field", width = NAME_WIDTH));
        text.push_str(&"-".repeat(SEPARATOR_WIDTH));
        text.push('\n');
        text.push_str(&rows);

        Self {
            table_name: table.to_string(),
            table_description,
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
            .field("teamId", FieldDefinition::reference("teams").describe("owning team id"))
            .field("avatar", FieldDefinition::string());
        annotate(&definition, AnnotateOptions::new("App schema"))
    }

    #[test]
    fn test_table_doc_rows_exclude_sentinel_and_undescribed() {
        let doc = TableDoc::generate(&schema(), "apps");

        assert_eq!(doc.table_description.as_deref(), Some("App schema"));
        assert_eq!(
            doc.fields,
            vec![TableField {
                field_name: "teamId".into(),
                description: "owning team id".into(),
            }]
        );
    }

    #[test]
    fn test_table_doc_text() {
        let doc = TableDoc::generate(&schema(), "apps");
        let expected = format!(
            "\n=== apps table design ===\nDescription: App schema\n\nFields:\n\
             Field                | Description\n{}\n\
             teamId               | owning team id\n",
            "-".repeat(50)
        );
        assert_eq!(doc.document_text, expected);
    }

    #[test]
    fn test_table_doc_without_description() {
        let definition = SchemaDefinition::new().field("name", FieldDefinition::string());
        let doc = TableDoc::generate(&Schema::new(&definition, Default::default()), "plain");

        assert_eq!(doc.table_description, None);
        assert!(doc.fields.is_empty());
        assert!(!doc.document_text.contains("Description:"));
    }
}
