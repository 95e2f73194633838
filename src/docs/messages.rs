//! Required-field validation messages

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::describe::{field_descriptors, SchemaSource};

/// Ordered `"<field>.required" -> message` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationMessages {
    entries: Vec<(String, String)>,
}

impl ValidationMessages {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ValidationMessages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One message per required, described field.
pub fn validation_messages<S: SchemaSource + ?Sized>(source: &S) -> ValidationMessages {
    let entries = field_descriptors(source)
        .iter()
        .filter(|d| d.required)
        .filter_map(|d| {
            let description = d.description.as_deref()?;
            Some((
                format!("{}.required", d.name),
                format!("{} is required", description),
            ))
        })
        .collect();

    ValidationMessages { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{annotate, AnnotateOptions};
    use crate::schema::{FieldDefinition, SchemaDefinition};

    #[test]
    fn test_messages_for_required_described_fields() {
        let definition = SchemaDefinition::new()
            .field(
                "teamId",
                FieldDefinition::reference("teams").required().describe("owning team id"),
            )
            .field("tmbId", FieldDefinition::reference("members").required())
            .field("intro", FieldDefinition::string().describe("app intro"));
        let schema = annotate(&definition, AnnotateOptions::new("App schema"));

        let messages = validation_messages(&schema);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages.get("teamId.required"),
            Some("owning team id is required")
        );
        assert_eq!(
            serde_json::to_value(&messages).unwrap(),
            serde_json::json!({"teamId.required": "owning team id is required"})
        );
    }
}
