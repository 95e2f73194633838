//! App schema: field definitions, descriptions and indexes

use serde_json::{json, Value};

use super::types::{AppType, APP_COLLECTION, TEAM_COLLECTION, TEAM_MEMBER_COLLECTION};
use crate::describe::{annotate, AnnotateOptions};
use crate::schema::{
    FieldDefinition, FieldType, IndexOrder, IndexSpec, Schema, SchemaDefinition,
};

pub const APP_SCHEMA_DESCRIPTION: &str = "App schema for managing applications within a team";

fn chat_config() -> SchemaDefinition {
    SchemaDefinition::new()
        .field("welcomeText", FieldDefinition::string())
        .field("variables", FieldDefinition::array(FieldType::Mixed))
        .field("questionGuide", FieldDefinition::mixed())
        .field("ttsConfig", FieldDefinition::mixed())
        .field("whisperConfig", FieldDefinition::mixed())
        .field("scheduledTriggerConfig", FieldDefinition::mixed())
        .field("chatInputGuide", FieldDefinition::mixed())
        .field("fileSelectConfig", FieldDefinition::mixed())
        .field("instruction", FieldDefinition::string())
        .field("autoExecute", FieldDefinition::mixed())
}

fn plugin_data() -> SchemaDefinition {
    SchemaDefinition::new()
        .field("nodeVersion", FieldDefinition::string())
        .field("pluginUniId", FieldDefinition::string())
        // http plugins only
        .field("apiSchemaStr", FieldDefinition::string())
        .field("customHeaders", FieldDefinition::string())
}

fn scheduled_trigger() -> SchemaDefinition {
    SchemaDefinition::new()
        .field("cronString", FieldDefinition::string())
        .field("timezone", FieldDefinition::string())
        .field("defaultPrompt", FieldDefinition::string())
}

/// Field definitions of the App schema, in declared order
pub fn app_definition() -> SchemaDefinition {
    let app_types = AppType::ALL.iter().map(AppType::as_str);

    SchemaDefinition::new()
        .field(
            "parentId",
            FieldDefinition::reference(APP_COLLECTION)
                .with_default(Value::Null)
                .describe("Parent app id, for app hierarchies"),
        )
        .field(
            "teamId",
            FieldDefinition::reference(TEAM_COLLECTION)
                .required()
                .describe("Owning team id, required"),
        )
        .field(
            "tmbId",
            FieldDefinition::reference(TEAM_MEMBER_COLLECTION)
                .required()
                .describe("Team member id of the creator"),
        )
        .field("name", FieldDefinition::string().required().describe("App name"))
        .field(
            "type",
            FieldDefinition::string()
                .with_default(json!(AppType::default().as_str()))
                .with_enum(app_types)
                .describe("App type, e.g. workflow or plugin"),
        )
        .field(
            "version",
            FieldDefinition::string()
                .with_enum(["v1", "v2"])
                .describe("App version"),
        )
        .field(
            "avatar",
            FieldDefinition::string()
                .with_default(json!("/icon/logo.svg"))
                .describe("App avatar"),
        )
        .field(
            "intro",
            FieldDefinition::string()
                .with_default(json!(""))
                .describe("App introduction"),
        )
        .field(
            "updateTime",
            FieldDefinition::date().default_now().describe("Last update time"),
        )
        .field(
            "teamTags",
            FieldDefinition::array(FieldType::String).describe("Team tags"),
        )
        // Saved but unpublished workflow
        .field(
            "modules",
            FieldDefinition::array(FieldType::Mixed)
                .with_default(json!([]))
                .describe("Workflow modules"),
        )
        .field(
            "edges",
            FieldDefinition::array(FieldType::Mixed)
                .with_default(json!([]))
                .describe("Connections between modules"),
        )
        .field(
            "chatConfig",
            FieldDefinition::object(chat_config()).describe("Chat configuration"),
        )
        .field(
            "pluginData",
            FieldDefinition::object(plugin_data()).describe("Plugin data"),
        )
        .field(
            "scheduledTriggerConfig",
            FieldDefinition::object(scheduled_trigger())
                .describe("Scheduled trigger configuration"),
        )
        .field(
            "scheduledTriggerNextTime",
            FieldDefinition::date().describe("Next scheduled trigger time"),
        )
        .field(
            "inited",
            FieldDefinition::boolean().describe("Whether the app has been initialized"),
        )
        .field(
            "inheritPermission",
            FieldDefinition::boolean()
                .with_default(json!(true))
                .describe("Whether permissions are inherited from the parent"),
        )
        // deprecated
        .field(
            "defaultPermission",
            FieldDefinition::number().describe("Default permission (deprecated)"),
        )
}

/// The annotated App schema with its indexes
pub fn app_schema() -> Schema {
    let mut schema = annotate(&app_definition(), AnnotateOptions::new(APP_SCHEMA_DESCRIPTION));
    schema
        .index(IndexSpec::new([("type", IndexOrder::Ascending)]))
        .index(IndexSpec::new([
            ("teamId", IndexOrder::Ascending),
            ("updateTime", IndexOrder::Descending),
        ]))
        .index(IndexSpec::new([
            ("teamId", IndexOrder::Ascending),
            ("type", IndexOrder::Ascending),
        ]))
        .index(
            IndexSpec::new([
                ("scheduledTriggerConfig", IndexOrder::Ascending),
                ("scheduledTriggerNextTime", IndexOrder::Descending),
            ])
            .partial_exists("scheduledTriggerConfig"),
        );
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{all_descriptions, field_description, field_descriptors};

    #[test]
    fn test_app_schema_is_valid() {
        assert!(app_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_every_declared_field_is_described() {
        let schema = app_schema();
        let descriptions = all_descriptions(&schema);

        assert_eq!(descriptions.schema_description(), Some(APP_SCHEMA_DESCRIPTION));
        assert_eq!(descriptions.fields().count(), app_definition().len());
        assert_eq!(field_description(&schema, "name"), Some("App name"));
        assert_eq!(field_description(&schema, "_id"), None);
    }

    #[test]
    fn test_descriptors() {
        let descriptors = field_descriptors(&app_schema());

        let team = descriptors.get("teamId").unwrap();
        assert_eq!(team.semantic_type, "reference");
        assert!(team.required);
        assert!(descriptors.get("_id").is_some());
        assert!(descriptors.get("__v").is_none());
        assert_eq!(descriptors.get("pluginData").unwrap().semantic_type, "object");
    }

    #[test]
    fn test_indexes() {
        let names: Vec<_> = app_schema().indexes().iter().map(IndexSpec::name).collect();
        assert_eq!(
            names,
            vec![
                "type_1",
                "teamId_1_updateTime_-1",
                "teamId_1_type_1",
                "scheduledTriggerConfig_1_scheduledTriggerNextTime_-1",
            ]
        );
    }
}
