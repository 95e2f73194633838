//! CLI command implementations
//!
//! `serve` boots in a fixed order: config, logging, schema directory,
//! model registry (with the `apps` model), HTTP server.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::describe::{all_descriptions, field_descriptors, DescriptionMap, FieldDescriptors};
use crate::docs::{validation_messages, ApiDoc, TableDoc};
use crate::http_server::{HttpServer, ServerState};
use crate::model::ModelRegistry;
use crate::observability::{init_logging, Event};
use crate::schema::{SchemaFile, SchemaLoader};

use super::args::{Cli, Command, OutputFormat};
use super::errors::{CliError, CliResult};
use super::io::{to_pretty_json, write_stdout};

/// `describe --format json` output
#[derive(Debug, Serialize)]
pub struct SchemaDescription {
    pub model: String,
    pub descriptions: DescriptionMap,
    pub fields: FieldDescriptors,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Describe { file, format } => {
            let rendered = describe(&file, format)?;
            write_stdout(&rendered)
        }
        Command::Serve { config } => serve(config.as_deref()),
    }
}

/// Renders the documentation of one schema file
pub fn describe(path: &Path, format: OutputFormat) -> CliResult<String> {
    let file = SchemaFile::read(path)?;
    let schema = file.build()?;

    match format {
        OutputFormat::Table => Ok(TableDoc::generate(&schema, &file.name).document_text),
        OutputFormat::Api => Ok(ApiDoc::generate(&schema, &file.name).document_text),
        OutputFormat::Json => to_pretty_json(&SchemaDescription {
            model: file.name.clone(),
            descriptions: all_descriptions(&schema),
            fields: field_descriptors(&schema),
        }),
        OutputFormat::Messages => to_pretty_json(&validation_messages(&schema)),
    }
}

/// Loads every schema in the configured directory into a new registry
pub fn load_registry(config: &Config) -> CliResult<ModelRegistry> {
    let mut loader = SchemaLoader::new(&config.schema_dir);
    let count = loader.load_all()?;

    tracing::info!(
        event = %Event::SchemasLoaded,
        count,
        dir = %config.schema_dir.display(),
        "Schemas loaded"
    );

    let registry = ModelRegistry::new(config.registry_config());
    for (name, schema) in loader.iter() {
        registry.model(name, Arc::clone(schema));
    }
    Ok(registry)
}

/// Start the HTTP server
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    init_logging(config.log_json);

    tracing::info!(
        event = %Event::ConfigLoaded,
        schema_dir = %config.schema_dir.display(),
        sync_indexes = config.sync_indexes,
        slow_operation_ms = config.slow_operation_ms,
        "Configuration loaded"
    );

    let registry = load_registry(&config)?;
    let state = ServerState::new(Arc::new(registry));
    let server = HttpServer::with_config(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const APP_SCHEMA: &str = r#"{
        "name": "apps",
        "description": "App schema",
        "fields": {
            "teamId": {"type": "reference", "required": true, "description": "Team ID"},
            "name": {"type": "string", "required": true, "description": "App name"},
            "avatar": {"type": "string", "default": {"value": "/icon/logo.svg"}}
        }
    }"#;

    fn write_schema(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("apps.json");
        fs::write(&path, APP_SCHEMA).unwrap();
        path
    }

    #[test]
    fn test_describe_table() {
        let dir = TempDir::new().unwrap();
        let text = describe(&write_schema(&dir), OutputFormat::Table).unwrap();

        assert!(text.contains("=== apps table design ==="));
        assert!(text.contains("Description: App schema"));
        assert!(text.contains("teamId"));
        assert!(!text.contains("avatar"));
    }

    #[test]
    fn test_describe_json() {
        let dir = TempDir::new().unwrap();
        let text = describe(&write_schema(&dir), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["model"], "apps");
        assert_eq!(value["descriptions"]["__schema__"], "App schema");
        assert_eq!(value["descriptions"]["name"], "App name");
        assert!(value["descriptions"].get("avatar").is_none());
        assert_eq!(value["fields"]["avatar"]["semanticType"], "string");
    }

    #[test]
    fn test_describe_messages() {
        let dir = TempDir::new().unwrap();
        let text = describe(&write_schema(&dir), OutputFormat::Messages).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["teamId.required"], "Team ID is required");
    }

    #[test]
    fn test_describe_missing_file() {
        let err = describe(Path::new("/nonexistent/apps.json"), OutputFormat::Table).unwrap_err();
        assert_eq!(err.code_str(), "SCHEMADOC_CLI_SCHEMA_ERROR");
    }

    #[test]
    fn test_load_registry() {
        let dir = TempDir::new().unwrap();
        write_schema(&dir);
        let config = Config {
            schema_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let registry = load_registry(&config).unwrap();
        assert_eq!(registry.names(), vec!["apps".to_string()]);
    }
}
