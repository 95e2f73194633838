//! Schema file loading
//!
//! - Schema files live at `<schema_dir>/schema_<name>.json`
//! - One file per named schema; names are unique
//! - Files are read in sorted path order so registration is deterministic
//! - Malformed files abort loading (FATAL)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::schema::Schema;
use super::types::{IndexSpec, SchemaDefinition, SchemaOptions};
use crate::describe::{annotate, AnnotateOptions};

/// On-disk schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Model / collection name
    pub name: String,
    /// Schema-level description
    pub description: String,
    #[serde(default)]
    pub options: SchemaOptions,
    /// Field definitions in declared order
    pub fields: SchemaDefinition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexSpec>,
}

impl SchemaFile {
    /// Reads and parses a single schema file.
    pub fn read(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })
    }

    /// Builds the annotated schema described by this file.
    pub fn build(&self) -> SchemaResult<Schema> {
        let options =
            AnnotateOptions::new(self.description.clone()).with_schema_options(self.options.clone());
        let mut schema = annotate(&self.fields, options);
        for index in &self.indexes {
            schema.index(index.clone());
        }

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&self.name, e))?;

        Ok(schema)
    }
}

/// Reads schema files from disk and keeps an in-memory registry by name.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaLoader {
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            schemas: HashMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory is created and yields no schemas.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let file = SchemaFile::read(&path)?;
            let schema = file.build()?;
            self.register(&file.name, schema)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Registers a schema under a name. Names are unique.
    pub fn register(&mut self, name: &str, schema: Schema) -> SchemaResult<Arc<Schema>> {
        if self.schemas.contains_key(name) {
            return Err(SchemaError::duplicate_schema(name));
        }

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(name, e))?;

        let schema = Arc::new(schema);
        self.schemas.insert(name.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Like [`SchemaLoader::get`], failing with `SCHEMA_UNKNOWN`.
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(name).ok_or_else(|| SchemaError::unknown_schema(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }

    /// Iterates registered schemas (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Schema>)> {
        self.schemas.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Writes a schema file to the schema directory.
    ///
    /// Existing files are never overwritten.
    pub fn save_schema(&self, file: &SchemaFile) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("schema_{}.json", file.name));
        if path.exists() {
            return Err(SchemaError::duplicate_schema(&file.name));
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(file).map_err(|e| {
            SchemaError::malformed_schema(&file.name, format!("Failed to serialize schema: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::FieldDefinition;
    use tempfile::TempDir;

    fn sample_file() -> SchemaFile {
        SchemaFile {
            name: "apps".into(),
            description: "App schema".into(),
            options: SchemaOptions::default(),
            fields: SchemaDefinition::new()
                .field("name", FieldDefinition::string().required().describe("app name"))
                .field("avatar", FieldDefinition::string()),
            indexes: Vec::new(),
        }
    }

    #[test]
    fn test_build_attaches_descriptions() {
        let schema = sample_file().build().unwrap();
        assert_eq!(schema.description(), Some("App schema"));
        assert_eq!(schema.path("name").unwrap().description(), Some("app name"));
        assert_eq!(schema.path("avatar").unwrap().description(), None);
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register("apps", sample_file().build().unwrap()).unwrap();

        assert!(loader.exists("apps"));
        assert!(loader.get("apps").is_some());
        assert_eq!(loader.require("missing").unwrap_err().code().code(), "SCHEMA_UNKNOWN");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register("apps", sample_file().build().unwrap()).unwrap();

        let result = loader.register("apps", sample_file().build().unwrap());
        assert_eq!(result.unwrap_err().code().code(), "SCHEMA_DUPLICATE");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path().join("schemas"));
        loader.save_schema(&sample_file()).unwrap();

        let mut reloaded = SchemaLoader::new(temp_dir.path().join("schemas"));
        assert_eq!(reloaded.load_all().unwrap(), 1);
        let schema = reloaded.get("apps").unwrap();
        assert_eq!(schema.path("name").unwrap().description(), Some("app name"));
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());
        loader.save_schema(&sample_file()).unwrap();
        assert!(loader.save_schema(&sample_file()).is_err());
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path().join("absent"));
        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("schema_bad.json"), "{ not json").unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert!(err.is_fatal());
    }
}
