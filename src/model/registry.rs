//! Process-wide model registry
//!
//! `model(name, schema)` returns the existing model when one is registered
//! under `name`, so a schema compiled twice still yields a single collection.
//! New models get a best-effort index sync whose failure is logged and
//! swallowed.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use super::model::Model;
use crate::describe::SchemaSource;
use crate::observability::{Event, DEFAULT_SLOW_OPERATION};
use crate::schema::Schema;

/// Settings applied to every model the registry creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub slow_operation: Duration,
    pub sync_indexes: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            slow_operation: DEFAULT_SLOW_OPERATION,
            sync_indexes: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct ModelRegistry {
    config: RegistryConfig,
    models: RwLock<HashMap<String, Model>>,
}

impl ModelRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            models: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the model registered under `name`, creating it from `schema`
    /// on first use. The schema is ignored when the model already exists.
    pub fn model(&self, name: &str, schema: impl Into<Arc<Schema>>) -> Model {
        if let Some(existing) = self.get(name) {
            return existing;
        }

        let model = {
            let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = models.get(name) {
                return existing.clone();
            }
            let model = Model::with_slow_operation(name, schema, self.config.slow_operation);
            models.insert(name.to_string(), model.clone());
            model
        };

        tracing::info!(
            event = %Event::ModelLoaded,
            collection = name,
            indexes = model.schema().indexes().len(),
            "Model loaded"
        );

        if self.config.sync_indexes {
            sync_indexes(&model);
        }
        model
    }

    pub fn get(&self, name: &str) -> Option<Model> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Registered model names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Best-effort index sync. Never fails the caller.
fn sync_indexes(model: &Model) {
    match model.sync_indexes() {
        Ok(names) => tracing::info!(
            event = %Event::IndexSyncComplete,
            collection = model.name(),
            indexes = ?names,
            "Indexes synced"
        ),
        Err(err) => tracing::error!(
            event = %Event::IndexSyncFailed,
            collection = model.name(),
            code = err.code(),
            error = %err,
            "Index sync failed"
        ),
    }
}
