//! Shared server state

use std::sync::Arc;

use super::config::IdentityConfig;
use crate::app::AppService;
use crate::model::ModelRegistry;

/// State shared across handlers
#[derive(Debug, Clone)]
pub struct ServerState {
    registry: Arc<ModelRegistry>,
    apps: AppService,
    identity: IdentityConfig,
}

impl ServerState {
    /// Registers the `apps` model in `registry` if needed. Identity headers
    /// are untrusted until [`ServerState::with_identity`] says otherwise.
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        let apps = AppService::from_registry(&registry);
        Self {
            registry,
            apps,
            identity: IdentityConfig::default(),
        }
    }

    pub fn with_identity(mut self, identity: IdentityConfig) -> Self {
        self.identity = identity;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn apps(&self) -> &AppService {
        &self.apps
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }
}
