//! App operations
//!
//! Permission rules for `detail`:
//! - root callers bypass the team check and hold owner permission
//! - the creating member holds owner permission on their own app
//! - callers from another team, or without read permission, are rejected
//! - callers without write permission get `modules` and `edges` emptied,
//!   except for `gate` apps

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{AppError, AppResult};
use super::schema::app_schema;
use super::types::{AppPermission, AppType, Caller, Permission, APP_COLLECTION};
use crate::describe::{wrap, Described};
use crate::model::{Model, ModelRegistry};

/// An app as returned to a caller, with the caller's effective permission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppDetail {
    #[serde(flatten)]
    pub app: Map<String, Value>,
    pub permission: AppPermission,
}

impl AppDetail {
    pub fn app_type(&self) -> Option<AppType> {
        self.app.get("type")?.as_str()?.parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct AppService {
    apps: Described<Model>,
}

impl AppService {
    pub fn new(model: Model) -> Self {
        Self { apps: wrap(model) }
    }

    /// Uses the registry's `apps` model, creating it on first use
    pub fn from_registry(registry: &ModelRegistry) -> Self {
        Self::new(registry.model(APP_COLLECTION, app_schema()))
    }

    /// The app model with description access
    pub fn apps(&self) -> &Described<Model> {
        &self.apps
    }

    pub fn detail(&self, app_id: &str, caller: &Caller) -> AppResult<AppDetail> {
        if app_id.is_empty() {
            return Err(AppError::MissingParams("appId".into()));
        }

        let app = match self.apps.model().find_by_id(app_id)? {
            Some(Value::Object(app)) => app,
            _ => return Err(AppError::NotFound(app_id.to_string())),
        };

        let permission = effective_permission(&app, caller)?;
        let mut detail = AppDetail {
            app,
            permission: permission.into(),
        };

        if !permission.has_write() && detail.app_type() != Some(AppType::Gate) {
            detail.app.insert("modules".into(), Value::Array(Vec::new()));
            detail.app.insert("edges".into(), Value::Array(Vec::new()));
        }

        Ok(detail)
    }
}

fn effective_permission(app: &Map<String, Value>, caller: &Caller) -> AppResult<Permission> {
    if caller.is_root {
        return Ok(Permission::Owner);
    }

    let team_id = app.get("teamId").and_then(Value::as_str);
    if team_id != Some(caller.team_id.as_str()) {
        return Err(AppError::Unauthorized("app belongs to another team".into()));
    }

    let is_creator = app.get("tmbId").and_then(Value::as_str) == Some(caller.tmb_id.as_str());
    let permission = if is_creator {
        Permission::Owner
    } else {
        caller.permission
    };

    if !permission.has_read() {
        return Err(AppError::Unauthorized("read permission required".into()));
    }
    Ok(permission)
}
