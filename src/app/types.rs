//! App domain types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Collection holding apps
pub const APP_COLLECTION: &str = "apps";
/// Collection holding teams
pub const TEAM_COLLECTION: &str = "teams";
/// Collection holding team members
pub const TEAM_MEMBER_COLLECTION: &str = "team_members";

/// Kind of app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppType {
    Folder,
    Simple,
    #[default]
    Workflow,
    Plugin,
    HttpPlugin,
    ToolSet,
    Tool,
    Gate,
}

impl AppType {
    pub const ALL: [AppType; 8] = [
        AppType::Folder,
        AppType::Simple,
        AppType::Workflow,
        AppType::Plugin,
        AppType::HttpPlugin,
        AppType::ToolSet,
        AppType::Tool,
        AppType::Gate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Folder => "folder",
            AppType::Simple => "simple",
            AppType::Workflow => "workflow",
            AppType::Plugin => "plugin",
            AppType::HttpPlugin => "httpPlugin",
            AppType::ToolSet => "toolSet",
            AppType::Tool => "tool",
            AppType::Gate => "gate",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown app type '{}'", s))
    }
}

/// Permission level a caller holds on an app
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Permission {
    #[default]
    None,
    Read,
    Write,
    Owner,
}

impl Permission {
    pub fn has_read(&self) -> bool {
        *self >= Permission::Read
    }

    pub fn has_write(&self) -> bool {
        *self >= Permission::Write
    }

    pub fn is_owner(&self) -> bool {
        *self == Permission::Owner
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Permission::None),
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "owner" => Ok(Permission::Owner),
            other => Err(format!("unknown permission '{}'", other)),
        }
    }
}

/// Identity of the caller of an app operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caller {
    pub team_id: String,
    pub tmb_id: String,
    pub permission: Permission,
    pub is_root: bool,
}

impl Caller {
    pub fn member(team_id: impl Into<String>, tmb_id: impl Into<String>, permission: Permission) -> Self {
        Self {
            team_id: team_id.into(),
            tmb_id: tmb_id.into(),
            permission,
            is_root: false,
        }
    }

    pub fn root() -> Self {
        Self {
            is_root: true,
            permission: Permission::Owner,
            ..Default::default()
        }
    }
}

/// Effective permission flags reported with an app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPermission {
    pub has_read_per: bool,
    pub has_write_per: bool,
    pub is_owner: bool,
}

impl From<Permission> for AppPermission {
    fn from(permission: Permission) -> Self {
        Self {
            has_read_per: permission.has_read(),
            has_write_per: permission.has_write(),
            is_owner: permission.is_owner(),
        }
    }
}
