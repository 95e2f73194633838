//! HTTP Server Configuration
//!
//! Bind address, CORS origins and caller identification.
//!
//! Identity headers are untrusted by default: the server carries no login
//! of its own, so `x-team-id` / `x-tmb-id` / `x-permission` are only honored
//! when an authenticating proxy in front of it sets them
//! (`identity.trust_headers`). Root access requires the configured
//! `identity.root_key`, sent as `x-root-key`.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// How callers of team-scoped routes are identified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Accept team/member/permission headers as the caller identity
    #[serde(default)]
    pub trust_headers: bool,

    /// Shared key granting root access. Root is unavailable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_key: Option<String>,
}

impl IdentityConfig {
    /// Honors identity headers, no root key
    pub fn trusted() -> Self {
        Self {
            trust_headers: true,
            root_key: None,
        }
    }

    pub fn with_root_key(mut self, key: impl Into<String>) -> Self {
        self.root_key = Some(key.into());
        self
    }

    /// Constant-time check of a presented root key
    pub fn is_root_key(&self, candidate: &str) -> bool {
        match &self.root_key {
            Some(key) => key.as_bytes().ct_eq(candidate.as_bytes()).into(),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub identity: IdentityConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            identity: IdentityConfig::default(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, identity: IdentityConfig) -> Self {
        self.identity = identity;
        self
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("http.port must not be 0".into());
        }
        if self.identity.root_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err("http.identity.root_key must not be empty".into());
        }
        Ok(())
    }
}
