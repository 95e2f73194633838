//! Service configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object is
//! a valid configuration. Environment overrides are applied afterwards:
//! - `SCHEMADOC_SYNC_INDEX=0` disables the index sync on model creation
//! - `SCHEMADOC_SLOW_OPERATION_MS` sets the slow-operation threshold
//! - `SCHEMADOC_ROOT_KEY` sets the HTTP root key

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::model::RegistryConfig;

pub const ENV_SYNC_INDEX: &str = "SCHEMADOC_SYNC_INDEX";
pub const ENV_SLOW_OPERATION_MS: &str = "SCHEMADOC_SLOW_OPERATION_MS";
pub const ENV_ROOT_KEY: &str = "SCHEMADOC_ROOT_KEY";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `*.json` schema files
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Operations slower than this are logged (default: 1000)
    #[serde(default = "default_slow_operation_ms")]
    pub slow_operation_ms: u64,

    /// Rebuild declared indexes when a model is created (default: true)
    #[serde(default = "default_sync_indexes")]
    pub sync_indexes: bool,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}

fn default_slow_operation_ms() -> u64 {
    1000
}

fn default_sync_indexes() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            slow_operation_ms: default_slow_operation_ms(),
            sync_indexes: default_sync_indexes(),
            log_json: false,
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Reads and validates a config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults, then applies the
    /// process environment.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(ENV_SYNC_INDEX).as_deref() == Some("0") {
            self.sync_indexes = false;
        }

        if let Some(raw) = lookup(ENV_SLOW_OPERATION_MS) {
            self.slow_operation_ms = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{} must be an integer, got '{}'",
                    ENV_SLOW_OPERATION_MS, raw
                ))
            })?;
        }

        if let Some(key) = lookup(ENV_ROOT_KEY) {
            self.http.identity.root_key = Some(key);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.schema_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("schema_dir must not be empty".into()));
        }
        self.http.validate().map_err(ConfigError::Invalid)
    }

    pub fn slow_operation(&self) -> Duration {
        Duration::from_millis(self.slow_operation_ms)
    }

    /// Settings for the model registry
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            slow_operation: self.slow_operation(),
            sync_indexes: self.sync_indexes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
        assert_eq!(config.slow_operation(), Duration::from_millis(1000));
        assert!(config.sync_indexes);
        assert!(!config.log_json);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"schema_dir": "/srv/schemas", "slow_operation_ms": 250, "http": {{"port": 9000}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.schema_dir, PathBuf::from("/srv/schemas"));
        assert_eq!(config.slow_operation_ms, 250);
        assert_eq!(config.http.port, 9000);
        assert!(config.sync_indexes);
    }

    #[test]
    fn test_load_errors() {
        let err = Config::load(Path::new("/nonexistent/schemadoc.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env_overrides(env(&[(ENV_SYNC_INDEX, "0"), (ENV_SLOW_OPERATION_MS, "50")]))
            .unwrap();
        assert!(!config.sync_indexes);
        assert_eq!(config.registry_config().slow_operation, Duration::from_millis(50));

        let config = Config::default()
            .with_env_overrides(env(&[(ENV_SYNC_INDEX, "1")]))
            .unwrap();
        assert!(config.sync_indexes);
    }

    #[test]
    fn test_root_key_from_env() {
        let config = Config::default()
            .with_env_overrides(env(&[(ENV_ROOT_KEY, "s3cret")]))
            .unwrap();
        assert!(config.http.identity.is_root_key("s3cret"));
        assert!(!config.http.identity.trust_headers);

        let err = Config::default()
            .with_env_overrides(env(&[(ENV_ROOT_KEY, "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_env_override() {
        let err = Config::default()
            .with_env_overrides(env(&[(ENV_SLOW_OPERATION_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
