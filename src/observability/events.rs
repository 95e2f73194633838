//! Observable events
//!
//! Events are explicit and typed; the string form is the value of the
//! `event` field on every log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Schema files loaded
    SchemasLoaded,
    /// HTTP server listening
    ServerStart,

    // Models
    /// Model compiled and registered
    ModelLoaded,
    /// Model operation exceeded the slow threshold
    SlowOperation,

    // Indexes
    /// Declared indexes rebuilt
    IndexSyncComplete,
    /// Index rebuild failed (logged, not propagated)
    IndexSyncFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ModelLoaded => "MODEL_LOADED",
            Event::SlowOperation => "SLOW_OPERATION",
            Event::IndexSyncComplete => "INDEX_SYNC_COMPLETE",
            Event::IndexSyncFailed => "INDEX_SYNC_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
