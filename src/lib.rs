//! schemadoc - descriptions and introspection for document schemas
//!
//! Attaches human-readable descriptions to a schema and its top-level
//! fields, and reads them back as a mapping, per field, per schema, or as
//! normalized field descriptors. Around that core sit an in-memory model
//! layer, documentation generators, the `apps` domain and an HTTP/CLI
//! surface.

pub mod app;
pub mod cli;
pub mod config;
pub mod describe;
pub mod docs;
pub mod document;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod schema;
