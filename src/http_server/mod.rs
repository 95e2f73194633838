//! # HTTP Server Module
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/core/app/detail?appId=` - App detail for the calling member
//! - `/api/schema` - Registered models
//! - `/api/schema/:model/{descriptions,descriptors,docs}` - Description queries

pub mod app_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod schema_routes;
pub mod server;
pub mod state;

pub use config::{HttpServerConfig, IdentityConfig};
pub use errors::{HttpError, HttpResult};
pub use server::HttpServer;
pub use state::ServerState;
