//! App domain
//!
//! - the annotated App schema and its indexes
//! - app types, caller identity and permission levels
//! - [`AppService`]: app detail with permission-based redaction

mod errors;
mod schema;
mod service;
mod types;

pub use errors::{AppError, AppResult};
pub use schema::{app_definition, app_schema, APP_SCHEMA_DESCRIPTION};
pub use service::{AppDetail, AppService};
pub use types::{
    AppPermission, AppType, Caller, Permission, APP_COLLECTION, TEAM_COLLECTION,
    TEAM_MEMBER_COLLECTION,
};
