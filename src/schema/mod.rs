//! Document schema subsystem
//!
//! A schema is constructed once from an ordered field-definition mapping and
//! is immutable afterwards. It owns one metadata node ([`SchemaPath`]) per
//! field path and an optional schema-level description.
//!
//! # Design Principles
//!
//! - Declared field order is preserved everywhere
//! - Descriptions are documentation only; validation never reads them
//! - Validation is exact: no coercion, no undeclared fields

mod errors;
mod loader;
#[allow(clippy::module_inception)]
mod schema;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use loader::{SchemaFile, SchemaLoader};
pub use schema::{Schema, SchemaPath, ID_FIELD, VERSION_KEY};
pub use types::{
    DefaultValue, FieldDefinition, FieldType, IndexOrder, IndexSpec, PartialFilter,
    SchemaDefinition, SchemaOptions,
};
pub use validator::DocumentValidator;
