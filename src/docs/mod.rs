//! Documentation generators
//!
//! Built purely on the introspection queries in [`crate::describe`]:
//! - [`TableDoc`]: storage-oriented field table
//! - [`ApiDoc`]: API reference with types and required markers
//! - [`validation_messages`]: required-field messages keyed `<field>.required`

mod api;
mod messages;
mod table;

pub use api::{ApiDoc, ApiField, NO_DESCRIPTION};
pub use messages::{validation_messages, ValidationMessages};
pub use table::{TableDoc, TableField};

/// Width of the field-name column in rendered tables
pub const NAME_WIDTH: usize = 20;
