//! Explicit description-access wrapper around a model
//!
//! The wrapper adds the description queries and an accessor for the wrapped
//! model. It never forwards model operations implicitly: CRUD goes through
//! [`Described::model`], so no model member can be shadowed.

use super::introspect::{self, DescriptionMap, SchemaSource};
use crate::schema::Schema;

/// A model together with description access
#[derive(Debug, Clone)]
pub struct Described<M> {
    model: M,
}

/// Wraps a model (or any schema source) with description access.
pub fn wrap<M: SchemaSource>(model: M) -> Described<M> {
    Described { model }
}

impl<M: SchemaSource> Described<M> {
    /// All descriptions, schema-level under the sentinel key
    pub fn descriptions(&self) -> DescriptionMap {
        introspect::all_descriptions(&self.model)
    }

    pub fn field_description(&self, field: &str) -> Option<&str> {
        introspect::field_description(&self.model, field)
    }

    pub fn schema_description(&self) -> Option<&str> {
        introspect::schema_description(&self.model)
    }

    /// The wrapped model. All model operations are reached through here.
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }
}

impl<M: SchemaSource> SchemaSource for Described<M> {
    fn schema(&self) -> &Schema {
        self.model.schema()
    }
}
