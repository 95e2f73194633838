//! Schema descriptions: annotation and introspection
//!
//! - [`annotate`] runs once at schema-definition time and is the only writer
//! - the introspection functions are pure reads over any [`SchemaSource`]
//! - [`wrap`] pairs a model with the description queries
//!
//! Absence is never an error: a missing description, or a field that does
//! not exist, is reported as `None` or omitted from mappings.

mod annotator;
mod introspect;
mod wrapper;

pub use annotator::{annotate, AnnotateOptions};
pub use introspect::{
    all_descriptions, field_description, field_descriptors, is_internal, schema_description,
    DescriptionMap, FieldDescriptor, FieldDescriptors, SchemaSource, INTERNAL_PREFIX, MIXED_TYPE,
    SCHEMA_SENTINEL,
};
pub use wrapper::{wrap, Described};
