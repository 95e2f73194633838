//! Model layer
//!
//! - [`Model`]: named, schema-validated collection handle with CRUD, distinct,
//!   counting and index sync
//! - [`Filter`]: conjunctive field predicates over dotted paths
//! - [`ModelRegistry`]: name-keyed model cache with best-effort index sync
//!
//! Documents are JSON objects held in memory. Every operation is timed and
//! slow ones are logged.

mod collection;
mod errors;
mod filter;
mod indexes;
#[allow(clippy::module_inception)]
mod model;
mod registry;

pub use collection::Collection;
pub use errors::{ModelError, ModelResult};
pub use filter::{compare_json_values, Filter, FilterExpr, FilterOperator};
pub use indexes::{DocumentSeq, Index, IndexConflict, IndexKey, IndexSet};
pub use model::{Model, UpdateResult};
pub use registry::{ModelRegistry, RegistryConfig};
