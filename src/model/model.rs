//! Model handle: a named collection bound to a schema
//!
//! A [`Model`] is cheap to clone; clones share the same collection, so a
//! write through one handle is visible through every other.
//!
//! Every operation is timed. Operations slower than the model's threshold
//! log `SLOW_OPERATION` with the collection, operation and query.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::collection::Collection;
use super::errors::{ModelError, ModelResult};
use super::filter::Filter;
use super::indexes::DocumentSeq;
use crate::describe::SchemaSource;
use crate::document::{get_path, json_type_name, set_path};
use crate::observability::{OperationTimer, DEFAULT_SLOW_OPERATION};
use crate::schema::{DocumentValidator, FieldType, Schema, ID_FIELD};

/// Outcome of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug)]
struct ModelInner {
    name: String,
    schema: Arc<Schema>,
    store: RwLock<Collection>,
    slow_operation: Duration,
}

#[derive(Debug, Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

impl Model {
    /// Creates a model with the default slow-operation threshold.
    pub fn new(name: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_slow_operation(name, schema, DEFAULT_SLOW_OPERATION)
    }

    pub fn with_slow_operation(
        name: impl Into<String>,
        schema: impl Into<Arc<Schema>>,
        slow_operation: Duration,
    ) -> Self {
        let name = name.into();
        Self {
            inner: Arc::new(ModelInner {
                store: RwLock::new(Collection::new(name.clone())),
                name,
                schema: schema.into(),
                slow_operation,
            }),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn slow_operation(&self) -> Duration {
        self.inner.slow_operation
    }

    /// True if both handles share one collection
    pub fn same_model(&self, other: &Model) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ==================
    // Writes
    // ==================

    /// Validates, applies defaults, assigns an `_id` when missing and stores
    /// the document. Returns the stored document.
    pub fn create(&self, doc: Value) -> ModelResult<Value> {
        let timer = self.timer("create");
        let result = self.prepare(doc).and_then(|doc| {
            let mut collection = self.write()?;
            collection.insert(doc.clone())?;
            Ok(doc)
        });
        timer.finish(None);
        result
    }

    /// Validates every document first; then stores them in order, stopping
    /// at the first duplicate. Documents stored before the failure remain.
    pub fn insert_many(&self, docs: Vec<Value>) -> ModelResult<Vec<Value>> {
        let timer = self.timer("insertMany");
        let result = docs
            .into_iter()
            .map(|doc| self.prepare(doc))
            .collect::<ModelResult<Vec<_>>>()
            .and_then(|prepared| {
                let mut collection = self.write()?;
                for doc in &prepared {
                    collection.insert(doc.clone())?;
                }
                Ok(prepared)
            });
        timer.finish(None);
        result
    }

    /// Applies a `$set` update to the first matching document.
    ///
    /// `update` is either `{"$set": {...}}` or the bare set object.
    pub fn update_one(&self, filter: &Filter, update: Value) -> ModelResult<UpdateResult> {
        let timer = self.timer("updateOne");
        let result = self.update_matching(filter, update, Some(1));
        timer.finish(Some(filter));
        result
    }

    pub fn update_many(&self, filter: &Filter, update: Value) -> ModelResult<UpdateResult> {
        let timer = self.timer("updateMany");
        let result = self.update_matching(filter, update, None);
        timer.finish(Some(filter));
        result
    }

    /// Updates the document with the given id and returns the new version.
    pub fn find_by_id_and_update(&self, id: &str, update: Value) -> ModelResult<Value> {
        let filter = Filter::by_id(id);
        let timer = self.timer("findByIdAndUpdate");
        let result = self.parse_update(update).and_then(|set| {
            let mut collection = self.write()?;
            let seq = collection
                .matching(&filter)
                .map(|(seq, _)| seq)
                .next()
                .ok_or_else(|| ModelError::NotFound {
                    collection: self.name().to_string(),
                    id: id.to_string(),
                })?;
            apply_set(&mut collection, seq, &set)?;
            Ok(collection.get(seq).cloned().unwrap_or(Value::Null))
        });
        timer.finish(Some(&filter));
        result
    }

    /// Returns the number of deleted documents (0 or 1).
    pub fn delete_one(&self, filter: &Filter) -> ModelResult<u64> {
        let timer = self.timer("deleteOne");
        let result = self.delete_matching(filter, Some(1));
        timer.finish(Some(filter));
        result
    }

    pub fn delete_many(&self, filter: &Filter) -> ModelResult<u64> {
        let timer = self.timer("deleteMany");
        let result = self.delete_matching(filter, None);
        timer.finish(Some(filter));
        result
    }

    // ==================
    // Reads
    // ==================

    /// Matching documents in insertion order
    pub fn find(&self, filter: &Filter) -> ModelResult<Vec<Value>> {
        let timer = self.timer("find");
        let result = self.read().map(|collection| {
            collection
                .matching(filter)
                .map(|(_, doc)| doc.clone())
                .collect()
        });
        timer.finish(Some(filter));
        result
    }

    pub fn find_one(&self, filter: &Filter) -> ModelResult<Option<Value>> {
        let timer = self.timer("findOne");
        let result = self
            .read()
            .map(|collection| collection.matching(filter).map(|(_, doc)| doc.clone()).next());
        timer.finish(Some(filter));
        result
    }

    pub fn find_by_id(&self, id: &str) -> ModelResult<Option<Value>> {
        self.find_one(&Filter::by_id(id))
    }

    pub fn count_documents(&self, filter: &Filter) -> ModelResult<u64> {
        let timer = self.timer("countDocuments");
        let result = self
            .read()
            .map(|collection| collection.matching(filter).count() as u64);
        timer.finish(Some(filter));
        result
    }

    /// Total number of stored documents, without a filter pass
    pub fn estimated_document_count(&self) -> ModelResult<u64> {
        let timer = self.timer("estimatedDocumentCount");
        let result = self.read().map(|collection| collection.len() as u64);
        timer.finish(None);
        result
    }

    /// Distinct values of `field` across matching documents, in first-seen
    /// order. Array values contribute their elements; missing fields are
    /// skipped.
    pub fn distinct(&self, field: &str, filter: &Filter) -> ModelResult<Vec<Value>> {
        let timer = self.timer("distinct");
        let result = self.read().map(|collection| {
            let mut values: Vec<Value> = Vec::new();
            for (_, doc) in collection.matching(filter) {
                let candidates = match get_path(doc, field) {
                    None => continue,
                    Some(Value::Array(items)) => items.clone(),
                    Some(value) => vec![value.clone()],
                };
                for value in candidates {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            values
        });
        timer.finish(Some(filter));
        result
    }

    // ==================
    // Indexes
    // ==================

    /// Rebuilds the schema's declared indexes from the stored documents.
    /// Returns the index names. Unique indexes constrain writes from then on.
    pub fn sync_indexes(&self) -> ModelResult<Vec<String>> {
        let timer = self.timer("syncIndexes");
        let result = self
            .write()
            .and_then(|mut collection| collection.rebuild_indexes(self.inner.schema.indexes()));
        timer.finish(None);
        result
    }

    /// Names of the indexes currently maintained
    pub fn index_names(&self) -> ModelResult<Vec<String>> {
        Ok(self.read()?.indexes().names())
    }

    // ==================
    // Internals
    // ==================

    fn timer(&self, op: &'static str) -> OperationTimer<'_> {
        OperationTimer::start(&self.inner.name, op, self.inner.slow_operation)
    }

    fn read(&self) -> ModelResult<RwLockReadGuard<'_, Collection>> {
        self.inner
            .store
            .read()
            .map_err(|_| ModelError::Poisoned(self.inner.name.clone()))
    }

    fn write(&self) -> ModelResult<RwLockWriteGuard<'_, Collection>> {
        self.inner
            .store
            .write()
            .map_err(|_| ModelError::Poisoned(self.inner.name.clone()))
    }

    fn generates_id(&self) -> bool {
        self.inner.schema.path(ID_FIELD).is_some_and(|p| {
            matches!(
                p.field_type(),
                FieldType::Reference { .. } | FieldType::String
            )
        })
    }

    fn prepare(&self, mut doc: Value) -> ModelResult<Value> {
        if self.generates_id() {
            if let Value::Object(obj) = &mut doc {
                if obj.get(ID_FIELD).map_or(true, Value::is_null) {
                    obj.insert(
                        ID_FIELD.to_string(),
                        Value::String(Uuid::new_v4().simple().to_string()),
                    );
                }
            }
        }

        DocumentValidator::new(&self.inner.schema)
            .prepare_insert(doc)
            .map_err(|e| ModelError::Validation(e.for_schema(self.name())))
    }

    fn parse_update(&self, update: Value) -> ModelResult<Map<String, Value>> {
        let mut set = match update {
            Value::Object(mut obj) => match obj.remove("$set") {
                Some(Value::Object(inner)) if obj.is_empty() => inner,
                Some(_) => {
                    return Err(ModelError::InvalidFilter(
                        "$set must be the only operator and hold an object".into(),
                    ))
                }
                None => obj,
            },
            other => {
                return Err(ModelError::InvalidFilter(format!(
                    "update must be an object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        if let Some(op) = set.keys().find(|k| k.starts_with('$')) {
            return Err(ModelError::InvalidFilter(format!(
                "unsupported update operator '{}'",
                op
            )));
        }

        DocumentValidator::new(&self.inner.schema)
            .validate_update(&mut set)
            .map_err(|e| ModelError::Validation(e.for_schema(self.name())))?;
        Ok(set)
    }

    fn update_matching(
        &self,
        filter: &Filter,
        update: Value,
        limit: Option<usize>,
    ) -> ModelResult<UpdateResult> {
        let set = self.parse_update(update)?;
        let mut collection = self.write()?;

        let seqs: Vec<DocumentSeq> = collection
            .matching(filter)
            .map(|(seq, _)| seq)
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        let mut result = UpdateResult {
            matched_count: seqs.len() as u64,
            modified_count: 0,
        };
        for seq in seqs {
            if apply_set(&mut collection, seq, &set)? {
                result.modified_count += 1;
            }
        }
        Ok(result)
    }

    fn delete_matching(&self, filter: &Filter, limit: Option<usize>) -> ModelResult<u64> {
        let mut collection = self.write()?;
        let seqs: Vec<DocumentSeq> = collection
            .matching(filter)
            .map(|(seq, _)| seq)
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        let mut deleted = 0;
        for seq in seqs {
            if collection.remove(seq).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// Writes the `$set` paths into one document. Returns whether it changed.
fn apply_set(
    collection: &mut Collection,
    seq: DocumentSeq,
    set: &Map<String, Value>,
) -> ModelResult<bool> {
    let Some(current) = collection.get(seq) else {
        return Ok(false);
    };

    let mut next = current.clone();
    if let Value::Object(obj) = &mut next {
        for (path, value) in set {
            set_path(obj, path, value.clone());
        }
    }

    if &next == current {
        return Ok(false);
    }
    collection.replace(seq, next)?;
    Ok(true)
}

impl SchemaSource for Model {
    fn schema(&self) -> &Schema {
        &self.inner.schema
    }
}
