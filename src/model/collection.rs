//! In-memory document store backing one model
//!
//! Documents are kept in insertion order, keyed by a sequence number that
//! never changes for the lifetime of the document.

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::{ModelError, ModelResult};
use super::filter::Filter;
use super::indexes::{DocumentSeq, IndexConflict, IndexSet};
use crate::schema::{IndexSpec, ID_FIELD};

#[derive(Debug)]
pub struct Collection {
    name: String,
    documents: BTreeMap<DocumentSeq, Value>,
    next_seq: DocumentSeq,
    indexes: IndexSet,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: BTreeMap::new(),
            next_seq: 0,
            indexes: IndexSet::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, seq: DocumentSeq) -> Option<&Value> {
        self.documents.get(&seq)
    }

    /// Documents matching `filter`, in insertion order
    pub fn matching<'a>(
        &'a self,
        filter: &'a Filter,
    ) -> impl Iterator<Item = (DocumentSeq, &'a Value)> + 'a {
        self.documents
            .iter()
            .filter(move |(_, doc)| filter.matches(doc))
            .map(|(seq, doc)| (*seq, doc))
    }

    fn find_id(&self, id: &Value) -> Option<DocumentSeq> {
        self.documents
            .iter()
            .find(|(_, doc)| doc.get(ID_FIELD) == Some(id))
            .map(|(seq, _)| *seq)
    }

    /// Stores a new document. Rejects duplicate `_id`s and unique-key
    /// violations; the collection is unchanged on error.
    pub fn insert(&mut self, doc: Value) -> ModelResult<DocumentSeq> {
        if let Some(id) = doc.get(ID_FIELD).filter(|v| !v.is_null()) {
            if self.find_id(id).is_some() {
                return Err(ModelError::DuplicateId {
                    collection: self.name.clone(),
                    id: id.as_str().map_or_else(|| id.to_string(), str::to_string),
                });
            }
        }

        let seq = self.next_seq;
        self.indexes
            .check(&doc, seq)
            .map_err(|c| self.conflict(c))?;

        self.indexes.insert(&doc, seq);
        self.documents.insert(seq, doc);
        self.next_seq += 1;
        Ok(seq)
    }

    /// Replaces a stored document, returning the previous version.
    pub fn replace(&mut self, seq: DocumentSeq, doc: Value) -> ModelResult<Value> {
        if !self.documents.contains_key(&seq) {
            return Err(ModelError::NotFound {
                collection: self.name.clone(),
                id: seq.to_string(),
            });
        }
        self.indexes
            .check(&doc, seq)
            .map_err(|c| self.conflict(c))?;

        let previous = self.documents.insert(seq, doc).unwrap_or(Value::Null);
        self.indexes.remove(&previous, seq);
        if let Some(current) = self.documents.get(&seq) {
            self.indexes.insert(current, seq);
        }
        Ok(previous)
    }

    pub fn remove(&mut self, seq: DocumentSeq) -> Option<Value> {
        let doc = self.documents.remove(&seq)?;
        self.indexes.remove(&doc, seq);
        Some(doc)
    }

    /// Rebuilds the indexes from the stored documents. On failure the
    /// previous indexes stay in place.
    pub fn rebuild_indexes(&mut self, specs: &[IndexSpec]) -> ModelResult<Vec<String>> {
        let rebuilt = IndexSet::build(specs, &self.documents).map_err(|c| self.conflict(c))?;
        self.indexes = rebuilt;
        Ok(self.indexes.names())
    }

    pub fn indexes(&self) -> &IndexSet {
        &self.indexes
    }

    fn conflict(&self, conflict: IndexConflict) -> ModelError {
        ModelError::DuplicateKey {
            collection: self.name.clone(),
            index: conflict.index,
            key: conflict.key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IndexOrder;
    use serde_json::json;

    #[test]
    fn test_insert_and_match_in_order() {
        let mut collection = Collection::new("apps");
        collection.insert(json!({"_id": "a", "type": "simple"})).unwrap();
        collection.insert(json!({"_id": "b", "type": "folder"})).unwrap();
        collection.insert(json!({"_id": "c", "type": "simple"})).unwrap();

        let filter = Filter::new().eq("type", "simple");
        let ids: Vec<_> = collection
            .matching(&filter)
            .map(|(_, doc)| doc["_id"].clone())
            .collect();
        assert_eq!(ids, vec![json!("a"), json!("c")]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut collection = Collection::new("apps");
        collection.insert(json!({"_id": "a"})).unwrap();

        let err = collection.insert(json!({"_id": "a"})).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateId { ref id, .. } if id == "a"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_unique_index_enforced_after_rebuild() {
        let mut collection = Collection::new("apps");
        collection.insert(json!({"_id": "a", "name": "x"})).unwrap();

        let spec = IndexSpec::new([("name", IndexOrder::Ascending)]).unique();
        let names = collection.rebuild_indexes(&[spec]).unwrap();
        assert_eq!(names, vec!["name_1".to_string()]);

        let err = collection.insert(json!({"_id": "b", "name": "x"})).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey { .. }));
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_indexes() {
        let mut collection = Collection::new("apps");
        collection.insert(json!({"_id": "a", "name": "x"})).unwrap();
        collection.insert(json!({"_id": "b", "name": "x"})).unwrap();

        let spec = IndexSpec::new([("name", IndexOrder::Ascending)]).unique();
        assert!(collection.rebuild_indexes(&[spec]).is_err());
        assert!(collection.indexes().is_empty());
    }

    #[test]
    fn test_replace_and_remove_maintain_indexes() {
        let mut collection = Collection::new("apps");
        let spec = IndexSpec::new([("name", IndexOrder::Ascending)]).unique();
        collection.rebuild_indexes(&[spec]).unwrap();

        let seq = collection.insert(json!({"_id": "a", "name": "x"})).unwrap();
        collection.replace(seq, json!({"_id": "a", "name": "y"})).unwrap();

        // "x" is free again after the rename
        collection.insert(json!({"_id": "b", "name": "x"})).unwrap();
        assert!(collection.insert(json!({"_id": "c", "name": "y"})).is_err());

        collection.remove(seq).unwrap();
        collection.insert(json!({"_id": "c", "name": "y"})).unwrap();
        assert_eq!(collection.len(), 2);
    }
}
