//! BTreeMap-based secondary indexes
//!
//! Each index maps a compound key (one [`IndexKey`] per declared key path)
//! to the sorted sequence numbers of the documents holding it. Only unique
//! indexes constrain writes; the others are maintained for lookup.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::document::get_path;
use crate::schema::{IndexSpec, PartialFilter};

/// Insertion sequence number of a stored document
pub type DocumentSeq = u64;

/// Index key representing a single field value.
///
/// Ordering is deterministic: Null < Bool < Int < Float < String < Json.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    /// Missing or null value
    Null,
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (stored as bits for total ordering)
    Float(u64),
    /// String value
    String(String),
    /// Arrays and objects, as compact JSON
    Json(String),
}

impl IndexKey {
    /// Create a key from a float
    ///
    /// Uses bit representation for total ordering.
    pub fn from_float(v: f64) -> Self {
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        IndexKey::Float(ordered)
    }

    fn float_value(ordered: u64) -> f64 {
        let bits = if (ordered >> 63) == 1 {
            ordered ^ (1 << 63)
        } else {
            !ordered
        };
        f64::from_bits(bits)
    }

    /// Create a key from a (possibly missing) JSON value
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => IndexKey::Null,
            Some(Value::Bool(b)) => IndexKey::Bool(*b),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => IndexKey::Int(i),
                None => IndexKey::from_float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Some(Value::String(s)) => IndexKey::String(s.clone()),
            Some(other) => IndexKey::Json(other.to_string()),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Null => f.write_str("null"),
            IndexKey::Bool(b) => write!(f, "{}", b),
            IndexKey::Int(i) => write!(f, "{}", i),
            IndexKey::Float(bits) => write!(f, "{}", IndexKey::float_value(*bits)),
            IndexKey::String(s) => write!(f, "{:?}", s),
            IndexKey::Json(s) => f.write_str(s),
        }
    }
}

/// A unique index already holds the key of a candidate document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConflict {
    pub index: String,
    pub key: String,
}

fn render_key(key: &[IndexKey]) -> String {
    let parts: Vec<String> = key.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// One declared index
#[derive(Debug)]
pub struct Index {
    name: String,
    spec: IndexSpec,
    tree: BTreeMap<Vec<IndexKey>, Vec<DocumentSeq>>,
}

impl Index {
    pub fn new(spec: IndexSpec) -> Self {
        Self {
            name: spec.name(),
            spec,
            tree: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    /// Partial indexes only cover documents that satisfy their condition
    pub fn covers(&self, doc: &Value) -> bool {
        match &self.spec.partial_filter {
            Some(PartialFilter::Exists(path)) => get_path(doc, path).is_some(),
            None => true,
        }
    }

    pub fn key_for(&self, doc: &Value) -> Vec<IndexKey> {
        self.spec
            .keys
            .iter()
            .map(|(path, _)| IndexKey::from_json(get_path(doc, path)))
            .collect()
    }

    /// Checks that storing `doc` as `seq` keeps the index unique.
    pub fn check(&self, doc: &Value, seq: DocumentSeq) -> Result<(), IndexConflict> {
        if !self.spec.unique || !self.covers(doc) {
            return Ok(());
        }
        let key = self.key_for(doc);
        match self.tree.get(&key) {
            Some(holders) if holders.iter().any(|s| *s != seq) => Err(IndexConflict {
                index: self.name.clone(),
                key: render_key(&key),
            }),
            _ => Ok(()),
        }
    }

    /// Insert a document. Maintains sorted ascending order.
    pub fn insert(&mut self, doc: &Value, seq: DocumentSeq) {
        if !self.covers(doc) {
            return;
        }
        let key = self.key_for(doc);
        let holders = self.tree.entry(key).or_default();
        if let Err(pos) = holders.binary_search(&seq) {
            holders.insert(pos, seq);
        }
    }

    /// Remove a document. Drops the key once no document holds it.
    pub fn remove(&mut self, doc: &Value, seq: DocumentSeq) {
        if !self.covers(doc) {
            return;
        }
        let key = self.key_for(doc);
        if let Some(holders) = self.tree.get_mut(&key) {
            if let Ok(pos) = holders.binary_search(&seq) {
                holders.remove(pos);
            }
            if holders.is_empty() {
                self.tree.remove(&key);
            }
        }
    }

    /// Documents holding exactly `key`, sorted ascending
    pub fn lookup_eq(&self, key: &[IndexKey]) -> Vec<DocumentSeq> {
        self.tree.get(key).cloned().unwrap_or_default()
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }

    /// Number of indexed documents
    pub fn entry_count(&self) -> usize {
        self.tree.values().map(Vec::len).sum()
    }
}

/// All indexes of one collection
#[derive(Debug, Default)]
pub struct IndexSet {
    indexes: Vec<Index>,
}

impl IndexSet {
    /// Builds every declared index over the stored documents.
    ///
    /// Fails on the first unique-key violation.
    pub fn build(
        specs: &[IndexSpec],
        documents: &BTreeMap<DocumentSeq, Value>,
    ) -> Result<Self, IndexConflict> {
        let mut indexes = Vec::with_capacity(specs.len());
        for spec in specs {
            let mut index = Index::new(spec.clone());
            for (seq, doc) in documents {
                index.check(doc, *seq)?;
                index.insert(doc, *seq);
            }
            indexes.push(index);
        }
        Ok(Self { indexes })
    }

    pub fn check(&self, doc: &Value, seq: DocumentSeq) -> Result<(), IndexConflict> {
        self.indexes.iter().try_for_each(|i| i.check(doc, seq))
    }

    pub fn insert(&mut self, doc: &Value, seq: DocumentSeq) {
        for index in &mut self.indexes {
            index.insert(doc, seq);
        }
    }

    pub fn remove(&mut self, doc: &Value, seq: DocumentSeq) {
        for index in &mut self.indexes {
            index.remove(doc, seq);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.indexes.iter().map(|i| i.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IndexOrder;
    use serde_json::json;

    fn docs(values: Vec<Value>) -> BTreeMap<DocumentSeq, Value> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as DocumentSeq, v))
            .collect()
    }

    #[test]
    fn test_key_ordering() {
        let keys = vec![
            IndexKey::Null,
            IndexKey::Bool(false),
            IndexKey::Bool(true),
            IndexKey::Int(-100),
            IndexKey::Int(100),
            IndexKey::from_float(-1.5),
            IndexKey::from_float(2.5),
            IndexKey::String("aaa".into()),
            IndexKey::String("zzz".into()),
        ];

        for i in 1..keys.len() {
            assert!(keys[i - 1] < keys[i], "Keys should be ordered");
        }
    }

    #[test]
    fn test_float_key_display() {
        assert_eq!(IndexKey::from_float(-1.5).to_string(), "-1.5");
        assert_eq!(IndexKey::from_float(2.25).to_string(), "2.25");
    }

    #[test]
    fn test_compound_key_lookup() {
        let spec = IndexSpec::new([
            ("teamId", IndexOrder::Ascending),
            ("type", IndexOrder::Ascending),
        ]);
        let set = IndexSet::build(
            &[spec],
            &docs(vec![
                json!({"teamId": "t1", "type": "simple"}),
                json!({"teamId": "t1", "type": "folder"}),
                json!({"teamId": "t1", "type": "simple"}),
            ]),
        )
        .unwrap();

        let index = set.get("teamId_1_type_1").unwrap();
        let key = vec![IndexKey::String("t1".into()), IndexKey::String("simple".into())];
        assert_eq!(index.lookup_eq(&key), vec![0, 2]);
        assert_eq!(index.key_count(), 2);
    }

    #[test]
    fn test_unique_violation_on_build() {
        let spec = IndexSpec::new([("name", IndexOrder::Ascending)]).unique();
        let err = IndexSet::build(
            &[spec],
            &docs(vec![json!({"name": "a"}), json!({"name": "a"})]),
        )
        .unwrap_err();

        assert_eq!(err.index, "name_1");
        assert_eq!(err.key, "[\"a\"]");
    }

    #[test]
    fn test_unique_check_ignores_same_document() {
        let spec = IndexSpec::new([("name", IndexOrder::Ascending)]).unique();
        let set = IndexSet::build(&[spec], &docs(vec![json!({"name": "a"})])).unwrap();

        assert!(set.check(&json!({"name": "a"}), 0).is_ok());
        assert!(set.check(&json!({"name": "a"}), 1).is_err());
        assert!(set.check(&json!({"name": "b"}), 1).is_ok());
    }

    #[test]
    fn test_partial_index_skips_uncovered_documents() {
        let spec = IndexSpec::new([("scheduledTriggerConfig", IndexOrder::Ascending)])
            .unique()
            .partial_exists("scheduledTriggerConfig");
        let set = IndexSet::build(&[spec], &docs(vec![json!({}), json!({})])).unwrap();

        let index = set.get("scheduledTriggerConfig_1").unwrap();
        assert_eq!(index.entry_count(), 0);
    }

    #[test]
    fn test_insert_remove() {
        let spec = IndexSpec::new([("type", IndexOrder::Ascending)]);
        let mut set = IndexSet::build(&[spec], &BTreeMap::new()).unwrap();
        let doc = json!({"type": "simple"});

        set.insert(&doc, 7);
        assert_eq!(set.get("type_1").unwrap().entry_count(), 1);

        set.remove(&doc, 7);
        assert_eq!(set.get("type_1").unwrap().key_count(), 0);
    }
}
