//! # Filter Expressions
//!
//! A [`Filter`] is a conjunction of field predicates over dotted paths.
//!
//! Matching follows document-store conventions:
//! - a missing field equals `null`
//! - `eq`/`in` on an array field match when any element matches
//! - ordering operators compare numbers with numbers and strings with
//!   strings; any other pairing does not match

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{ModelError, ModelResult};
use crate::document::get_path;
use crate::schema::ID_FIELD;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Exists,
    Regex,
}

impl FilterOperator {
    /// Operator in `$op` form, as rendered in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::In => "$in",
            FilterOperator::Exists => "$exists",
            FilterOperator::Regex => "$regex",
        }
    }
}

/// A single field predicate
#[derive(Debug, Clone, Serialize)]
pub struct FilterExpr {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
    #[serde(skip)]
    pattern: Option<Regex>,
}

impl FilterExpr {
    fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            pattern: None,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq, value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Ne, value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Gt, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Gte, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Lt, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Lte, value.into())
    }

    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, FilterOperator::In, Value::Array(values))
    }

    pub fn exists(field: impl Into<String>, exists: bool) -> Self {
        Self::new(field, FilterOperator::Exists, Value::Bool(exists))
    }

    /// Regular expression match on string fields
    pub fn regex(field: impl Into<String>, pattern: &str) -> ModelResult<Self> {
        let compiled = Regex::new(pattern)
            .map_err(|e| ModelError::InvalidFilter(format!("bad regex '{}': {}", pattern, e)))?;
        let mut expr = Self::new(field, FilterOperator::Regex, Value::String(pattern.into()));
        expr.pattern = Some(compiled);
        Ok(expr)
    }

    /// Check if a document matches this predicate
    pub fn matches(&self, doc: &Value) -> bool {
        let field_value = get_path(doc, &self.field);

        match self.operator {
            FilterOperator::Eq => equals(field_value, &self.value),
            FilterOperator::Ne => !equals(field_value, &self.value),
            FilterOperator::Gt => ordered(field_value, &self.value, |o| o == Ordering::Greater),
            FilterOperator::Gte => ordered(field_value, &self.value, |o| o != Ordering::Less),
            FilterOperator::Lt => ordered(field_value, &self.value, |o| o == Ordering::Less),
            FilterOperator::Lte => ordered(field_value, &self.value, |o| o != Ordering::Greater),
            FilterOperator::In => match self.value.as_array() {
                Some(candidates) => candidates.iter().any(|c| equals(field_value, c)),
                None => false,
            },
            FilterOperator::Exists => field_value.is_some() == self.value.as_bool().unwrap_or(true),
            FilterOperator::Regex => match (&self.pattern, field_value) {
                (Some(pattern), Some(Value::String(s))) => pattern.is_match(s),
                _ => false,
            },
        }
    }
}

fn equals(field_value: Option<&Value>, expected: &Value) -> bool {
    match field_value {
        None => expected.is_null(),
        Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
        Some(actual) => actual == expected,
    }
}

fn ordered(field_value: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    field_value
        .and_then(|actual| compare_json_values(actual, bound))
        .is_some_and(accept)
}

/// Compare two JSON values of the same kind
pub fn compare_json_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A set of predicates combined with AND logic
#[derive(Debug, Clone, Default)]
pub struct Filter {
    exprs: Vec<FilterExpr>,
}

impl Filter {
    /// Matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the document with the given `_id`
    pub fn by_id(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self::new().eq(ID_FIELD, id)
    }

    pub fn and(mut self, expr: FilterExpr) -> Self {
        self.exprs.push(expr);
        self
    }

    /// Shorthand for `and(FilterExpr::eq(..))`
    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(FilterExpr::eq(field, value))
    }

    pub fn exprs(&self) -> &[FilterExpr] {
        &self.exprs
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Check if a document matches all predicates
    pub fn matches(&self, doc: &Value) -> bool {
        self.exprs.iter().all(|e| e.matches(doc))
    }

    /// Query-document form used in logs: `{"teamId": {"$eq": "t1"}}`
    pub fn to_json(&self) -> Value {
        let mut query = Map::new();
        for expr in &self.exprs {
            let slot = query
                .entry(expr.field.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(ops) = slot {
                ops.insert(expr.operator.as_str().to_string(), expr.value.clone());
            }
        }
        Value::Object(query)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filter() {
        let filter = FilterExpr::eq("name", "Alice");

        assert!(filter.matches(&json!({"name": "Alice"})));
        assert!(!filter.matches(&json!({"name": "Bob"})));
    }

    #[test]
    fn test_eq_null_matches_missing() {
        let filter = FilterExpr::eq("parentId", Value::Null);

        assert!(filter.matches(&json!({"name": "x"})));
        assert!(filter.matches(&json!({"parentId": null})));
        assert!(!filter.matches(&json!({"parentId": "p1"})));
    }

    #[test]
    fn test_eq_on_array_field() {
        let filter = FilterExpr::eq("teamTags", "ops");

        assert!(filter.matches(&json!({"teamTags": ["dev", "ops"]})));
        assert!(!filter.matches(&json!({"teamTags": ["dev"]})));
    }

    #[test]
    fn test_dotted_path() {
        let filter = FilterExpr::eq("pluginData.nodeVersion", "v2");

        assert!(filter.matches(&json!({"pluginData": {"nodeVersion": "v2"}})));
        assert!(!filter.matches(&json!({"pluginData": {}})));
    }

    #[test]
    fn test_ordering_filters() {
        assert!(FilterExpr::gt("age", 18).matches(&json!({"age": 21})));
        assert!(!FilterExpr::gt("age", 18).matches(&json!({"age": 18})));
        assert!(FilterExpr::gte("age", 18).matches(&json!({"age": 18})));
        assert!(FilterExpr::lt("age", 18).matches(&json!({"age": 15})));
        assert!(FilterExpr::lte("age", 18).matches(&json!({"age": 18})));
        assert!(!FilterExpr::lt("age", 18).matches(&json!({"age": "15"})));
        assert!(!FilterExpr::lt("age", 18).matches(&json!({})));
    }

    #[test]
    fn test_in_filter() {
        let filter = FilterExpr::in_list("type", vec![json!("simple"), json!("workflow")]);

        assert!(filter.matches(&json!({"type": "simple"})));
        assert!(!filter.matches(&json!({"type": "folder"})));
    }

    #[test]
    fn test_exists_filter() {
        let present = FilterExpr::exists("scheduledTriggerConfig", true);
        let absent = FilterExpr::exists("scheduledTriggerConfig", false);
        let doc = json!({"scheduledTriggerConfig": {"cronString": "* * * * *"}});

        assert!(present.matches(&doc));
        assert!(!absent.matches(&doc));
        assert!(absent.matches(&json!({})));
    }

    #[test]
    fn test_regex_filter() {
        let filter = FilterExpr::regex("name", "^Chat").unwrap();

        assert!(filter.matches(&json!({"name": "Chat bot"})));
        assert!(!filter.matches(&json!({"name": "My Chat"})));
        assert!(!filter.matches(&json!({"name": 3})));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = FilterExpr::regex("name", "(").unwrap_err();
        assert!(matches!(err, ModelError::InvalidFilter(_)));
    }

    #[test]
    fn test_filter_conjunction() {
        let filter = Filter::new()
            .eq("teamId", "t1")
            .and(FilterExpr::ne("type", "folder"));

        assert!(filter.matches(&json!({"teamId": "t1", "type": "simple"})));
        assert!(!filter.matches(&json!({"teamId": "t1", "type": "folder"})));
        assert!(!filter.matches(&json!({"teamId": "t2", "type": "simple"})));
        assert!(Filter::new().matches(&json!({})));
    }

    #[test]
    fn test_filter_renders_as_query_document() {
        let filter = Filter::new()
            .eq("teamId", "t1")
            .and(FilterExpr::gt("updateTime", "2024-01-01"));

        assert_eq!(
            filter.to_json(),
            json!({"teamId": {"$eq": "t1"}, "updateTime": {"$gt": "2024-01-01"}})
        );
        assert_eq!(filter.to_string(), filter.to_json().to_string());
    }
}
