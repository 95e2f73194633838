//! Document validation against a constructed schema
//!
//! Insert semantics:
//! - Document must be an object
//! - Undeclared fields are rejected
//! - Absent or null fields receive their default, if one is declared
//! - Absent or null required fields without a default are rejected
//! - Present values must match the declared type exactly (no coercion)
//! - `enum` restricts string values
//! - Embedded objects and arrays are validated recursively
//!
//! Validation never reads or writes the store and is deterministic apart
//! from `now` defaults.

use chrono::DateTime;
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::schema::{Schema, ID_FIELD};
use super::types::{DefaultValue, FieldDefinition, FieldType, SchemaDefinition};
use crate::document::{get_path_mut, join_path, json_type_name, set_path};

/// Validation view over a single field, relative to the object it lives in
struct FieldRule<'a> {
    path: &'a str,
    field_type: &'a FieldType,
    required: bool,
    default: Option<&'a DefaultValue>,
    enum_values: Option<&'a [String]>,
}

impl<'a> FieldRule<'a> {
    fn from_definition(path: &'a str, definition: &'a FieldDefinition) -> Self {
        Self {
            path,
            field_type: &definition.field_type,
            required: definition.required,
            default: definition.default.as_ref(),
            enum_values: definition.enum_values.as_deref(),
        }
    }
}

/// Validates documents for one schema.
pub struct DocumentValidator<'a> {
    schema: &'a Schema,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates a document for insertion and applies defaults.
    ///
    /// Returns the document as it should be stored.
    pub fn prepare_insert(&self, document: Value) -> SchemaResult<Value> {
        let mut obj = match document {
            Value::Object(obj) => obj,
            other => {
                return Err(SchemaError::validation_failed(ValidationDetails::type_mismatch(
                    "$root",
                    "object",
                    json_type_name(&other),
                )))
            }
        };

        let rules: Vec<FieldRule<'_>> = self
            .schema
            .each_path()
            .map(|p| FieldRule {
                path: p.path(),
                field_type: p.field_type(),
                required: p.is_required(),
                default: p.default_value(),
                enum_values: p.enum_values(),
            })
            .collect();

        validate_object(&mut obj, &rules, "")?;
        Ok(Value::Object(obj))
    }

    /// Validates a `$set`-style update. `_id` is immutable.
    ///
    /// Values are validated in place so embedded defaults are applied.
    pub fn validate_update(&self, set: &mut Map<String, Value>) -> SchemaResult<()> {
        for (path, value) in set.iter_mut() {
            if path == ID_FIELD {
                return Err(SchemaError::validation_failed(ValidationDetails::immutable(
                    ID_FIELD,
                )));
            }

            let (field_type, enum_values, required) = match self.schema.path(path) {
                Some(node) => (node.field_type(), node.enum_values(), node.is_required()),
                None => {
                    let def = self.embedded_field(path).ok_or_else(|| {
                        SchemaError::validation_failed(ValidationDetails::extra_field(
                            path.as_str(),
                        ))
                    })?;
                    (&def.field_type, def.enum_values.as_deref(), def.required)
                }
            };

            if value.is_null() {
                if required {
                    return Err(SchemaError::validation_failed(ValidationDetails::missing_field(
                        path.as_str(),
                    )));
                }
                continue;
            }

            validate_value(value, field_type, enum_values, path)?;
        }
        Ok(())
    }

    /// Resolves a dotted path below an `object` field, e.g.
    /// `pluginData.nodeVersion`, to its sub-definition.
    fn embedded_field(&self, path: &str) -> Option<&'a FieldDefinition> {
        let schema: &'a Schema = self.schema;
        for (dot, _) in path.rmatch_indices('.') {
            if let Some(node) = schema.path(&path[..dot]) {
                return match node.field_type() {
                    FieldType::Object { fields } => sub_definition(fields, &path[dot + 1..]),
                    _ => None,
                };
            }
        }
        None
    }
}

fn sub_definition<'d>(fields: &'d SchemaDefinition, relative: &str) -> Option<&'d FieldDefinition> {
    let flattened = fields.flatten();
    if let Some((_, def)) = flattened.iter().find(|(p, _)| p == relative) {
        return Some(*def);
    }

    flattened.into_iter().find_map(|(p, def)| {
        let rest = relative.strip_prefix(p.as_str())?.strip_prefix('.')?;
        match &def.field_type {
            FieldType::Object { fields } => sub_definition(fields, rest),
            _ => None,
        }
    })
}

fn validate_object(
    obj: &mut Map<String, Value>,
    rules: &[FieldRule<'_>],
    prefix: &str,
) -> SchemaResult<()> {
    check_undeclared(obj, rules, prefix, "")?;
    for rule in rules {
        apply_rule(obj, rule, prefix)?;
    }
    Ok(())
}

/// Rejects keys that are neither a declared path nor a group of declared paths.
fn check_undeclared(
    obj: &Map<String, Value>,
    rules: &[FieldRule<'_>],
    prefix: &str,
    relative: &str,
) -> SchemaResult<()> {
    for (key, value) in obj {
        let path = join_path(relative, key);
        if rules.iter().any(|r| r.path == path) {
            continue;
        }

        let group_prefix = format!("{}.", path);
        if rules.iter().any(|r| r.path.starts_with(&group_prefix)) {
            match value {
                Value::Object(child) => check_undeclared(child, rules, prefix, &path)?,
                Value::Null => {}
                other => {
                    return Err(type_error(&join_path(prefix, &path), "object", other));
                }
            }
            continue;
        }

        return Err(SchemaError::validation_failed(ValidationDetails::extra_field(
            join_path(prefix, &path),
        )));
    }
    Ok(())
}

fn apply_rule(obj: &mut Map<String, Value>, rule: &FieldRule<'_>, prefix: &str) -> SchemaResult<()> {
    let full_path = join_path(prefix, rule.path);

    if let Some(value) = get_path_mut(obj, rule.path).filter(|v| !v.is_null()) {
        return validate_value(value, rule.field_type, rule.enum_values, &full_path);
    }

    if let Some(default) = rule.default {
        set_path(obj, rule.path, default.resolve());
        return Ok(());
    }

    if rule.required {
        return Err(SchemaError::validation_failed(ValidationDetails::missing_field(
            full_path,
        )));
    }

    Ok(())
}

fn validate_value(
    value: &mut Value,
    field_type: &FieldType,
    enum_values: Option<&[String]>,
    path: &str,
) -> SchemaResult<()> {
    match field_type {
        FieldType::String => {
            let s = value
                .as_str()
                .ok_or_else(|| type_error(path, "string", value))?;
            if let Some(allowed) = enum_values {
                if !allowed.iter().any(|a| a == s) {
                    return Err(SchemaError::validation_failed(ValidationDetails::not_in_enum(
                        path, allowed, s,
                    )));
                }
            }
        }
        FieldType::Number => {
            if !value.is_number() {
                return Err(type_error(path, "number", value));
            }
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                return Err(type_error(path, "boolean", value));
            }
        }
        FieldType::Date => {
            let valid = value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
            if !valid {
                return Err(type_error(path, "date (RFC 3339)", value));
            }
        }
        FieldType::Reference { .. } => {
            let valid = value.as_str().is_some_and(|s| !s.is_empty());
            if !valid {
                return Err(type_error(path, "reference id", value));
            }
        }
        FieldType::Mixed => {}
        FieldType::Array { element_type } => {
            let arr = match value {
                Value::Array(arr) => arr,
                other => return Err(type_error(path, "array", other)),
            };
            for (i, elem) in arr.iter_mut().enumerate() {
                let elem_path = format!("{}[{}]", path, i);
                if elem.is_null() {
                    return Err(type_error(&elem_path, element_type.type_name(), elem));
                }
                validate_value(elem, element_type, None, &elem_path)?;
            }
        }
        FieldType::Object { fields } | FieldType::Nested { fields } => {
            let obj = match value {
                Value::Object(obj) => obj,
                other => return Err(type_error(path, "object", other)),
            };
            let flattened = fields.flatten();
            let rules: Vec<FieldRule<'_>> = flattened
                .iter()
                .map(|(p, def)| FieldRule::from_definition(p, def))
                .collect();
            validate_object(obj, &rules, path)?;
        }
    }
    Ok(())
}

fn type_error(path: &str, expected: &str, actual: &Value) -> SchemaError {
    SchemaError::validation_failed(ValidationDetails::type_mismatch(
        path,
        expected,
        json_type_name(actual),
    ))
}
