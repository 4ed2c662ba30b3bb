//! Document validation.
//!
//! [`validate_field`] is the generic per-field type check: a value against
//! its declared [`FieldType`], recursing through lists and nested
//! structures. [`validate_translatable`] adapts that check for translatable
//! paths: the value must be a translation mapping, and every per-language
//! value must match the base type independently. [`validate_document`]
//! walks a whole document body, routing each declared path to the right
//! check.
//!
//! A `null` value is the unset sentinel and passes every check except the
//! required-field rule. An empty translation mapping is valid.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::schema::{FieldType, Schema};

/// Human-readable name of a JSON value's type, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "document",
    }
}

fn mismatch(path: &str, expected: &FieldType, actual: &Value) -> Error {
    Error::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: type_name(actual).to_string(),
    }
}

/// Check one value against its declared type.
///
/// Lists are validated element-wise with the element index appended to the
/// path; nested structures are validated field-wise, rejecting keys the
/// structure does not declare.
pub fn validate_field(path: &str, value: &Value, expected: &FieldType) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    match expected {
        FieldType::Text => match value {
            Value::String(_) => Ok(()),
            other => Err(mismatch(path, expected, other)),
        },
        FieldType::Integer => match value {
            Value::Number(n) if !n.is_f64() => Ok(()),
            other => Err(mismatch(path, expected, other)),
        },
        FieldType::Float => match value {
            Value::Number(n) if n.is_f64() => Ok(()),
            other => Err(mismatch(path, expected, other)),
        },
        FieldType::Boolean => match value {
            Value::Bool(_) => Ok(()),
            other => Err(mismatch(path, expected, other)),
        },
        FieldType::List(element) => match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    validate_field(&format!("{path}[{index}]"), item, element)?;
                }
                Ok(())
            }
            other => Err(mismatch(path, expected, other)),
        },
        FieldType::Document(fields) => match value {
            Value::Object(map) => {
                for (name, item) in map {
                    let item_path = format!("{path}.{name}");
                    match fields.get(name) {
                        Some(ty) => validate_field(&item_path, item, ty)?,
                        None => return Err(Error::UnknownField { path: item_path }),
                    }
                }
                Ok(())
            }
            other => Err(mismatch(path, expected, other)),
        },
    }
}

/// Check a translatable field's canonical value.
///
/// The value must be a mapping from language code to a value of the base
/// type; each language is validated independently and a failure carries
/// the offending language code. An empty mapping is valid.
pub fn validate_translatable(path: &str, value: &Value, base: &FieldType) -> Result<()> {
    match value {
        Value::Object(mapping) => {
            for (lang, translated) in mapping {
                validate_field(path, translated, base).map_err(|e| e.with_language(lang))?;
            }
            Ok(())
        }
        other => Err(Error::ExpectedI18n {
            path: path.to_string(),
            actual: type_name(other).to_string(),
        }),
    }
}

/// Validate a whole document body against its schema.
///
/// Required paths must be present and non-null; every present field must
/// match its declaration, with translatable paths routed through the i18n
/// shape check.
pub fn validate_document(schema: &Schema, body: &Map<String, Value>) -> Result<()> {
    for path in schema.required_paths() {
        match lookup(body, path) {
            None | Some(Value::Null) => {
                return Err(Error::MissingRequired {
                    path: path.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    validate_level(schema, "", schema.structure(), body)
}

fn validate_level(
    schema: &Schema,
    prefix: &str,
    fields: &std::collections::BTreeMap<String, FieldType>,
    map: &Map<String, Value>,
) -> Result<()> {
    for (name, value) in map {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };

        let Some(ty) = fields.get(name) else {
            return Err(Error::UnknownField { path });
        };

        if value.is_null() {
            continue;
        }

        if schema.registry().is_translatable(&path) {
            validate_translatable(&path, value, ty)?;
        } else if let (FieldType::Document(sub), Value::Object(submap)) = (ty, value) {
            // Descend level by level so translatable paths nested inside
            // plain containers are routed through the i18n check.
            validate_level(schema, &path, sub, submap)?;
        } else {
            validate_field(&path, value, ty)?;
        }
    }
    Ok(())
}

/// Navigate a body tree by dot-separated path.
pub(crate) fn lookup<'a>(body: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = body.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
