//! Structural codec between the canonical in-memory form and the storage
//! form of a translatable field.
//!
//! Canonical form: a JSON object mapping language code to a value of the
//! field's base type. Storage form: a JSON array of `{"lang", "value"}`
//! records. Both transforms are pure; `from_storage(to_storage(m)) == m`
//! for every valid mapping `m`.
//!
//! Writers emit records in lexicographic language order (the canonical
//! mapping is key-ordered), which keeps storage output deterministic.
//! Readers treat record order as insignificant but reject duplicate
//! languages: a repeated code is a data-corruption signal, never merged.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::trace;

use crate::error::{Error, Result};

/// One persisted translation record.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationRecord {
    /// Opaque language code
    pub lang: String,

    /// The translated value; for container base types this is the whole
    /// container, one unit of translation per language
    pub value: Value,
}

/// Convert a canonical mapping into the ordered storage sequence.
///
/// An empty mapping produces an empty array: a translatable field with no
/// translations yet is representable and round-trips.
pub fn to_storage(mapping: &Map<String, Value>) -> Value {
    trace!(languages = mapping.len(), "encoding i18n field");
    Value::Array(
        mapping
            .iter()
            .map(|(lang, value)| json!({ "lang": lang, "value": value }))
            .collect(),
    )
}

/// Reconstruct the canonical mapping from a storage sequence.
///
/// Fails with [`Error::MalformedRecord`] when a record is not an object,
/// lacks a `lang` or `value` key, carries a non-string `lang`, or repeats
/// a language. On failure nothing partially built is returned.
pub fn from_storage(path: &str, records: &[Value]) -> Result<Map<String, Value>> {
    let mut mapping = Map::new();
    for record in records {
        let record: TranslationRecord =
            serde_json::from_value(record.clone()).map_err(|e| Error::MalformedRecord {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        if mapping.insert(record.lang.clone(), record.value).is_some() {
            return Err(Error::MalformedRecord {
                path: path.to_string(),
                reason: format!("duplicate language '{}'", record.lang),
            });
        }
    }
    trace!(path, languages = mapping.len(), "decoded i18n field");
    Ok(mapping)
}
