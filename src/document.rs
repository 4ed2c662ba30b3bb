//! Document instances and the translation accessor.
//!
//! A [`Document`] owns a body tree (`serde_json` object), a shared schema,
//! and its own [`LanguageContext`]. Translatable fields live in the body as
//! canonical language→value mappings, in the same slot a plain scalar
//! would occupy. [`Document::get`] and [`Document::set`] resolve the
//! current language (with fallback on reads); [`Document::get_raw`] and
//! [`Document::set_raw`] expose the slot directly, bypassing language
//! resolution and validation. Both modes operate on the same underlying
//! mapping, so their effects are always consistent.
//!
//! At the persistence boundary, [`Document::save`] encodes every
//! translatable field into its storage form and [`Document::load`] decodes
//! it back before any field access proceeds.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::codec;
use crate::config::I18nConfig;
use crate::error::{Error, Result};
use crate::language::LanguageContext;
use crate::schema::{FieldType, Schema};
use crate::store::JsonStore;
use crate::validator::{self, lookup, type_name};

/// One in-memory document bound to a schema.
#[derive(Debug, Clone)]
pub struct Document {
    schema: Arc<Schema>,
    body: Map<String, Value>,
    lang: LanguageContext,
}

impl Document {
    /// Create an empty document with the process default language and no
    /// fallback.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, &I18nConfig::default())
    }

    /// Create an empty document with explicit language configuration.
    pub fn with_config(schema: Arc<Schema>, config: &I18nConfig) -> Self {
        Self {
            schema,
            body: Map::new(),
            lang: LanguageContext::from_config(config),
        }
    }

    /// The schema this document is bound to.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The raw body tree. Translatable fields appear in canonical form.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    // ==================== Language Context ====================

    /// The active language for this instance.
    pub fn language(&self) -> &str {
        self.lang.current()
    }

    /// Switch the active language. Stored values are untouched; subsequent
    /// reads and writes target `code`.
    pub fn set_language(&mut self, code: impl Into<String>) {
        self.lang.set_current(code);
    }

    /// The fallback language configured at construction, if any.
    pub fn fallback_language(&self) -> Option<&str> {
        self.lang.fallback()
    }

    // ==================== Translation Accessor ====================

    /// Read a field.
    ///
    /// For a translatable path this returns the value under the current
    /// language, else under the fallback language if one is configured,
    /// else `None`. For any other path it returns the slot directly.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if self.schema.registry().is_translatable(path) {
            let mapping = lookup(&self.body, path)?.as_object()?;
            mapping
                .get(self.lang.current())
                .or_else(|| self.lang.fallback().and_then(|fb| mapping.get(fb)))
        } else {
            lookup(&self.body, path)
        }
    }

    /// Write a field.
    ///
    /// For a translatable path the value is validated against the base
    /// type first and then stored under the current language; entries for
    /// other languages are never touched. For any other declared path the
    /// value is validated against its type and assigned. A failed write
    /// leaves the document unchanged.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        if let Some(base) = schema.registry().base_type_of(path) {
            let lang = self.lang.current().to_string();
            self.insert_translation(path, &lang, value, base)
        } else {
            let Some(ty) = schema.resolve(path) else {
                return Err(Error::UnknownField {
                    path: path.to_string(),
                });
            };
            validator::validate_field(path, &value, ty)?;
            *slot_mut(&mut self.body, path)? = value;
            Ok(())
        }
    }

    /// Write a translatable field under an explicit language, without
    /// switching the document's language context.
    pub fn set_for(&mut self, path: &str, lang: &str, value: Value) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let Some(base) = schema.registry().base_type_of(path) else {
            return Err(Error::NotTranslatable {
                path: path.to_string(),
            });
        };
        self.insert_translation(path, lang, value, base)
    }

    fn insert_translation(
        &mut self,
        path: &str,
        lang: &str,
        value: Value,
        base: &FieldType,
    ) -> Result<()> {
        validator::validate_field(path, &value, base).map_err(|e| e.with_language(lang))?;

        let slot = slot_mut(&mut self.body, path)?;
        match slot {
            // Unset slot: start a fresh mapping.
            Value::Null => {
                let mut mapping = Map::new();
                mapping.insert(lang.to_string(), value);
                *slot = Value::Object(mapping);
                Ok(())
            }
            Value::Object(mapping) => {
                mapping.insert(lang.to_string(), value);
                Ok(())
            }
            other => Err(Error::ExpectedI18n {
                path: path.to_string(),
                actual: type_name(other).to_string(),
            }),
        }
    }

    /// Read-only view of a translatable field's full mapping.
    pub fn translations(&self, path: &str) -> Result<Translations<'_>> {
        if !self.schema.registry().is_translatable(path) {
            return Err(Error::NotTranslatable {
                path: path.to_string(),
            });
        }
        match lookup(&self.body, path) {
            None | Some(Value::Null) => Ok(Translations { mapping: None }),
            Some(Value::Object(mapping)) => Ok(Translations {
                mapping: Some(mapping),
            }),
            Some(other) => Err(Error::ExpectedI18n {
                path: path.to_string(),
                actual: type_name(other).to_string(),
            }),
        }
    }

    // ==================== Keyed Fast Path ====================

    /// Read a slot directly, bypassing language resolution. For a
    /// translatable path this exposes the whole canonical mapping.
    pub fn get_raw(&self, path: &str) -> Option<&Value> {
        lookup(&self.body, path)
    }

    /// Write a slot directly, bypassing language resolution and
    /// validation. The caller is responsible for per-language consistency;
    /// validation still runs at save time.
    pub fn set_raw(&mut self, path: &str, value: Value) -> Result<()> {
        *slot_mut(&mut self.body, path)? = value;
        Ok(())
    }

    // ==================== Validation & Persistence ====================

    /// Validate the whole body against the schema.
    pub fn validate(&self) -> Result<()> {
        validator::validate_document(&self.schema, &self.body)
    }

    /// Produce the storage form of this document: every translatable field
    /// converted from its canonical mapping to an ordered record list.
    ///
    /// Fails with [`Error::ExpectedI18n`] when a translatable slot holds a
    /// non-mapping value (possible only via the raw path).
    pub fn to_storage(&self) -> Result<Value> {
        let mut stored = self.body.clone();
        for path in self.schema.registry().paths() {
            match lookup(&self.body, path) {
                None | Some(Value::Null) => continue,
                Some(Value::Object(mapping)) => {
                    let encoded = codec::to_storage(mapping);
                    if let Some(slot) = lookup_mut(&mut stored, path) {
                        *slot = encoded;
                    }
                }
                Some(other) => {
                    return Err(Error::ExpectedI18n {
                        path: path.to_string(),
                        actual: type_name(other).to_string(),
                    })
                }
            }
        }
        Ok(Value::Object(stored))
    }

    /// Rebuild a document from its storage form, converting every
    /// translatable field back to canonical form before field access
    /// proceeds.
    pub fn from_storage(schema: Arc<Schema>, config: &I18nConfig, stored: Value) -> Result<Self> {
        let Value::Object(mut body) = stored else {
            return Err(Error::TypeMismatch {
                path: schema.name().to_string(),
                expected: "document".to_string(),
                actual: type_name(&stored).to_string(),
            });
        };

        for path in schema.registry().paths() {
            let Some(slot) = lookup_mut(&mut body, path) else {
                continue;
            };
            match slot {
                Value::Null => {}
                Value::Array(records) => {
                    let decoded = codec::from_storage(path, records)?;
                    *slot = Value::Object(decoded);
                }
                other => {
                    return Err(Error::MalformedRecord {
                        path: path.to_string(),
                        reason: format!("expected a record list, got {}", type_name(other)),
                    })
                }
            }
        }

        Ok(Self {
            schema,
            body,
            lang: LanguageContext::from_config(config),
        })
    }

    /// Validate, encode and persist this document under `id`.
    pub fn save(&self, store: &JsonStore, id: &str) -> Result<()> {
        self.validate()?;
        self.save_unchecked(store, id)
    }

    /// Persist without validating. The storage encoding still runs, so a
    /// translatable slot holding a non-mapping value is still rejected.
    pub fn save_unchecked(&self, store: &JsonStore, id: &str) -> Result<()> {
        let stored = self.to_storage()?;
        store.save(self.schema.name(), id, &stored)?;
        debug!(collection = self.schema.name(), id, "saved document");
        Ok(())
    }

    /// Load a document by id, decoding translatable fields on the way in.
    pub fn load(
        store: &JsonStore,
        schema: Arc<Schema>,
        config: &I18nConfig,
        id: &str,
    ) -> Result<Option<Self>> {
        match store.load(schema.name(), id)? {
            Some(stored) => {
                debug!(collection = schema.name(), id, "loaded document");
                Ok(Some(Self::from_storage(schema, config, stored)?))
            }
            None => Ok(None),
        }
    }
}

/// Read-only view of one translatable field's canonical mapping.
///
/// Generated from the field registry; purely a convenience over the same
/// mapping the keyed fast path exposes.
#[derive(Debug, Clone, Copy)]
pub struct Translations<'a> {
    mapping: Option<&'a Map<String, Value>>,
}

impl<'a> Translations<'a> {
    /// The value stored under `lang`, with no fallback applied.
    pub fn get(&self, lang: &str) -> Option<&'a Value> {
        self.mapping.and_then(|m| m.get(lang))
    }

    /// Language codes with a value, in lexicographic order.
    pub fn languages(&self) -> Vec<&'a str> {
        self.mapping
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of languages with a value.
    pub fn len(&self) -> usize {
        self.mapping.map(Map::len).unwrap_or(0)
    }

    /// Whether no language has a value yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Navigate to a mutable slot, creating intermediate containers for
/// missing path segments. A missing leaf is initialized to `null`.
fn slot_mut<'a>(body: &'a mut Map<String, Value>, path: &str) -> Result<&'a mut Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(Error::UnknownField {
            path: path.to_string(),
        });
    };

    let mut current = body;
    let mut walked = String::new();
    for segment in parents {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            other => {
                return Err(Error::TypeMismatch {
                    path: walked,
                    expected: "document".to_string(),
                    actual: type_name(other).to_string(),
                })
            }
        };
    }

    Ok(current.entry(leaf.to_string()).or_insert(Value::Null))
}

/// Navigate a body tree mutably by dot-separated path, without creating
/// anything.
fn lookup_mut<'a>(body: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let mut segments = path.split('.');
    let mut current = body.get_mut(segments.next()?)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder("recipe")
                .field("title", FieldType::Text)
                .field("ingredients", FieldType::list(FieldType::Text))
                .field("servings", FieldType::Integer)
                .field(
                    "temperature",
                    FieldType::document([("degree", FieldType::Float), ("unit", FieldType::Text)]),
                )
                .translatable("title")
                .translatable("ingredients")
                .translatable("temperature.degree")
                .build()
                .expect("schema should build"),
        )
    }

    fn doc() -> Document {
        Document::new(schema())
    }

    // ==================== Get/Set Tests ====================

    #[test]
    fn test_set_then_get_current_language() {
        let mut doc = doc();
        doc.set("title", json!("Hello")).expect("set");
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_set_per_language_isolation() {
        let mut doc = doc();
        doc.set("title", json!("Hello")).expect("set en");

        doc.set_language("fr");
        assert_eq!(doc.get("title"), None);
        doc.set("title", json!("Salut")).expect("set fr");
        assert_eq!(doc.get("title"), Some(&json!("Salut")));

        doc.set_language("en");
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_get_unset_field_is_none() {
        let doc = doc();
        assert_eq!(doc.get("title"), None);
    }

    #[test]
    fn test_fallback_resolution() {
        let mut doc = Document::with_config(schema(), &I18nConfig::with_fallback("fr", "en"));
        doc.set_for("title", "en", json!("Hello")).expect("set en");

        // Current is fr with no value: the fallback answers.
        assert_eq!(doc.get("title"), Some(&json!("Hello")));

        doc.set("title", json!("Salut")).expect("set fr");
        assert_eq!(doc.get("title"), Some(&json!("Salut")));

        doc.set_language("en");
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_no_fallback_returns_none() {
        let mut doc = doc();
        doc.set_language("de");
        assert_eq!(doc.get("title"), None);
    }

    #[test]
    fn test_set_wrong_type_fails_without_mutation() {
        let mut doc = doc();
        doc.set("title", json!("Hello")).expect("set");

        let err = doc.set("title", json!(42)).expect_err("wrong base type");
        match err {
            Error::LanguageTypeMismatch { path, lang, .. } => {
                assert_eq!(path, "title");
                assert_eq!(lang, "en");
            }
            other => panic!("expected LanguageTypeMismatch, got {:?}", other),
        }

        // The mapping is exactly as it was before the failed write.
        assert_eq!(doc.get_raw("title"), Some(&json!({"en": "Hello"})));
    }

    #[test]
    fn test_set_non_translatable_field() {
        let mut doc = doc();
        doc.set("servings", json!(4)).expect("set");
        assert_eq!(doc.get("servings"), Some(&json!(4)));

        let err = doc.set("servings", json!("four")).expect_err("wrong type");
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(doc.get("servings"), Some(&json!(4)));
    }

    #[test]
    fn test_set_undeclared_path() {
        let mut doc = doc();
        let err = doc.set("bogus", json!(1)).expect_err("unknown");
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_nested_translatable_set_creates_parent() {
        let mut doc = doc();
        doc.set("temperature.degree", json!(21.5)).expect("set");

        assert_eq!(doc.get("temperature.degree"), Some(&json!(21.5)));
        assert_eq!(
            doc.get_raw("temperature"),
            Some(&json!({"degree": {"en": 21.5}}))
        );
    }

    #[test]
    fn test_list_field_is_one_unit_per_language() {
        let mut doc = doc();
        doc.set("ingredients", json!(["apple", "juice"])).expect("set en");
        doc.set_language("fr");
        doc.set("ingredients", json!(["pomme", "jus"])).expect("set fr");

        assert_eq!(
            doc.get_raw("ingredients"),
            Some(&json!({
                "en": ["apple", "juice"],
                "fr": ["pomme", "jus"],
            }))
        );
    }

    #[test]
    fn test_set_for_explicit_language() {
        let mut doc = doc();
        doc.set_for("title", "fr", json!("Salut")).expect("set");

        // Context is untouched.
        assert_eq!(doc.language(), "en");
        assert_eq!(doc.get("title"), None);

        doc.set_language("fr");
        assert_eq!(doc.get("title"), Some(&json!("Salut")));
    }

    #[test]
    fn test_set_for_rejects_non_translatable_path() {
        let mut doc = doc();
        let err = doc.set_for("servings", "en", json!(4)).expect_err("plain field");
        assert!(matches!(err, Error::NotTranslatable { .. }));
    }

    #[test]
    fn test_set_on_corrupted_slot_is_rejected() {
        let mut doc = doc();
        doc.set_raw("title", json!("raw string")).expect("raw write");

        let err = doc.set("title", json!("Hello")).expect_err("slot is not a mapping");
        assert!(matches!(err, Error::ExpectedI18n { .. }));
    }

    // ==================== Translations View Tests ====================

    #[test]
    fn test_translations_view() {
        let mut doc = doc();
        doc.set_for("title", "en", json!("Hello")).expect("set");
        doc.set_for("title", "fr", json!("Salut")).expect("set");

        let view = doc.translations("title").expect("view");
        assert_eq!(view.len(), 2);
        assert_eq!(view.languages(), vec!["en", "fr"]);
        assert_eq!(view.get("fr"), Some(&json!("Salut")));
        assert_eq!(view.get("de"), None);
    }

    #[test]
    fn test_translations_view_unset_field() {
        let doc = doc();
        let view = doc.translations("title").expect("view");
        assert!(view.is_empty());
        assert!(view.languages().is_empty());
    }

    #[test]
    fn test_translations_view_rejects_plain_field() {
        let doc = doc();
        let err = doc.translations("servings").expect_err("plain field");
        assert!(matches!(err, Error::NotTranslatable { .. }));
    }

    // ==================== Raw Access Tests ====================

    #[test]
    fn test_raw_and_resolved_share_one_mapping() {
        let mut doc = doc();
        doc.set_raw("title", json!({"en": "Hello", "fr": "Salut"}))
            .expect("raw write");

        // The accessor reads what the raw path wrote.
        assert_eq!(doc.get("title"), Some(&json!("Hello")));

        // And a resolved write is visible through the raw path.
        doc.set("title", json!("Hi")).expect("set");
        assert_eq!(
            doc.get_raw("title"),
            Some(&json!({"en": "Hi", "fr": "Salut"}))
        );
    }

    #[test]
    fn test_raw_get_has_no_fallback() {
        let mut doc = Document::with_config(schema(), &I18nConfig::with_fallback("fr", "en"));
        doc.set_for("title", "en", json!("Hello")).expect("set");

        // Resolved read falls back; raw read exposes the mapping itself.
        assert_eq!(doc.get("title"), Some(&json!("Hello")));
        assert_eq!(doc.get_raw("title"), Some(&json!({"en": "Hello"})));
    }

    // ==================== Storage Conversion Tests ====================

    #[test]
    fn test_to_storage_encodes_translatables() {
        let mut doc = doc();
        doc.set("title", json!("Hello")).expect("set en");
        doc.set_language("fr");
        doc.set("title", json!("Salut")).expect("set fr");
        doc.set("servings", json!(2)).expect("set servings");

        let stored = doc.to_storage().expect("encode");
        assert_eq!(
            stored,
            json!({
                "title": [
                    {"lang": "en", "value": "Hello"},
                    {"lang": "fr", "value": "Salut"},
                ],
                "servings": 2,
            })
        );
    }

    #[test]
    fn test_to_storage_empty_mapping_round_trips() {
        let mut doc = doc();
        doc.set_raw("title", json!({})).expect("raw write");

        let stored = doc.to_storage().expect("encode");
        assert_eq!(stored, json!({"title": []}));

        let restored =
            Document::from_storage(schema(), &I18nConfig::default(), stored).expect("decode");
        assert_eq!(restored.get_raw("title"), Some(&json!({})));
    }

    #[test]
    fn test_to_storage_rejects_corrupted_slot() {
        let mut doc = doc();
        doc.set_raw("title", json!("raw")).expect("raw write");

        let err = doc.to_storage().expect_err("slot is not a mapping");
        assert!(matches!(err, Error::ExpectedI18n { .. }));
    }

    #[test]
    fn test_from_storage_decodes_nested_translatable() {
        let stored = json!({
            "temperature": {
                "degree": [
                    {"lang": "en", "value": 21.5},
                    {"lang": "fr", "value": 21.5},
                ],
                "unit": "C",
            },
        });

        let doc =
            Document::from_storage(schema(), &I18nConfig::default(), stored).expect("decode");
        assert_eq!(doc.get("temperature.degree"), Some(&json!(21.5)));
        assert_eq!(doc.get("temperature.unit"), Some(&json!("C")));
    }

    #[test]
    fn test_from_storage_duplicate_language_fails() {
        let stored = json!({
            "title": [
                {"lang": "en", "value": "a"},
                {"lang": "en", "value": "b"},
            ],
        });

        let err = Document::from_storage(schema(), &I18nConfig::default(), stored)
            .expect_err("duplicate language");
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_from_storage_rejects_non_list_slot() {
        let stored = json!({"title": {"en": "Hello"}});
        let err = Document::from_storage(schema(), &I18nConfig::default(), stored)
            .expect_err("storage form must be a record list");
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_from_storage_rejects_non_object_document() {
        let err = Document::from_storage(schema(), &I18nConfig::default(), json!([1, 2]))
            .expect_err("document must be an object");
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_storage_round_trip_preserves_document() {
        let mut doc = doc();
        doc.set("title", json!("Hello")).expect("set");
        doc.set_for("title", "fr", json!("Salut")).expect("set");
        doc.set("ingredients", json!(["apple"])).expect("set");
        doc.set("servings", json!(4)).expect("set");
        doc.set("temperature.degree", json!(21.5)).expect("set");

        let stored = doc.to_storage().expect("encode");
        let restored =
            Document::from_storage(schema(), &I18nConfig::default(), stored).expect("decode");

        assert_eq!(restored.body(), doc.body());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_accepts_consistent_document() {
        let mut doc = doc();
        doc.set("title", json!("Hello")).expect("set");
        doc.set("servings", json!(4)).expect("set");
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_validate_flags_raw_corruption() {
        let mut doc = doc();
        doc.set_raw("title", json!("Hello")).expect("raw write");

        let err = doc.validate().expect_err("shape");
        assert_eq!(err.to_string(), "title must be an instance of i18n, not string");
    }
}
