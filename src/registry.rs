//! Registry of translatable field paths.
//!
//! Derived once per schema at registration time and immutable thereafter.
//! Maps each translatable dot-separated path to its base type, the type a
//! value under any single language must satisfy.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::schema::{resolve_path, FieldType};

/// Static per-schema i18n metadata, shared read-only by all instances.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    entries: BTreeMap<String, FieldType>,
}

impl FieldRegistry {
    /// Resolve every declared translatable path against the structure.
    ///
    /// Fails with [`Error::UnknownPath`] on the first path that does not
    /// resolve; a schema with a bad declaration is never usable.
    pub(crate) fn from_structure(
        schema: &str,
        structure: &BTreeMap<String, FieldType>,
        paths: &[String],
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for path in paths {
            let base = resolve_path(structure, path).ok_or_else(|| Error::UnknownPath {
                schema: schema.to_string(),
                path: path.clone(),
            })?;
            entries.insert(path.clone(), base.clone());
        }
        Ok(Self { entries })
    }

    /// Whether `path` was declared translatable.
    pub fn is_translatable(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// The base type of a translatable path, if it is one.
    pub fn base_type_of(&self, path: &str) -> Option<&FieldType> {
        self.entries.get(path)
    }

    /// All translatable paths, in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of translatable paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema declares no translatable paths at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
