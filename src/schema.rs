//! Schema declaration: typed document structure plus translatable and
//! required field sets.
//!
//! A [`Schema`] is built once, at registration time, and shared read-only
//! across every document instance (usually behind an `Arc`). Declaring a
//! translatable or required path that does not resolve in the structure is
//! a configuration error surfaced by [`SchemaBuilder::build`], never at
//! first use.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::FieldRegistry;

/// Declared type of a document field.
///
/// This is a closed set of tagged descriptors; the codec and the validator
/// dispatch over it instead of inspecting values ad hoc. A translatable
/// field's *base type* is the `FieldType` it would have if it were not
/// translatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 text
    Text,

    /// Signed integer
    Integer,

    /// Floating-point number
    Float,

    /// Boolean flag
    Boolean,

    /// Homogeneous list of the element type
    List(Box<FieldType>),

    /// Nested structure of named, typed fields
    Document(BTreeMap<String, FieldType>),
}

impl FieldType {
    /// Shorthand for a list of `element`.
    pub fn list(element: FieldType) -> Self {
        FieldType::List(Box::new(element))
    }

    /// Shorthand for a nested structure.
    pub fn document<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldType)>,
    {
        FieldType::Document(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::List(element) => write!(f, "list of {}", element),
            FieldType::Document(_) => write!(f, "document"),
        }
    }
}

/// Resolve a dot-separated path against a structure level.
///
/// Paths may traverse nested [`FieldType::Document`] containers; they never
/// index into lists.
pub(crate) fn resolve_path<'a>(
    structure: &'a BTreeMap<String, FieldType>,
    path: &str,
) -> Option<&'a FieldType> {
    let mut segments = path.split('.');
    let mut current = structure.get(segments.next()?)?;
    for segment in segments {
        match current {
            FieldType::Document(fields) => current = fields.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Immutable, registration-time description of a document class.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    structure: BTreeMap<String, FieldType>,
    required: BTreeSet<String>,
    registry: FieldRegistry,
}

impl Schema {
    /// Start declaring a schema with the given name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            structure: BTreeMap::new(),
            translatable: Vec::new(),
            required: BTreeSet::new(),
        }
    }

    /// The schema's name (collection name in the underlying store).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared top-level structure.
    pub fn structure(&self) -> &BTreeMap<String, FieldType> {
        &self.structure
    }

    /// The registry of translatable paths derived from this schema.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Paths that must be present and non-null at validation time.
    pub fn required_paths(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    /// Whether `path` was declared required.
    pub fn is_required(&self, path: &str) -> bool {
        self.required.contains(path)
    }

    /// Resolve a dot-separated path to its declared type.
    pub fn resolve(&self, path: &str) -> Option<&FieldType> {
        resolve_path(&self.structure, path)
    }
}

/// Builder for [`Schema`]; the only way to construct one.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    structure: BTreeMap<String, FieldType>,
    translatable: Vec<String>,
    required: BTreeSet<String>,
}

impl SchemaBuilder {
    /// Declare a top-level field with its type. Nested structures are
    /// declared inline via [`FieldType::document`].
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.structure.insert(name.into(), ty);
        self
    }

    /// Mark a dot-separated path as translatable.
    pub fn translatable(mut self, path: impl Into<String>) -> Self {
        self.translatable.push(path.into());
        self
    }

    /// Mark a dot-separated path as required.
    pub fn required(mut self, path: impl Into<String>) -> Self {
        self.required.insert(path.into());
        self
    }

    /// Finish the declaration, failing fast on any path that does not
    /// resolve in the structure.
    pub fn build(self) -> Result<Schema> {
        for path in &self.required {
            if resolve_path(&self.structure, path).is_none() {
                return Err(Error::UnknownPath {
                    schema: self.name.clone(),
                    path: path.clone(),
                });
            }
        }

        let registry = FieldRegistry::from_structure(&self.name, &self.structure, &self.translatable)?;

        debug!(
            schema = %self.name,
            fields = self.structure.len(),
            translatable = registry.len(),
            "registered schema"
        );

        Ok(Schema {
            name: self.name,
            structure: self.structure,
            required: self.required,
            registry,
        })
    }
}
