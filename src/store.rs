//! File-backed document store.
//!
//! The persistence boundary of the mapping layer: documents go in and come
//! out in storage form (`serde_json::Value` trees with translatable fields
//! already encoded as record lists, see [`crate::codec`]). The store
//! itself knows nothing about i18n; it keys documents by collection and id
//! and flushes the whole tree to a JSON file on every write.
//!
//! Cloning a [`JsonStore`] shares the underlying connection, like a
//! database handle.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// A document store persisted as a single JSON file.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    path: PathBuf,
    collections: Collections,
}

impl JsonStore {
    /// Open a store at `path`, loading existing contents if the file is
    /// already there.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let collections: Collections = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Collections::new()
        };

        info!(
            path = %path.display(),
            collections = collections.len(),
            "opened document store"
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(StoreInner { path, collections })),
        })
    }

    /// Insert or replace the document stored under `id`.
    pub fn save(&self, collection: &str, id: &str, document: &Value) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        inner.flush()?;
        debug!(collection, id, "stored document");
        Ok(())
    }

    /// Fetch the document stored under `id`, if any.
    pub fn load(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    /// Remove the document stored under `id`. Returns whether anything was
    /// removed.
    pub fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let removed = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            inner.flush()?;
            debug!(collection, id, "deleted document");
        }
        Ok(removed)
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .collections
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    /// Ids present in a collection, in lexicographic order.
    pub fn ids(&self, collection: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .collections
            .get(collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl StoreInner {
    fn flush(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.collections)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
