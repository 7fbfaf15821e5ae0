//! # Lookup Table
//!
//! Maps a [`LookupKey`] to the schema compiled for that operation and the
//! `basePath` of the document it came from.
//!
//! The store is an explicit value owned by the caller and handed to both
//! the compiler and the validator. Clones share the same table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sjv_core::LookupKey;

use crate::resolve::CompiledSchema;

/// One Lookup Table entry.
#[derive(Debug, Clone)]
pub struct StoredSchema {
    /// `basePath` of the merged document, if it declared one.
    pub base_path: Option<String>,
    /// The compiled schema for the operation.
    pub schema: CompiledSchema,
}

/// Thread-safe, cloneable schema table.
///
/// Entries are stored behind `Arc`, so a reader always sees a base path
/// and schema from the same compilation. The lock is `parking_lot`, which
/// does not poison on a panicking writer.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    entries: Arc<RwLock<HashMap<LookupKey, Arc<StoredSchema>>>>,
}

impl SchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced.
    pub fn put(&self, key: LookupKey, entry: StoredSchema) -> Option<Arc<StoredSchema>> {
        self.entries.write().insert(key, Arc::new(entry))
    }

    /// Insert many entries under a single write lock.
    ///
    /// Readers observe either none or all of them. Later entries for the
    /// same key replace earlier ones.
    pub fn put_all(&self, entries: impl IntoIterator<Item = (LookupKey, StoredSchema)>) {
        let mut guard = self.entries.write();
        for (key, entry) in entries {
            guard.insert(key, Arc::new(entry));
        }
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<Arc<StoredSchema>> {
        self.entries.read().get(key).cloned()
    }

    /// Check whether a key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<LookupKey> {
        let mut keys: Vec<LookupKey> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
