//! Hash-map storage engine.
//!
//! The unordered engine of the set: point operations are O(1) average, but
//! the map keeps no key order, so ordered traversal goes through
//! [`IndexedBackend`](crate::backend::IndexedBackend). Clones share the same
//! underlying map, which is how detached cursors keep a live handle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::{BoxedScan, RawBackend};
use crate::config::MemoryConfig;
use crate::error::{LexbaseError, LexbaseResult};

type Entries = HashMap<Vec<u8>, Vec<u8>>;

/// In-memory hash engine. Cheap to create; nothing is persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryStore {
    /// Create an empty store with the default capacity hint.
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    /// Create an empty store sized by `config.initial_capacity`.
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::with_capacity(config.initial_capacity))),
        }
    }

    fn read(&self) -> LexbaseResult<RwLockReadGuard<'_, Entries>> {
        self.entries
            .read()
            .map_err(|_| LexbaseError::Backend("memory store lock poisoned".into()))
    }

    fn write(&self) -> LexbaseResult<RwLockWriteGuard<'_, Entries>> {
        self.entries
            .write()
            .map_err(|_| LexbaseError::Backend("memory store lock poisoned".into()))
    }
}

impl RawBackend for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn raw_get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn raw_put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()> {
        self.write()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn raw_delete(&self, key: &[u8]) -> LexbaseResult<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn raw_contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        Ok(self.read()?.contains_key(key))
    }

    fn raw_scan(&self) -> LexbaseResult<BoxedScan> {
        let pairs: Vec<LexbaseResult<(Vec<u8>, Vec<u8>)>> = self
            .read()?
            .iter()
            .map(|(key, value)| Ok((key.clone(), value.clone())))
            .collect();
        Ok(Box::new(pairs.into_iter()))
    }

    fn supports_native_order(&self) -> bool {
        false
    }

    fn close(&self) -> LexbaseResult<()> {
        // Nothing buffered, nothing on disk.
        Ok(())
    }
}
