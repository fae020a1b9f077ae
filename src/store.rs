//! Unified store over every storage backend.
//!
//! [`LexbaseStore`] is the single entry point: one ordered, binary-safe API
//! regardless of which engine holds the bytes. Engines that keep keys in
//! byte order (sled, redb) serve range scans natively; the in-memory hash
//! engine is wrapped in an [`IndexedBackend`] that maintains the same order
//! in an auxiliary index. Callers see identical results either way, modulo
//! each backend's iteration consistency.
//!
//! # Examples
//!
//! ```
//! use lexbase_store::LexbaseStore;
//!
//! # fn main() -> lexbase_store::LexbaseResult<()> {
//! let store = LexbaseStore::memory()?;
//! store.put(b"pet/1", b"ziggy")?;
//! store.put(b"pet/2", b"momo")?;
//! store.put(b"plant/1", b"fern")?;
//!
//! let names = store
//!     .prefix_keys(b"pet/", true)?
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(names, vec![b"1".to_vec(), b"2".to_vec()]);
//! store.close()?;
//! # Ok(())
//! # }
//! ```

#[cfg(any(feature = "sled", feature = "redb"))]
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::backend::{IndexedBackend, OrderedBackend, RawBackend};
#[cfg(any(feature = "sled", feature = "redb"))]
use crate::config::FileConfig;
use crate::config::MemoryConfig;
use crate::databases::memory_store::MemoryStore;
#[cfg(feature = "redb")]
use crate::databases::redb_store::RedbStore;
#[cfg(feature = "sled")]
use crate::databases::sled_store::SledStore;
use crate::error::{LexbaseError, LexbaseResult};
use crate::iter::{KeyIter, RangeIter, RangeSource};

/// Pairs handled per engine write batch by [`LexbaseStore::put_many`] and
/// [`LexbaseStore::delete_many`].
pub const WRITE_BATCH_SIZE: usize = 30_000;

enum StoreBackend {
    #[cfg(feature = "sled")]
    Sled(SledStore),
    #[cfg(feature = "redb")]
    Redb(RedbStore),
    Memory(IndexedBackend<MemoryStore>),
}

/// Ordered, binary-safe key-value store over a chosen backend.
pub struct LexbaseStore {
    backend: StoreBackend,
    closed: Arc<AtomicBool>,
}

#[cfg(feature = "sled")]
impl LexbaseStore {
    /// Open a sled-backed store at the given path, creating it if missing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lexbase_store::LexbaseStore;
    ///
    /// # fn main() -> lexbase_store::LexbaseResult<()> {
    /// let store = LexbaseStore::sled("./my_database")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn sled<P: AsRef<Path>>(path: P) -> LexbaseResult<Self> {
        Ok(Self::from_backend(StoreBackend::Sled(SledStore::new(
            path,
        )?)))
    }

    /// Open a sled-backed store with explicit options.
    pub fn sled_with_config(config: FileConfig) -> LexbaseResult<Self> {
        Ok(Self::from_backend(StoreBackend::Sled(
            SledStore::with_config(config)?,
        )))
    }

    /// Open a temporary sled-backed store, removed when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexbase_store::LexbaseStore;
    ///
    /// # fn main() -> lexbase_store::LexbaseResult<()> {
    /// let store = LexbaseStore::temp()?;
    /// store.put(b"scratch", b"data")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn temp() -> LexbaseResult<Self> {
        Ok(Self::from_backend(StoreBackend::Sled(SledStore::temp()?)))
    }
}

#[cfg(feature = "redb")]
impl LexbaseStore {
    /// Open a redb-backed store at the given path, creating it if missing.
    pub fn redb<P: AsRef<Path>>(path: P) -> LexbaseResult<Self> {
        Ok(Self::from_backend(StoreBackend::Redb(RedbStore::new(
            path,
        )?)))
    }

    /// Open a redb-backed store with explicit options.
    pub fn redb_with_config(config: FileConfig) -> LexbaseResult<Self> {
        Ok(Self::from_backend(StoreBackend::Redb(
            RedbStore::with_config(config)?,
        )))
    }
}

impl LexbaseStore {
    /// Open an in-memory store. The hash engine holds the bytes; ordering
    /// comes from the auxiliary index it is wrapped in.
    pub fn memory() -> LexbaseResult<Self> {
        Self::memory_with_config(MemoryConfig::default())
    }

    /// Open an in-memory store with explicit options.
    pub fn memory_with_config(config: MemoryConfig) -> LexbaseResult<Self> {
        let engine = MemoryStore::with_config(config);
        Ok(Self::from_backend(StoreBackend::Memory(
            IndexedBackend::new(engine)?,
        )))
    }

    fn from_backend(backend: StoreBackend) -> Self {
        Self {
            backend,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn raw(&self) -> &dyn RawBackend {
        match &self.backend {
            #[cfg(feature = "sled")]
            StoreBackend::Sled(store) => store,
            #[cfg(feature = "redb")]
            StoreBackend::Redb(store) => store,
            StoreBackend::Memory(backend) => backend,
        }
    }

    fn ensure_open(&self) -> LexbaseResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LexbaseError::Closed);
        }
        Ok(())
    }

    fn range_source(
        &self,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> LexbaseResult<RangeSource> {
        match &self.backend {
            #[cfg(feature = "sled")]
            StoreBackend::Sled(store) => Ok(RangeSource::Sled(store.range_cursor(from, to)?)),
            #[cfg(feature = "redb")]
            StoreBackend::Redb(store) => Ok(RangeSource::Redb(store.range_cursor(from, to)?)),
            StoreBackend::Memory(backend) => {
                Ok(RangeSource::Index(backend.range_cursor(from, to)?))
            }
        }
    }

    /// Fetch the value stored under `key`; `Ok(None)` when absent.
    pub fn get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>> {
        self.ensure_open()?;
        self.raw().raw_get(key)
    }

    /// Store `value` under `key`, overwriting any previous value.
    pub fn put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()> {
        self.ensure_open()?;
        self.raw().raw_put(key, value)
    }

    /// Remove `key`. Removing an absent key is a no-op.
    pub fn delete(&self, key: &[u8]) -> LexbaseResult<()> {
        self.ensure_open()?;
        self.raw().raw_delete(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        self.ensure_open()?;
        self.raw().raw_contains(key)
    }

    /// Store many pairs, [`WRITE_BATCH_SIZE`] of them per engine write.
    /// Batches are not atomic with one another: if one fails, the pairs of
    /// already-completed batches stay stored.
    pub fn put_many<I>(&self, pairs: I) -> LexbaseResult<()>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        self.ensure_open()?;
        let mut written = 0usize;
        let mut batches = 0usize;
        let mut chunk: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        for pair in pairs {
            chunk.push(pair);
            if chunk.len() == WRITE_BATCH_SIZE {
                self.write_chunk(&chunk)?;
                written += chunk.len();
                batches += 1;
                chunk.clear();
            }
        }
        if !chunk.is_empty() {
            self.write_chunk(&chunk)?;
            written += chunk.len();
            batches += 1;
        }
        debug!("wrote {written} pairs in {batches} batches");
        Ok(())
    }

    /// Remove many keys, [`WRITE_BATCH_SIZE`] of them per engine write, with
    /// the same batch semantics as [`LexbaseStore::put_many`].
    pub fn delete_many<I>(&self, keys: I) -> LexbaseResult<()>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.ensure_open()?;
        let mut removed = 0usize;
        let mut batches = 0usize;
        let mut chunk: Vec<Vec<u8>> = Vec::new();
        for key in keys {
            chunk.push(key);
            if chunk.len() == WRITE_BATCH_SIZE {
                self.delete_chunk(&chunk)?;
                removed += chunk.len();
                batches += 1;
                chunk.clear();
            }
        }
        if !chunk.is_empty() {
            self.delete_chunk(&chunk)?;
            removed += chunk.len();
            batches += 1;
        }
        debug!("removed {removed} keys in {batches} batches");
        Ok(())
    }

    fn write_chunk(&self, pairs: &[(Vec<u8>, Vec<u8>)]) -> LexbaseResult<()> {
        match &self.backend {
            #[cfg(feature = "sled")]
            StoreBackend::Sled(store) => {
                let mut batch = sled::Batch::default();
                for (key, value) in pairs {
                    batch.insert(key.as_slice(), value.as_slice());
                }
                store.apply_batch(batch)
            }
            #[cfg(feature = "redb")]
            StoreBackend::Redb(store) => store.put_chunk(pairs),
            StoreBackend::Memory(backend) => backend.put_chunk(pairs),
        }
    }

    fn delete_chunk(&self, keys: &[Vec<u8>]) -> LexbaseResult<()> {
        match &self.backend {
            #[cfg(feature = "sled")]
            StoreBackend::Sled(store) => {
                let mut batch = sled::Batch::default();
                for key in keys {
                    batch.remove(key.as_slice());
                }
                store.apply_batch(batch)
            }
            #[cfg(feature = "redb")]
            StoreBackend::Redb(store) => store.delete_chunk(keys),
            StoreBackend::Memory(backend) => backend.delete_chunk(keys),
        }
    }

    /// Iterate `(key, value)` pairs with `from <= key <= to` in key order.
    /// `None` leaves that end unbounded; `from > to` yields nothing.
    pub fn items(&self, from: Option<&[u8]>, to: Option<&[u8]>) -> LexbaseResult<RangeIter> {
        self.ensure_open()?;
        Ok(RangeIter::new(
            self.range_source(from, to)?,
            Arc::clone(&self.closed),
        ))
    }

    /// Iterate keys with `from <= key <= to` in key order.
    pub fn keys(&self, from: Option<&[u8]>, to: Option<&[u8]>) -> LexbaseResult<KeyIter> {
        self.ensure_open()?;
        Ok(KeyIter::new(
            self.range_source(from, to)?,
            Arc::clone(&self.closed),
        ))
    }

    /// Iterate pairs whose keys start with `prefix`, in key order. The scan
    /// seeks to the prefix and stops at the first key outside it. With
    /// `strip_prefix` the yielded keys have the prefix removed.
    pub fn prefix_items(&self, prefix: &[u8], strip_prefix: bool) -> LexbaseResult<RangeIter> {
        self.ensure_open()?;
        let source = self.range_source(Some(prefix), None)?;
        Ok(RangeIter::with_prefix(
            source,
            Arc::clone(&self.closed),
            prefix.to_vec(),
            strip_prefix,
        ))
    }

    /// Iterate keys that start with `prefix`, optionally stripped.
    pub fn prefix_keys(&self, prefix: &[u8], strip_prefix: bool) -> LexbaseResult<KeyIter> {
        self.ensure_open()?;
        let source = self.range_source(Some(prefix), None)?;
        Ok(KeyIter::with_prefix(
            source,
            Arc::clone(&self.closed),
            prefix.to_vec(),
            strip_prefix,
        ))
    }

    /// Flush and mark the store closed. Idempotent. Every data operation on
    /// a closed store, including pulls on iterators created earlier, reports
    /// [`LexbaseError::Closed`].
    pub fn close(&self) -> LexbaseResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("closing {} store", self.raw().name());
        self.raw().close()
    }

    /// Whether [`close`](LexbaseStore::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Name of the engine holding the data: `"sled"`, `"redb"` or `"memory"`.
    pub fn backend_name(&self) -> &'static str {
        self.raw().name()
    }

    /// Whether the engine keeps keys in byte order itself. `false` means
    /// range scans are served from the auxiliary index.
    pub fn supports_native_order(&self) -> bool {
        self.raw().supports_native_order()
    }
}
