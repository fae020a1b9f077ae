//! Ordered adaptation of unordered engines.
//!
//! [`IndexedBackend`] pairs a [`RawBackend`] with one
//! [`OrderedIndex`] holding the engine's key set in byte order. Both halves
//! live behind a single lock, so every mutation updates engine and index as
//! one critical section and the parity invariant (index key set equals
//! engine key set) holds between operations.
//!
//! When an engine mutation fails, the adapter re-reads the key and patches
//! the index to whatever the engine actually holds. If that re-read also
//! fails, parity can no longer be guaranteed and the adapter poisons itself:
//! every later operation refuses with
//! [`LexbaseError::IndexParity`] instead of risking wrong ordering.
//!
//! Range traversal uses [`IndexCursor`], a detached cursor that re-seeks the
//! index on every pull (last yielded key + upper bound), then fetches the
//! value from the engine. Keys deleted between pulls are skipped; no lock is
//! held between pulls.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};

use crate::backend::{BoxedScan, OrderedBackend, RawBackend};
use crate::error::{LexbaseError, LexbaseResult};
use crate::index::OrderedIndex;

struct IndexedInner<B> {
    engine: B,
    index: OrderedIndex,
    poisoned: bool,
}

fn poisoned_error() -> LexbaseError {
    LexbaseError::IndexParity(
        "adapter poisoned by an earlier unrecoverable mutation failure".into(),
    )
}

impl<B: RawBackend> IndexedInner<B> {
    fn refuse_if_poisoned(&self) -> LexbaseResult<()> {
        if self.poisoned {
            Err(poisoned_error())
        } else {
            Ok(())
        }
    }

    /// After a failed engine mutation, patch the index to the state the
    /// engine actually holds for `key`. Poisons the adapter when the engine
    /// cannot even be read back.
    fn resync(&mut self, key: &[u8]) -> LexbaseResult<()> {
        match self.engine.raw_get(key) {
            Ok(Some(_)) => {
                self.index.insert(key.to_vec());
                Ok(())
            }
            Ok(None) => {
                self.index.remove(key);
                Ok(())
            }
            Err(read_err) => {
                self.poisoned = true;
                warn!(
                    "index resync read failed after a mutation error; poisoning {} adapter: {read_err}",
                    self.engine.name()
                );
                Err(LexbaseError::IndexParity(format!(
                    "resync read failed: {read_err}"
                )))
            }
        }
    }
}

/// Unordered engine plus the ordered index that gives it sorted traversal.
pub struct IndexedBackend<B> {
    shared: Arc<RwLock<IndexedInner<B>>>,
    name: &'static str,
    native_order: bool,
}

impl<B: RawBackend> IndexedBackend<B> {
    /// Wrap an engine, seeding the index with every key it already holds.
    pub fn new(engine: B) -> LexbaseResult<Self> {
        let name = engine.name();
        let native_order = engine.supports_native_order();
        if native_order {
            debug!("{name} engine reports native ordering; auxiliary index is redundant");
        }
        let mut index = OrderedIndex::new();
        for pair in engine.raw_scan()? {
            let (key, _) = pair?;
            index.insert(key);
        }
        debug!("seeded ordered index over {name} engine: {} keys", index.len());
        Ok(Self {
            shared: Arc::new(RwLock::new(IndexedInner {
                engine,
                index,
                poisoned: false,
            })),
            name,
            native_order,
        })
    }

    fn read(&self) -> LexbaseResult<RwLockReadGuard<'_, IndexedInner<B>>> {
        self.shared
            .read()
            .map_err(|_| LexbaseError::Backend("indexed adapter lock poisoned".into()))
    }

    fn write(&self) -> LexbaseResult<RwLockWriteGuard<'_, IndexedInner<B>>> {
        self.shared
            .write()
            .map_err(|_| LexbaseError::Backend("indexed adapter lock poisoned".into()))
    }

    pub fn get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>> {
        let inner = self.read()?;
        inner.refuse_if_poisoned()?;
        inner.engine.raw_get(key)
    }

    /// Write to the engine, then index the key, inside one critical section.
    /// The index insert runs even when overwriting an existing key.
    pub fn put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()> {
        let mut inner = self.write()?;
        inner.refuse_if_poisoned()?;
        match inner.engine.raw_put(key, value) {
            Ok(()) => {
                inner.index.insert(key.to_vec());
                Ok(())
            }
            Err(err) => {
                inner.resync(key)?;
                Err(err)
            }
        }
    }

    pub fn delete(&self, key: &[u8]) -> LexbaseResult<()> {
        let mut inner = self.write()?;
        inner.refuse_if_poisoned()?;
        match inner.engine.raw_delete(key) {
            Ok(()) => {
                inner.index.remove(key);
                Ok(())
            }
            Err(err) => {
                inner.resync(key)?;
                Err(err)
            }
        }
    }

    /// Write one chunk of pairs under a single lock acquisition. Parity is
    /// kept per key; the first engine failure ends the chunk.
    pub(crate) fn put_chunk(&self, pairs: &[(Vec<u8>, Vec<u8>)]) -> LexbaseResult<()> {
        let mut inner = self.write()?;
        inner.refuse_if_poisoned()?;
        for (key, value) in pairs {
            match inner.engine.raw_put(key, value) {
                Ok(()) => {
                    inner.index.insert(key.clone());
                }
                Err(err) => {
                    inner.resync(key)?;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Remove one chunk of keys under a single lock acquisition.
    pub(crate) fn delete_chunk(&self, keys: &[Vec<u8>]) -> LexbaseResult<()> {
        let mut inner = self.write()?;
        inner.refuse_if_poisoned()?;
        for key in keys {
            match inner.engine.raw_delete(key) {
                Ok(()) => {
                    inner.index.remove(key);
                }
                Err(err) => {
                    inner.resync(key)?;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Existence from the index alone; parity makes this exact, and it never
    /// touches the engine.
    pub fn contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        let inner = self.read()?;
        inner.refuse_if_poisoned()?;
        Ok(inner.index.contains(key))
    }

    /// Release the engine. Allowed even when poisoned so resources are not
    /// stranded.
    pub fn close(&self) -> LexbaseResult<()> {
        self.read()?.engine.close()
    }

    /// Detached cursor over `from ..= to`. Construction is infallible; all
    /// checks happen at pull time.
    pub fn cursor(&self, from: Option<&[u8]>, to: Option<&[u8]>) -> IndexCursor<B> {
        IndexCursor {
            shared: Arc::clone(&self.shared),
            from: from.map(<[u8]>::to_vec),
            to: to.map(<[u8]>::to_vec),
            pos: None,
            done: false,
        }
    }
}

// The adapter is itself a backend, so a store can treat every engine alike.
impl<B: RawBackend> RawBackend for IndexedBackend<B> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn raw_get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>> {
        self.get(key)
    }

    fn raw_put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()> {
        self.put(key, value)
    }

    fn raw_delete(&self, key: &[u8]) -> LexbaseResult<()> {
        self.delete(key)
    }

    fn raw_contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        self.contains(key)
    }

    fn raw_scan(&self) -> LexbaseResult<BoxedScan> {
        let inner = self.read()?;
        inner.refuse_if_poisoned()?;
        inner.engine.raw_scan()
    }

    /// Reports the wrapped engine's capability: the order served here comes
    /// from the auxiliary index, not the engine.
    fn supports_native_order(&self) -> bool {
        self.native_order
    }

    fn close(&self) -> LexbaseResult<()> {
        IndexedBackend::close(self)
    }
}

impl<B: RawBackend> OrderedBackend for IndexedBackend<B> {
    type RangeCursor = IndexCursor<B>;

    fn range_cursor(
        &self,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> LexbaseResult<Self::RangeCursor> {
        Ok(self.cursor(from, to))
    }
}

/// Forward-only cursor over an [`IndexedBackend`] range.
///
/// Holds no lock between pulls: each `next` re-seeks the index past the last
/// yielded key, then fetches the value from the engine. A key present in the
/// index but gone from the engine by fetch time was deleted mid-iteration
/// and is skipped. Exhaustion is final: keys inserted behind an exhausted
/// cursor do not revive it.
pub struct IndexCursor<B> {
    shared: Arc<RwLock<IndexedInner<B>>>,
    from: Option<Vec<u8>>,
    to: Option<Vec<u8>>,
    pos: Option<Vec<u8>>,
    done: bool,
}

impl<B: RawBackend> IndexCursor<B> {
    fn seek(&self, inner: &IndexedInner<B>) -> Option<Vec<u8>> {
        match &self.pos {
            Some(last) => inner.index.next_after(Some(last), self.to.as_deref()),
            None => inner
                .index
                .range(self.from.as_deref(), self.to.as_deref())
                .next()
                .map(<[u8]>::to_vec),
        }
    }

    /// Next key in order, without touching the engine. Parity guarantees
    /// index membership equals engine membership.
    pub(crate) fn next_key(&mut self) -> Option<LexbaseResult<Vec<u8>>> {
        if self.done {
            return None;
        }
        let inner = match self.shared.read() {
            Ok(guard) => guard,
            Err(_) => {
                self.done = true;
                return Some(Err(LexbaseError::Backend(
                    "indexed adapter lock poisoned".into(),
                )));
            }
        };
        if inner.poisoned {
            self.done = true;
            return Some(Err(poisoned_error()));
        }
        match self.seek(&inner) {
            Some(key) => {
                drop(inner);
                self.pos = Some(key.clone());
                Some(Ok(key))
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    /// Next (key, value) pair in order, skipping keys deleted between the
    /// index walk and the value fetch.
    pub(crate) fn next_pair(&mut self) -> Option<LexbaseResult<(Vec<u8>, Vec<u8>)>> {
        if self.done {
            return None;
        }
        loop {
            let inner = match self.shared.read() {
                Ok(guard) => guard,
                Err(_) => {
                    self.done = true;
                    return Some(Err(LexbaseError::Backend(
                        "indexed adapter lock poisoned".into(),
                    )));
                }
            };
            if inner.poisoned {
                self.done = true;
                return Some(Err(poisoned_error()));
            }
            let Some(key) = self.seek(&inner) else {
                self.done = true;
                return None;
            };
            let fetched = inner.engine.raw_get(&key);
            drop(inner);
            self.pos = Some(key.clone());
            match fetched {
                Ok(Some(value)) => return Some(Ok((key, value))),
                // Deleted between index walk and fetch: treat as deleted.
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<B: RawBackend> Iterator for IndexCursor<B> {
    type Item = LexbaseResult<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_pair()
    }
}
