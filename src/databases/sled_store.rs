//! Storage engine over the [sled](https://docs.rs/sled) embedded database.
//!
//! Keys live in the database's default tree, which sled already keeps in
//! byte-lexicographic order, so this engine serves range cursors natively.
//! Cursors are live: mutations made while iterating may become visible.

use std::cmp::Ordering as CmpOrdering;
use std::ops::Bound;
use std::path::Path;

use log::debug;

use crate::backend::{BoxedScan, OrderedBackend, RawBackend};
use crate::config::FileConfig;
use crate::error::{LexbaseError, LexbaseResult};
use crate::ordering::compare;

/// sled-backed engine.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open a database at `path`, creating it if missing.
    pub fn new<P: AsRef<Path>>(path: P) -> LexbaseResult<Self> {
        Self::with_config(FileConfig::new(path.as_ref()))
    }

    /// Open a database described by `config`.
    pub fn with_config(config: FileConfig) -> LexbaseResult<Self> {
        if config.truncate && config.path.exists() {
            debug!("truncating sled store at {}", config.path.display());
            std::fs::remove_dir_all(&config.path)?;
        }
        if !config.create_if_missing && !config.path.exists() {
            return Err(LexbaseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no sled database at {}", config.path.display()),
            )));
        }
        debug!("opening sled store at {}", config.path.display());
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity((config.cache_size_mb * 1024 * 1024) as u64)
            .open()?;
        Ok(Self { db })
    }

    /// Open a throwaway database that sled removes when dropped.
    pub fn temp() -> LexbaseResult<Self> {
        debug!("opening temporary sled store");
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Direct access to the underlying sled database.
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Apply one pre-assembled batch of writes atomically.
    pub(crate) fn apply_batch(&self, batch: sled::Batch) -> LexbaseResult<()> {
        self.db.apply_batch(batch)?;
        Ok(())
    }
}

impl RawBackend for SledStore {
    fn name(&self) -> &'static str {
        "sled"
    }

    fn raw_get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|ivec| ivec.to_vec()))
    }

    fn raw_put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn raw_delete(&self, key: &[u8]) -> LexbaseResult<()> {
        self.db.remove(key)?;
        Ok(())
    }

    fn raw_contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        Ok(self.db.contains_key(key)?)
    }

    fn raw_scan(&self) -> LexbaseResult<BoxedScan> {
        Ok(Box::new(SledCursor {
            inner: Some(self.db.iter()),
        }))
    }

    fn supports_native_order(&self) -> bool {
        true
    }

    fn close(&self) -> LexbaseResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl OrderedBackend for SledStore {
    type RangeCursor = SledCursor;

    fn range_cursor(
        &self,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> LexbaseResult<Self::RangeCursor> {
        if let (Some(a), Some(b)) = (from, to) {
            if compare(a, b) == CmpOrdering::Greater {
                return Ok(SledCursor { inner: None });
            }
        }
        let lower = from.map_or(Bound::Unbounded, Bound::Included);
        let upper = to.map_or(Bound::Unbounded, Bound::Included);
        Ok(SledCursor {
            inner: Some(self.db.range::<&[u8], _>((lower, upper))),
        })
    }
}

/// Owned cursor over a sled range; `None` stands for the empty window.
pub struct SledCursor {
    inner: Option<sled::Iter>,
}

impl Iterator for SledCursor {
    type Item = LexbaseResult<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(|result| {
            result
                .map(|(key, value)| (key.to_vec(), value.to_vec()))
                .map_err(Into::into)
        })
    }
}
