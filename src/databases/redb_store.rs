//! Storage engine over the [redb](https://docs.rs/redb) embedded database.
//!
//! Every pair lives in a single table whose keys redb keeps in
//! byte-lexicographic order, so this engine serves range cursors natively.
//! Cursors read from the snapshot taken when they were created; writes
//! committed afterwards do not appear in them.

use std::cmp::Ordering as CmpOrdering;
use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use redb::{Database, ReadableDatabase, TableDefinition};

use crate::backend::{BoxedScan, OrderedBackend, RawBackend};
use crate::config::FileConfig;
use crate::error::{LexbaseError, LexbaseResult};
use crate::ordering::compare;

const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("kv");

/// redb-backed engine.
#[derive(Clone, Debug)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open a database at `path`, creating it if missing.
    pub fn new<P: AsRef<Path>>(path: P) -> LexbaseResult<Self> {
        Self::with_config(FileConfig::new(path.as_ref()))
    }

    /// Open a database described by `config`.
    pub fn with_config(config: FileConfig) -> LexbaseResult<Self> {
        if config.truncate && config.path.exists() {
            debug!("truncating redb store at {}", config.path.display());
            std::fs::remove_file(&config.path)?;
        }
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_mb * 1024 * 1024);
        let db = if config.path.exists() {
            debug!("opening redb store at {}", config.path.display());
            builder.open(&config.path)?
        } else if config.create_if_missing {
            debug!("creating redb store at {}", config.path.display());
            builder.create(&config.path)?
        } else {
            return Err(LexbaseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no redb database at {}", config.path.display()),
            )));
        };
        Ok(Self { db: Arc::new(db) })
    }

    /// Direct access to the underlying redb database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Write one chunk of pairs inside a single transaction.
    pub(crate) fn put_chunk(&self, pairs: &[(Vec<u8>, Vec<u8>)]) -> LexbaseResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE)?;
            for (key, value) in pairs {
                table.insert(key.as_slice(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove one chunk of keys inside a single transaction.
    pub(crate) fn delete_chunk(&self, keys: &[Vec<u8>]) -> LexbaseResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE)?;
            for key in keys {
                table.remove(key.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn snapshot_cursor(
        &self,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> LexbaseResult<RedbCursor> {
        if let (Some(a), Some(b)) = (from, to) {
            if compare(a, b) == CmpOrdering::Greater {
                return Ok(RedbCursor { inner: None });
            }
        }
        let read_txn = self.db.begin_read()?;
        // A table only exists once something has been written to it.
        let table = match read_txn.open_table(TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(RedbCursor { inner: None }),
            Err(err) => return Err(err.into()),
        };
        let lower: Bound<&[u8]> = from.map_or(Bound::Unbounded, Bound::Included);
        let upper: Bound<&[u8]> = to.map_or(Bound::Unbounded, Bound::Included);
        Ok(RedbCursor {
            inner: Some(table.range::<&[u8]>((lower, upper))?),
        })
    }
}

impl RawBackend for RedbStore {
    fn name(&self) -> &'static str {
        "redb"
    }

    fn raw_get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn raw_put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn raw_delete(&self, key: &[u8]) -> LexbaseResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn raw_contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        Ok(table.get(key)?.is_some())
    }

    fn raw_scan(&self) -> LexbaseResult<BoxedScan> {
        Ok(Box::new(self.snapshot_cursor(None, None)?))
    }

    fn supports_native_order(&self) -> bool {
        true
    }

    fn close(&self) -> LexbaseResult<()> {
        // Durability is per commit; there is nothing left to flush.
        Ok(())
    }
}

impl OrderedBackend for RedbStore {
    type RangeCursor = RedbCursor;

    fn range_cursor(
        &self,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> LexbaseResult<Self::RangeCursor> {
        self.snapshot_cursor(from, to)
    }
}

/// Owned cursor over a redb snapshot; `None` stands for the empty window.
pub struct RedbCursor {
    inner: Option<redb::Range<'static, &'static [u8], &'static [u8]>>,
}

impl Iterator for RedbCursor {
    type Item = LexbaseResult<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(|result| {
            result
                .map(|(key, value)| (key.value().to_vec(), value.value().to_vec()))
                .map_err(Into::into)
        })
    }
}
