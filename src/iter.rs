//! Iterators handed out by [`LexbaseStore`](crate::LexbaseStore).
//!
//! Range and prefix scans stream pairs lazily instead of collecting them up
//! front. Items are `Result`s: a cursor created before `close()` stays valid,
//! but the first pull after the store closes reports
//! [`LexbaseError::Closed`] and the stream ends. Prefix iterators seek to the
//! prefix and stop at the first key outside it rather than walking the rest
//! of the keyspace.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::IndexCursor;
use crate::databases::memory_store::MemoryStore;
#[cfg(feature = "redb")]
use crate::databases::redb_store::RedbCursor;
#[cfg(feature = "sled")]
use crate::databases::sled_store::SledCursor;
use crate::error::{LexbaseError, LexbaseResult};
use crate::ordering::has_prefix;

/// Engine cursor feeding an iterator, one variant per backend.
pub(crate) enum RangeSource {
    #[cfg(feature = "sled")]
    Sled(SledCursor),
    #[cfg(feature = "redb")]
    Redb(RedbCursor),
    Index(IndexCursor<MemoryStore>),
}

impl RangeSource {
    fn next_pair(&mut self) -> Option<LexbaseResult<(Vec<u8>, Vec<u8>)>> {
        match self {
            #[cfg(feature = "sled")]
            RangeSource::Sled(cursor) => cursor.next(),
            #[cfg(feature = "redb")]
            RangeSource::Redb(cursor) => cursor.next(),
            RangeSource::Index(cursor) => cursor.next_pair(),
        }
    }

    /// Key-only pull. The index variant never touches the engine, so key
    /// scans on an indexed backend cost no value reads.
    fn next_key(&mut self) -> Option<LexbaseResult<Vec<u8>>> {
        match self {
            #[cfg(feature = "sled")]
            RangeSource::Sled(cursor) => cursor.next().map(|result| result.map(|(key, _)| key)),
            #[cfg(feature = "redb")]
            RangeSource::Redb(cursor) => cursor.next().map(|result| result.map(|(key, _)| key)),
            RangeSource::Index(cursor) => cursor.next_key(),
        }
    }
}

/// Streaming iterator over `(key, value)` pairs in key order.
pub struct RangeIter {
    source: RangeSource,
    closed: Arc<AtomicBool>,
    prefix: Option<Vec<u8>>,
    strip: usize,
    done: bool,
}

impl RangeIter {
    pub(crate) fn new(source: RangeSource, closed: Arc<AtomicBool>) -> Self {
        Self {
            source,
            closed,
            prefix: None,
            strip: 0,
            done: false,
        }
    }

    pub(crate) fn with_prefix(
        source: RangeSource,
        closed: Arc<AtomicBool>,
        prefix: Vec<u8>,
        strip_prefix: bool,
    ) -> Self {
        let strip = if strip_prefix { prefix.len() } else { 0 };
        Self {
            source,
            closed,
            prefix: Some(prefix),
            strip,
            done: false,
        }
    }
}

impl Iterator for RangeIter {
    type Item = LexbaseResult<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.closed.load(Ordering::SeqCst) {
            self.done = true;
            return Some(Err(LexbaseError::Closed));
        }
        match self.source.next_pair() {
            Some(Ok((mut key, value))) => {
                if let Some(prefix) = &self.prefix {
                    if !has_prefix(&key, prefix) {
                        self.done = true;
                        return None;
                    }
                }
                if self.strip > 0 {
                    key.drain(..self.strip);
                }
                Some(Ok((key, value)))
            }
            Some(Err(err)) => Some(Err(err)),
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Streaming iterator over keys in key order.
pub struct KeyIter {
    source: RangeSource,
    closed: Arc<AtomicBool>,
    prefix: Option<Vec<u8>>,
    strip: usize,
    done: bool,
}

impl KeyIter {
    pub(crate) fn new(source: RangeSource, closed: Arc<AtomicBool>) -> Self {
        Self {
            source,
            closed,
            prefix: None,
            strip: 0,
            done: false,
        }
    }

    pub(crate) fn with_prefix(
        source: RangeSource,
        closed: Arc<AtomicBool>,
        prefix: Vec<u8>,
        strip_prefix: bool,
    ) -> Self {
        let strip = if strip_prefix { prefix.len() } else { 0 };
        Self {
            source,
            closed,
            prefix: Some(prefix),
            strip,
            done: false,
        }
    }
}

impl Iterator for KeyIter {
    type Item = LexbaseResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.closed.load(Ordering::SeqCst) {
            self.done = true;
            return Some(Err(LexbaseError::Closed));
        }
        match self.source.next_key() {
            Some(Ok(mut key)) => {
                if let Some(prefix) = &self.prefix {
                    if !has_prefix(&key, prefix) {
                        self.done = true;
                        return None;
                    }
                }
                if self.strip > 0 {
                    key.drain(..self.strip);
                }
                Some(Ok(key))
            }
            Some(Err(err)) => Some(Err(err)),
            None => {
                self.done = true;
                None
            }
        }
    }
}
