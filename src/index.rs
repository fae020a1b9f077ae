//! Auxiliary sorted key index for backends without native ordering.
//!
//! An [`OrderedIndex`] holds the key set of an unordered engine in
//! byte-lexicographic order. The indexed adapter keeps it in lock-step with
//! the engine on every mutation; range and prefix queries then walk the index
//! and fetch values from the engine one key at a time.
//!
//! Backed by a [`BTreeSet`], so seeking to a bound is logarithmic and a
//! narrow range over a large index never degenerates into a full scan.
//!
//! # Examples
//!
//! ```
//! use lexbase_store::index::OrderedIndex;
//!
//! let mut index = OrderedIndex::new();
//! index.insert(b"12".to_vec());
//! index.insert(b"2".to_vec());
//! index.insert(b"1".to_vec());
//!
//! let hits: Vec<&[u8]> = index
//!     .range(Some(b"12".as_slice()), Some(b"2".as_slice()))
//!     .collect();
//! assert_eq!(hits, vec![b"12".as_slice(), b"2".as_slice()]);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::ops::Bound;

use crate::ordering::{compare, has_prefix};

/// Ordered set of binary keys, sorted byte-lexicographically.
#[derive(Debug, Default, Clone)]
pub struct OrderedIndex {
    keys: BTreeSet<Vec<u8>>,
}

impl OrderedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Insert a key, keeping sort order.
    ///
    /// Returns `false` (and changes nothing) if the key was already present.
    pub fn insert(&mut self, key: Vec<u8>) -> bool {
        self.keys.insert(key)
    }

    /// Remove a key. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.keys.remove(key)
    }

    /// True iff the key is present.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.keys.contains(key)
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True iff no keys are indexed.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.keys.clear()
    }

    /// Ascending keys `k` with `from <= k` and `k <= to`, each bound applied
    /// only when present. Both bounds are inclusive; `from > to` yields an
    /// empty sequence, never a panic or an error.
    pub fn range(&self, from: Option<&[u8]>, to: Option<&[u8]>) -> Range<'_> {
        if let (Some(a), Some(b)) = (from, to) {
            // BTreeSet::range panics on inverted bounds.
            if compare(a, b) == Ordering::Greater {
                return Range { inner: None };
            }
        }
        let lower = from.map_or(Bound::Unbounded, Bound::Included);
        let upper = to.map_or(Bound::Unbounded, Bound::Included);
        Range {
            inner: Some(self.keys.range::<[u8], _>((lower, upper))),
        }
    }

    /// Ascending keys carrying `prefix`: seek to the prefix, stop at the
    /// first key past it. The empty prefix walks the whole index.
    pub fn prefix_range<'a>(&'a self, prefix: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.range(Some(prefix), None)
            .take_while(move |key| has_prefix(key, prefix))
    }

    /// Seek primitive for detached cursors: the smallest key strictly greater
    /// than `after` (or the smallest overall when `after` is `None`) that is
    /// still `<= to` when `to` is present.
    pub fn next_after(&self, after: Option<&[u8]>, to: Option<&[u8]>) -> Option<Vec<u8>> {
        let lower = match after {
            Some(a) => {
                if let Some(t) = to {
                    // No key can satisfy a < k <= t once a >= t.
                    if compare(a, t) != Ordering::Less {
                        return None;
                    }
                }
                Bound::Excluded(a)
            }
            None => Bound::Unbounded,
        };
        let upper = to.map_or(Bound::Unbounded, Bound::Included);
        self.keys.range::<[u8], _>((lower, upper)).next().cloned()
    }
}

/// Borrowing iterator over an inclusive key range, ascending.
pub struct Range<'a> {
    inner: Option<btree_set::Range<'a, Vec<u8>>>,
}

impl<'a> Iterator for Range<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(Vec::as_slice)
    }
}
