//! Backend capability model.
//!
//! Two traits split the storage engines by what they can natively do:
//!
//! - [`RawBackend`]: the minimal contract every engine meets, point reads
//!   and writes plus a full scan in undefined order.
//! - [`OrderedBackend`]: engines whose own structure keeps keys in
//!   byte-lexicographic order and can serve an ascending range cursor
//!   directly (sled, redb).
//!
//! Engines without native order are adapted through [`IndexedBackend`],
//! which couples the raw engine with an
//! [`OrderedIndex`](crate::index::OrderedIndex) kept in parity on every
//! mutation.

pub mod indexed;

pub use indexed::{IndexCursor, IndexedBackend};

use crate::error::LexbaseResult;

/// Owned iterator over every stored pair, in undefined order.
pub type BoxedScan = Box<dyn Iterator<Item = LexbaseResult<(Vec<u8>, Vec<u8>)>>>;

/// Minimal contract a storage engine must meet to sit under a store.
///
/// All methods take `&self`; engines synchronize internally (see the crate
/// docs for the concurrency contract). Absent keys are never errors:
/// `raw_get` returns `Ok(None)` and `raw_delete` is a no-op.
pub trait RawBackend: Send + Sync {
    /// Engine name for logs and introspection.
    fn name(&self) -> &'static str;

    /// Exact lookup.
    fn raw_get(&self, key: &[u8]) -> LexbaseResult<Option<Vec<u8>>>;

    /// Insert or overwrite. Last write wins; no versioning.
    fn raw_put(&self, key: &[u8], value: &[u8]) -> LexbaseResult<()>;

    /// Remove if present.
    fn raw_delete(&self, key: &[u8]) -> LexbaseResult<()>;

    /// Existence check. The default goes through `raw_get`; engines with a
    /// cheaper probe override it.
    fn raw_contains(&self, key: &[u8]) -> LexbaseResult<bool> {
        Ok(self.raw_get(key)?.is_some())
    }

    /// Every stored pair, in whatever order the engine walks them. Used to
    /// seed the auxiliary index for unordered engines.
    fn raw_scan(&self) -> LexbaseResult<BoxedScan>;

    /// Whether the engine's own structure yields keys in byte order.
    fn supports_native_order(&self) -> bool;

    /// Flush buffered writes and release engine resources. Idempotent.
    fn close(&self) -> LexbaseResult<()>;
}

/// Engines that can serve ascending range cursors from their own ordered
/// structure, so no auxiliary index is needed.
pub trait OrderedBackend: RawBackend {
    /// Detached cursor; owns everything it needs and may outlive the
    /// borrow of `self` that created it.
    type RangeCursor: Iterator<Item = LexbaseResult<(Vec<u8>, Vec<u8>)>>;

    /// Ascending cursor over keys `k` with `from <= k` and `k <= to`, each
    /// bound applied only when present and both inclusive. Inverted bounds
    /// (`from > to`) yield an empty cursor, not an error.
    fn range_cursor(
        &self,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> LexbaseResult<Self::RangeCursor>;
}
