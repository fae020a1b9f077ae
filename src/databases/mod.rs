//! Concrete storage engines.
//!
//! Each engine implements [`RawBackend`](crate::backend::RawBackend); the
//! disk engines additionally implement
//! [`OrderedBackend`](crate::backend::OrderedBackend) because their B-tree
//! structure already keeps keys in byte order. The in-memory engine is
//! hash-based and reaches ordered traversal through
//! [`IndexedBackend`](crate::backend::IndexedBackend).

#[cfg(feature = "sled")]
pub mod sled_store;

#[cfg(feature = "redb")]
pub mod redb_store;

pub mod memory_store;
