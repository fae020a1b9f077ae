//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need, so one glob import covers the
//! common surface.
//!
//! # Usage
//!
//! ```
//! use lexbase_store::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - [`LexbaseStore`]: the unified store over every backend
//! - [`FileConfig`] / [`MemoryConfig`]: open-time options
//! - [`RangeIter`] / [`KeyIter`]: streaming scan iterators
//! - [`LexbaseError`] / [`LexbaseResult`]: error handling
//! - [`RawBackend`] / [`OrderedBackend`] / [`IndexedBackend`]: the backend
//!   traits and the ordering adapter, for callers wiring up their own engine
//!
//! Engine types ([`MemoryStore`], `SledStore`, `RedbStore`) are included so
//! a backend can also be driven directly.

// Store and configuration
pub use crate::config::{FileConfig, MemoryConfig};
pub use crate::store::{LexbaseStore, WRITE_BATCH_SIZE};

// Iteration
pub use crate::iter::{KeyIter, RangeIter};

// Error handling
pub use crate::error::{LexbaseError, LexbaseResult};

// Backend traits and engines
pub use crate::backend::{IndexedBackend, OrderedBackend, RawBackend};
pub use crate::databases::memory_store::MemoryStore;
#[cfg(feature = "redb")]
pub use crate::databases::redb_store::RedbStore;
#[cfg(feature = "sled")]
pub use crate::databases::sled_store::SledStore;
