//! Error types for store operations.
//!
//! Lookups never produce a "not found" error: [`get`](crate::LexbaseStore::get)
//! returns `Ok(None)` and [`contains`](crate::LexbaseStore::contains) returns
//! `Ok(false)` for absent keys. Errors are reserved for operations on a closed
//! store, failures surfaced by an engine, and loss of parity between an
//! auxiliary index and its engine.

use thiserror::Error;

pub type LexbaseResult<T> = Result<T, LexbaseError>;

/// Errors surfaced by store operations and by the iterators they hand out.
#[derive(Error, Debug)]
pub enum LexbaseError {
    /// An operation was invoked on a store, or on an iterator borrowed from
    /// it, after `close()`.
    #[error("operation on closed store")]
    Closed,

    /// Filesystem error outside any engine (truncating or probing a path).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure surfaced by the sled engine. Propagated unchanged: it can
    /// indicate a write that only half-landed.
    #[cfg(feature = "sled")]
    #[error(transparent)]
    SledError(#[from] sled::Error),

    /// Failure surfaced by the redb engine.
    #[cfg(feature = "redb")]
    #[error(transparent)]
    RedbError(#[from] RedbError),

    /// Failure from an engine without a structured error type.
    #[error("backend error: {0}")]
    Backend(String),

    /// The auxiliary ordered index and the raw engine could not be brought
    /// back into agreement after a failed mutation. Fatal for the affected
    /// store instance: every later operation refuses with this error rather
    /// than risk serving wrong ordering.
    #[error("ordered index out of parity with backend: {0}")]
    IndexParity(String),
}

/// redb reports through several narrow error types; this enum folds them into
/// one variant of [`LexbaseError`] so `?` works at every call site.
#[cfg(feature = "redb")]
#[derive(Error, Debug)]
pub enum RedbError {
    #[error(transparent)]
    DatabaseError(#[from] redb::DatabaseError),
    #[error(transparent)]
    TransactionError(#[from] redb::TransactionError),
    #[error(transparent)]
    TableError(#[from] redb::TableError),
    #[error(transparent)]
    CommitError(#[from] redb::CommitError),
    #[error(transparent)]
    StorageError(#[from] redb::StorageError),
}

#[cfg(feature = "redb")]
macro_rules! impl_from_redb {
    ($($err:ty => $variant:ident),*) => {
        $(
            impl From<$err> for LexbaseError {
                fn from(err: $err) -> Self {
                    LexbaseError::RedbError(RedbError::$variant(err))
                }
            }
        )*
    };
}

#[cfg(feature = "redb")]
impl_from_redb!(
    redb::DatabaseError => DatabaseError,
    redb::TransactionError => TransactionError,
    redb::TableError => TableError,
    redb::CommitError => CommitError,
    redb::StorageError => StorageError
);
