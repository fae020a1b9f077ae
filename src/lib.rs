//! # Lexbase Store
//!
//! An ordered, binary-safe key-value storage layer with interchangeable
//! backends behind one range-scan API.
//!
//! ## Features
//!
//! - **Byte-order keys**: keys and values are arbitrary byte strings; keys
//!   are always traversed in byte-lexicographic order
//! - **Interchangeable backends**: sled and redb keep keys sorted natively;
//!   the in-memory hash engine gains the same order through an auxiliary
//!   index
//! - **Range and prefix scans**: inclusive `from ..= to` windows and
//!   seek-then-stop prefix iteration, streamed lazily
//! - **Bulk writes**: `put_many` and `delete_many` chunk work into engine
//!   write batches
//! - **Parity protection**: index-adapted engines re-sync after a failed
//!   mutation, or refuse further work rather than serve wrong ordering
//!
//! ## Quick Start
//!
//! ```
//! use lexbase_store::LexbaseStore;
//!
//! # fn main() -> lexbase_store::LexbaseResult<()> {
//! let store = LexbaseStore::memory()?;
//! store.put(b"user/1", b"alice")?;
//! store.put(b"user/2", b"bob")?;
//!
//! for entry in store.items(Some(b"user/1".as_slice()), None)? {
//!     let (key, value) = entry?;
//!     println!("{key:?} = {value:?}");
//! }
//! store.close()?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod databases;
pub mod error;
pub mod index;
pub mod iter;
pub mod ordering;
pub mod prelude;
pub mod store;

pub use config::{FileConfig, MemoryConfig};
pub use error::{LexbaseError, LexbaseResult};
pub use iter::{KeyIter, RangeIter};
pub use store::{LexbaseStore, WRITE_BATCH_SIZE};
