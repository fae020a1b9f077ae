//! Configuration for the storage backends.
//!
//! One builder-based config type per backend family, shared across engines:
//! [`FileConfig`] for the disk engines (sled, redb) and [`MemoryConfig`] for
//! the in-memory engine. Every field maps to a real engine knob; see the
//! field docs for how each engine interprets it.

use std::path::PathBuf;
use typed_builder::TypedBuilder;

/// Configuration for file-based backends (sled, redb).
///
/// # Examples
///
/// ```
/// use lexbase_store::config::FileConfig;
///
/// // Just a path, defaults for the rest
/// let config = FileConfig::new("my_database.db");
///
/// // Customized
/// let config = FileConfig::builder()
///     .path("/data/store.db")
///     .cache_size_mb(512)
///     .create_if_missing(false)
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct FileConfig {
    /// Path to the database file (redb) or directory (sled).
    #[builder(setter(into))]
    pub path: PathBuf,

    /// Cache size in megabytes. sled: pagecache capacity; redb: read cache.
    #[builder(default = 256)]
    pub cache_size_mb: usize,

    /// Whether to create the database if nothing exists at the path.
    /// When false, opening a missing database is an error.
    #[builder(default = true)]
    pub create_if_missing: bool,

    /// Whether to delete any existing database at the path before opening.
    #[builder(default = false)]
    pub truncate: bool,
}

impl FileConfig {
    /// Configuration with just a path and defaults for everything else.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cache_size_mb: 256,
            create_if_missing: true,
            truncate: false,
        }
    }

    /// Configuration pointing at a unique path under the system temp
    /// directory. The database is not removed automatically; tests that
    /// need cleanup should prefer a `tempfile` directory or
    /// `LexbaseStore::temp()`.
    pub fn temp() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static SEQ: AtomicU64 = AtomicU64::new(0);

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let unique = format!(
            "lexbase_{}_{}_{:x}",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed),
            nanos
        );
        Self::new(std::env::temp_dir().join(unique))
    }
}

/// Configuration for the in-memory backend.
///
/// # Examples
///
/// ```
/// use lexbase_store::config::MemoryConfig;
///
/// let config = MemoryConfig::builder()
///     .initial_capacity(10_000)
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct MemoryConfig {
    /// Initial capacity hint for the underlying map.
    #[builder(default = 1000)]
    pub initial_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1000,
        }
    }
}
