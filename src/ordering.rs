//! Byte-lexicographic key ordering.
//!
//! Every ordered traversal in this crate follows one comparison rule: plain
//! byte-wise lexicographic order, where a key that is a strict prefix of a
//! longer key sorts first. Range bounds and prefix scans are defined in terms
//! of these two functions so the rule stays testable in isolation.
//!
//! # Examples
//!
//! ```
//! use lexbase_store::ordering::{compare, has_prefix};
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare(b"12", b"2"), Ordering::Less);
//! assert!(has_prefix(b"pet/dog", b"pet/"));
//! ```

use std::cmp::Ordering;

/// Compare two binary keys lexicographically.
///
/// Byte-wise, not locale-aware, not numeric: `b"12"` sorts before `b"2"`,
/// and a shorter key that is a strict prefix of a longer one sorts first.
#[inline]
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// True iff the first `prefix.len()` bytes of `key` equal `prefix`.
///
/// The empty prefix matches every key.
#[inline]
pub fn has_prefix(key: &[u8], prefix: &[u8]) -> bool {
    key.starts_with(prefix)
}
