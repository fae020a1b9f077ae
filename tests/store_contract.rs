//! One contract, every backend: the same scenarios run against sled, redb
//! and the indexed in-memory store, since callers are promised identical
//! results regardless of which engine holds the bytes.

use lexbase_store::{LexbaseError, LexbaseResult, LexbaseStore};

macro_rules! store_contract {
    ($module:ident, $backend_name:literal, $native:literal, $open:expr) => {
        mod $module {
            use super::*;

            fn open(dir: &tempfile::TempDir) -> LexbaseStore {
                ($open)(dir)
            }

            fn all_keys(store: &LexbaseStore) -> Vec<Vec<u8>> {
                store
                    .keys(None, None)
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap()
            }

            #[test]
            fn test_backend_identity() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);
                assert_eq!(store.backend_name(), $backend_name);
                assert_eq!(store.supports_native_order(), $native);
                assert!(!store.is_closed());
            }

            #[test]
            fn test_round_trip_is_byte_exact() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"\x00key\xff", b"value\x00with\xffbytes").unwrap();
                store.put(b"empty-value", b"").unwrap();

                assert_eq!(
                    store.get(b"\x00key\xff").unwrap(),
                    Some(b"value\x00with\xffbytes".to_vec())
                );
                assert_eq!(store.get(b"empty-value").unwrap(), Some(Vec::new()));
                assert_eq!(store.get(b"missing").unwrap(), None);
            }

            #[test]
            fn test_overwrite_replaces_value() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"k", b"first").unwrap();
                store.put(b"k", b"second").unwrap();

                assert_eq!(store.get(b"k").unwrap(), Some(b"second".to_vec()));
                assert_eq!(all_keys(&store), vec![b"k".to_vec()]);
            }

            #[test]
            fn test_delete_removes_key() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"k", b"v").unwrap();
                store.delete(b"k").unwrap();

                assert_eq!(store.get(b"k").unwrap(), None);
                assert!(!store.contains(b"k").unwrap());
                assert!(all_keys(&store).is_empty());

                // Deleting an absent key is a no-op, not an error.
                store.delete(b"k").unwrap();
            }

            #[test]
            fn test_contains_matches_get() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"here", b"x").unwrap();
                assert!(store.contains(b"here").unwrap());
                assert!(!store.contains(b"gone").unwrap());
            }

            #[test]
            fn test_keys_are_sorted_bytewise() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                for key in ["2", "11", "1", "12", "3"] {
                    store.put(key.as_bytes(), b"x").unwrap();
                }
                assert_eq!(
                    all_keys(&store),
                    vec![
                        b"1".to_vec(),
                        b"11".to_vec(),
                        b"12".to_vec(),
                        b"2".to_vec(),
                        b"3".to_vec()
                    ]
                );
            }

            #[test]
            fn test_range_bounds_are_inclusive() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                for key in ["1", "11", "12", "2", "3"] {
                    store.put(key.as_bytes(), b"x").unwrap();
                }
                let keys = store
                    .keys(Some(b"12".as_slice()), Some(b"2".as_slice()))
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(keys, vec![b"12".to_vec(), b"2".to_vec()]);
            }

            #[test]
            fn test_half_open_ranges() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                for key in ["1", "11", "12", "2", "3"] {
                    store.put(key.as_bytes(), b"x").unwrap();
                }

                let up_to = store
                    .keys(None, Some(b"12".as_slice()))
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(up_to, vec![b"1".to_vec(), b"11".to_vec(), b"12".to_vec()]);

                let from = store
                    .keys(Some(b"2".as_slice()), None)
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(from, vec![b"2".to_vec(), b"3".to_vec()]);
            }

            #[test]
            fn test_inverted_range_is_empty() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"m", b"x").unwrap();
                let count = store
                    .keys(Some(b"z".as_slice()), Some(b"a".as_slice()))
                    .unwrap()
                    .count();
                assert_eq!(count, 0);
            }

            #[test]
            fn test_items_pair_keys_with_values() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"b", b"2").unwrap();
                store.put(b"a", b"1").unwrap();

                let items = store
                    .items(None, None)
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(
                    items,
                    vec![
                        (b"a".to_vec(), b"1".to_vec()),
                        (b"b".to_vec(), b"2".to_vec())
                    ]
                );
            }

            #[test]
            fn test_prefix_scan_stops_at_boundary() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                for key in ["pet/1", "pet/2", "pets", "plant/1"] {
                    store.put(key.as_bytes(), b"x").unwrap();
                }
                let keys = store
                    .prefix_keys(b"pet/", false)
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(keys, vec![b"pet/1".to_vec(), b"pet/2".to_vec()]);
            }

            #[test]
            fn test_prefix_strip_removes_leading_bytes() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"pet/1", b"ziggy").unwrap();
                store.put(b"pet/2", b"momo").unwrap();
                store.put(b"plant/1", b"fern").unwrap();

                let items = store
                    .prefix_items(b"pet/", true)
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(
                    items,
                    vec![
                        (b"1".to_vec(), b"ziggy".to_vec()),
                        (b"2".to_vec(), b"momo".to_vec())
                    ]
                );
            }

            #[test]
            fn test_empty_prefix_scans_everything() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"a", b"1").unwrap();
                store.put(b"b", b"2").unwrap();

                let keys = store
                    .prefix_keys(b"", false)
                    .unwrap()
                    .collect::<LexbaseResult<Vec<_>>>()
                    .unwrap();
                assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
            }

            #[test]
            fn test_put_many_and_delete_many() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                let pairs: Vec<_> = (0..100u32)
                    .map(|i| (format!("key/{i:03}").into_bytes(), i.to_be_bytes().to_vec()))
                    .collect();
                store.put_many(pairs).unwrap();

                assert_eq!(all_keys(&store).len(), 100);
                assert_eq!(
                    store.get(b"key/042").unwrap(),
                    Some(42u32.to_be_bytes().to_vec())
                );

                let doomed: Vec<_> = (0..50u32)
                    .map(|i| format!("key/{i:03}").into_bytes())
                    .collect();
                store.delete_many(doomed).unwrap();

                assert_eq!(all_keys(&store).len(), 50);
                assert_eq!(store.get(b"key/042").unwrap(), None);
                assert_eq!(
                    store.get(b"key/099").unwrap(),
                    Some(99u32.to_be_bytes().to_vec())
                );
            }

            #[test]
            fn test_close_is_idempotent_and_final() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"k", b"v").unwrap();
                store.close().unwrap();
                store.close().unwrap();
                assert!(store.is_closed());

                assert!(matches!(store.get(b"k"), Err(LexbaseError::Closed)));
                assert!(matches!(store.put(b"k", b"v"), Err(LexbaseError::Closed)));
                assert!(matches!(store.delete(b"k"), Err(LexbaseError::Closed)));
                assert!(matches!(store.contains(b"k"), Err(LexbaseError::Closed)));
                assert!(matches!(store.keys(None, None), Err(LexbaseError::Closed)));
                assert!(matches!(
                    store.prefix_items(b"k", false),
                    Err(LexbaseError::Closed)
                ));
            }

            #[test]
            fn test_live_iterator_fails_after_close() {
                let dir = tempfile::tempdir().unwrap();
                let store = open(&dir);

                store.put(b"a", b"1").unwrap();
                store.put(b"b", b"2").unwrap();

                let mut iter = store.keys(None, None).unwrap();
                assert_eq!(iter.next().unwrap().unwrap(), b"a".to_vec());

                store.close().unwrap();
                assert!(matches!(iter.next(), Some(Err(LexbaseError::Closed))));
                assert!(iter.next().is_none());
            }
        }
    };
}

#[cfg(feature = "sled")]
store_contract!(sled_backend, "sled", true, |dir: &tempfile::TempDir| {
    LexbaseStore::sled(dir.path().join("db")).unwrap()
});

#[cfg(feature = "redb")]
store_contract!(redb_backend, "redb", true, |dir: &tempfile::TempDir| {
    LexbaseStore::redb(dir.path().join("db.redb")).unwrap()
});

store_contract!(memory_backend, "memory", false, |_dir: &tempfile::TempDir| {
    LexbaseStore::memory().unwrap()
});

#[cfg(feature = "sled")]
#[test]
fn test_sled_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db");
    {
        let store = LexbaseStore::sled(&path).unwrap();
        store.put(b"k", b"v").unwrap();
        store.close().unwrap();
    }
    let store = LexbaseStore::sled(&path).unwrap();
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
}

#[cfg(feature = "redb")]
#[test]
fn test_redb_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.redb");
    {
        let store = LexbaseStore::redb(&path).unwrap();
        store.put(b"k", b"v").unwrap();
        store.close().unwrap();
    }
    let store = LexbaseStore::redb(&path).unwrap();
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn test_put_many_crosses_batch_boundary() {
    let store = LexbaseStore::memory().unwrap();
    let total = lexbase_store::WRITE_BATCH_SIZE + 1;
    let pairs: Vec<_> = (0..total)
        .map(|i| (format!("key/{i:08}").into_bytes(), b"v".to_vec()))
        .collect();
    store.put_many(pairs).unwrap();

    assert_eq!(store.keys(None, None).unwrap().count(), total);
    assert_eq!(store.get(b"key/00000000").unwrap(), Some(b"v".to_vec()));
    let last = format!("key/{:08}", total - 1);
    assert_eq!(store.get(last.as_bytes()).unwrap(), Some(b"v".to_vec()));
}

#[test]
fn test_random_binary_corpus_round_trips_sorted() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut model = BTreeMap::new();
    let store = LexbaseStore::memory().unwrap();

    for _ in 0..500 {
        let mut key = vec![0u8; rng.gen_range(1..=24)];
        rng.fill(&mut key[..]);
        let mut value = vec![0u8; rng.gen_range(0..=64)];
        rng.fill(&mut value[..]);

        store.put(&key, &value).unwrap();
        model.insert(key, value);
    }

    let stored: Vec<_> = store
        .items(None, None)
        .unwrap()
        .collect::<LexbaseResult<Vec<_>>>()
        .unwrap();
    let expected: Vec<_> = model.into_iter().collect();
    assert_eq!(stored, expected);
}

#[test]
fn test_items_skip_keys_deleted_mid_scan() {
    let store = LexbaseStore::memory().unwrap();
    for key in ["a", "b", "c"] {
        store.put(key.as_bytes(), b"x").unwrap();
    }

    let mut iter = store.items(None, None).unwrap();
    assert_eq!(iter.next().unwrap().unwrap().0, b"a".to_vec());

    store.delete(b"b").unwrap();

    assert_eq!(iter.next().unwrap().unwrap().0, b"c".to_vec());
    assert!(iter.next().is_none());
}

#[test]
fn test_keys_see_inserts_ahead_of_the_cursor() {
    let store = LexbaseStore::memory().unwrap();
    store.put(b"a", b"1").unwrap();
    store.put(b"m", b"2").unwrap();

    let mut iter = store.keys(None, None).unwrap();
    assert_eq!(iter.next().unwrap().unwrap(), b"a".to_vec());

    // Ahead of the cursor: visible. Behind it: not.
    store.put(b"z", b"3").unwrap();
    store.put(b"0", b"4").unwrap();

    assert_eq!(iter.next().unwrap().unwrap(), b"m".to_vec());
    assert_eq!(iter.next().unwrap().unwrap(), b"z".to_vec());
    assert!(iter.next().is_none());
}
