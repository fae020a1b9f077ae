//! Randomized checks of the store against a reference model.
//!
//! `BTreeMap` is the oracle: whatever it says about membership, ordering
//! and range windows, the store must agree with. The memory backend is the
//! subject since it is the one whose ordering is maintained by hand.

use std::collections::BTreeMap;
use std::ops::Bound;

use lexbase_store::LexbaseStore;
use quickcheck::quickcheck;

quickcheck! {
    fn prop_store_matches_model_after_random_ops(ops: Vec<(bool, Vec<u8>, Vec<u8>)>) -> bool {
        let store = LexbaseStore::memory().unwrap();
        let mut model = BTreeMap::new();

        for (is_put, key, value) in ops {
            if is_put {
                store.put(&key, &value).unwrap();
                model.insert(key, value);
            } else {
                store.delete(&key).unwrap();
                model.remove(&key);
            }
        }

        let keys = store
            .keys(None, None)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let expected: Vec<Vec<u8>> = model.keys().cloned().collect();
        if keys != expected {
            return false;
        }
        model
            .iter()
            .all(|(key, value)| store.get(key).unwrap().as_deref() == Some(value.as_slice()))
    }

    fn prop_range_window_matches_model(
        pairs: Vec<(Vec<u8>, Vec<u8>)>,
        from: Vec<u8>,
        to: Vec<u8>
    ) -> bool {
        let store = LexbaseStore::memory().unwrap();
        let mut model = BTreeMap::new();
        for (key, value) in pairs {
            store.put(&key, &value).unwrap();
            model.insert(key, value);
        }

        let got = store
            .items(Some(from.as_slice()), Some(to.as_slice()))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let expected: Vec<(Vec<u8>, Vec<u8>)> = if from > to {
            Vec::new()
        } else {
            model
                .range::<[u8], _>((
                    Bound::Included(from.as_slice()),
                    Bound::Included(to.as_slice()),
                ))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };
        got == expected
    }

    fn prop_prefix_scan_matches_filtered_model(
        pairs: Vec<(Vec<u8>, Vec<u8>)>,
        prefix: Vec<u8>
    ) -> bool {
        let store = LexbaseStore::memory().unwrap();
        let mut model = BTreeMap::new();
        for (key, value) in pairs {
            store.put(&key, &value).unwrap();
            model.insert(key, value);
        }

        let expected: Vec<Vec<u8>> = model
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        let plain = store
            .prefix_keys(&prefix, false)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        if plain != expected {
            return false;
        }

        let stripped = store
            .prefix_keys(&prefix, true)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let expected_stripped: Vec<Vec<u8>> = expected
            .iter()
            .map(|key| key[prefix.len()..].to_vec())
            .collect();
        stripped == expected_stripped
    }

    fn prop_bulk_writes_match_sequential_puts(pairs: Vec<(Vec<u8>, Vec<u8>)>) -> bool {
        let bulk = LexbaseStore::memory().unwrap();
        let sequential = LexbaseStore::memory().unwrap();

        bulk.put_many(pairs.clone()).unwrap();
        for (key, value) in &pairs {
            sequential.put(key, value).unwrap();
        }

        let bulk_items = bulk
            .items(None, None)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let sequential_items = sequential
            .items(None, None)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        bulk_items == sequential_items
    }
}
