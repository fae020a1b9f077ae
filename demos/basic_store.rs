//! Basic Store Example
//!
//! Opens a temporary sled-backed store and walks through the core key/value
//! operations: puts, gets, ordered range scans, prefix scans, and bulk writes.
//!
//! Run this example with:
//! ```bash
//! RUST_LOG=debug cargo run --example basic_store --features sled
//! ```

use lexbase_store::LexbaseStore;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Lexbase Store: Basic Operations ===\n");

    let store = LexbaseStore::temp()?;
    println!(
        "Opened a `{}` store (native order: {})\n",
        store.backend_name(),
        store.supports_native_order()
    );

    // Single-key operations.
    store.put(b"user/1/name", b"amina")?;
    store.put(b"user/1/city", b"nairobi")?;
    store.put(b"user/2/name", b"kwame")?;

    let name = store.get(b"user/1/name")?;
    println!("user/1/name = {:?}", name.map(String::from_utf8));
    println!("contains user/2/name: {}", store.contains(b"user/2/name")?);

    // Keys come back in bytewise order regardless of insertion order.
    println!("\nAll keys:");
    for key in store.keys(None, None)? {
        println!("  {}", String::from_utf8_lossy(&key?));
    }

    // A prefix scan visits only the matching keys, optionally stripping
    // the prefix from what it yields.
    println!("\nFields of user/1 (prefix stripped):");
    for item in store.prefix_items(b"user/1/", true)? {
        let (field, value) = item?;
        println!(
            "  {} = {}",
            String::from_utf8_lossy(&field),
            String::from_utf8_lossy(&value)
        );
    }

    // Bulk writes chunk into batches internally; with RUST_LOG=debug the
    // chunking is visible on stderr.
    let pairs: Vec<_> = (0..100u32)
        .map(|i| (format!("log/{i:04}").into_bytes(), i.to_be_bytes().to_vec()))
        .collect();
    store.put_many(pairs)?;
    println!("\nBulk-loaded 100 log entries");

    let logged = store.prefix_keys(b"log/", false)?.count();
    println!("log/ prefix now holds {logged} keys");

    store.delete_many((0..100u32).map(|i| format!("log/{i:04}").into_bytes()))?;
    println!(
        "After delete_many, log/ holds {} keys",
        store.prefix_keys(b"log/", false)?.count()
    );

    store.close()?;
    println!("\n✓ Store closed");

    Ok(())
}
