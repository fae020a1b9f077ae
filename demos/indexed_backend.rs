//! Indexed Backend Example
//!
//! Wraps the hash-map engine in `IndexedBackend`, which maintains a sorted
//! key index alongside the engine so that range and prefix scans work even
//! though the engine itself keeps no key order.
//!
//! Run this example with:
//! ```bash
//! cargo run --example indexed_backend
//! ```

use lexbase_store::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Lexbase Store: Indexed Backend ===\n");

    // The raw engine alone answers point lookups but cannot order keys.
    let engine = MemoryStore::new();
    println!(
        "engine `{}` native order: {}",
        engine.name(),
        engine.supports_native_order()
    );

    // The adapter seeds its index from the engine and keeps both in step.
    let backend = IndexedBackend::new(engine)?;

    backend.put(b"fruit/mango", b"3")?;
    backend.put(b"fruit/apple", b"12")?;
    backend.put(b"veg/okra", b"7")?;
    backend.put(b"fruit/banana", b"5")?;

    println!("\nKeys in bytewise order:");
    for item in backend.cursor(None, None) {
        let (key, value) = item?;
        println!(
            "  {} -> {}",
            String::from_utf8_lossy(&key),
            String::from_utf8_lossy(&value)
        );
    }

    // Cursors take inclusive bounds on either side.
    println!("\nfruit/banana ..= fruit/mango:");
    let (from, to) = (b"fruit/banana".as_slice(), b"fruit/mango".as_slice());
    for item in backend.cursor(Some(from), Some(to)) {
        let (key, _) = item?;
        println!("  {}", String::from_utf8_lossy(&key));
    }

    // Deletes drop out of the index as well, so a later scan skips them.
    backend.delete(b"fruit/banana")?;
    let remaining: Vec<_> = backend
        .cursor(Some(b"fruit/".as_slice()), None)
        .collect::<LexbaseResult<Vec<_>>>()?;
    println!(
        "\nAfter deleting fruit/banana, {} pairs remain from fruit/ onward",
        remaining.len()
    );

    // The adapter is itself a `RawBackend`, so the store facade treats it
    // like any native engine.
    let store = LexbaseStore::memory()?;
    store.put(b"k", b"v")?;
    println!(
        "\nstore backend `{}` (native order: {})",
        store.backend_name(),
        store.supports_native_order()
    );

    backend.close()?;
    store.close()?;
    println!("\n✓ Done");

    Ok(())
}
