// objectpool - quick demo binary
// The library lives in lib.rs; run the longer demos with: cargo run --example basic
// Log output is controlled through RUST_LOG, e.g. RUST_LOG=objectpool=trace

use objectpool::{ObjectPool, PoolConfiguration, StringPool};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== objectpool ===");
    println!("See demos/ for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    println!("Quick Demo:");
    let config = PoolConfiguration::new()
        .with_bounds(2, 4)
        .expect("demo bounds are valid")
        .with_diagnostics(true);
    let pool = ObjectPool::with_configuration(|| vec![0u8; 4096], config);
    println!("  Idle after construction: {}", pool.objects_in_pool_count());

    {
        let buffer = pool.get_object().expect("pool has a sync factory");
        println!("  Got buffer of {} bytes", buffer.len());
    }

    println!("  Idle after return: {}", pool.objects_in_pool_count());
    println!("  Diagnostics: {:?}", pool.diagnostics().snapshot());

    let text = StringPool::shared().get_object_with("shared string pool").expect("string pool has a sync factory");
    println!("  {}", *text);
}
