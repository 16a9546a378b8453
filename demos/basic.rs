//! Basic usage examples for ObjectPool

use objectpool::{ObjectPool, PoolConfiguration};

fn main() {
    println!("=== objectpool - Basic Examples ===\n");

    // Example 1: Simple pool of buffers
    simple_pool();

    // Example 2: Pool with configuration
    configured_pool();

    // Example 3: Resizing at runtime
    resizing();

    // Example 4: Diagnostics
    diagnostics();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool = ObjectPool::new(2, 10, || Vec::<u8>::with_capacity(1024)).unwrap();
    println!("   Idle after construction: {}", pool.objects_in_pool_count());

    {
        let mut buffer = pool.get_object().unwrap();
        buffer.extend_from_slice(b"hello");
        println!("   Got buffer holding {} bytes", buffer.len());
        // Buffer automatically returned when dropped
    }

    println!("   Idle after return: {}\n", pool.objects_in_pool_count());
}

fn configured_pool() {
    println!("2. Configured Pool:");

    let config = PoolConfiguration::new()
        .with_bounds(0, 4)
        .unwrap()
        .with_validation(|buffer: &Vec<u8>| buffer.capacity() <= 4096)
        .with_reset(|buffer: &mut Vec<u8>| buffer.clear());

    let pool = ObjectPool::with_configuration(Vec::new, config);

    {
        let mut small = pool.get_object().unwrap();
        small.push(1);
        let mut huge = pool.get_object().unwrap();
        huge.resize(1 << 20, 0);
    }

    // The oversized buffer was dropped instead of being kept
    println!("   Idle after return: {}\n", pool.objects_in_pool_count());
}

fn resizing() {
    println!("3. Resizing:");
    let pool = ObjectPool::new(0, 10, String::new).unwrap();

    let held: Vec<_> = (0..8).map(|_| pool.get_object().unwrap()).collect();
    drop(held);
    println!("   Idle after returning 8: {}", pool.objects_in_pool_count());

    pool.set_maximum_size(3).unwrap();
    println!("   Idle after shrinking to 3: {}", pool.objects_in_pool_count());

    pool.set_minimum_size(5);
    pool.adjust_pool_size_to_bounds().unwrap();
    println!(
        "   Bounds now {}..={}, idle: {}\n",
        pool.minimum_size(),
        pool.maximum_size(),
        pool.objects_in_pool_count()
    );
}

fn diagnostics() {
    println!("4. Diagnostics:");
    let config = PoolConfiguration::new().with_bounds(1, 5).unwrap().with_diagnostics(true);
    let pool = ObjectPool::with_configuration(|| 0u64, config);

    for _ in 0..3 {
        let _obj = pool.get_object().unwrap();
    }
    pool.clear();

    let snapshot = pool.diagnostics().snapshot();
    println!("   Hit ratio: {:.1}%", snapshot.hit_ratio() * 100.0);
    for (key, value) in snapshot.export() {
        println!("     {}: {}", key, value);
    }
}
