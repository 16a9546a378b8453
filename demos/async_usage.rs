//! Async usage examples

use objectpool::{CancellationToken, FactoryError, ObjectPool, PoolConfiguration};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Connection {
    id: usize,
}

#[tokio::main]
async fn main() {
    println!("=== objectpool - Async Examples ===\n");

    // Example 1: Async factory
    async_factory().await;

    // Example 2: Cancellation
    cancellation().await;

    // Example 3: Concurrent access
    concurrent_access().await;
}

async fn connection_pool(minimum: usize, maximum: usize) -> ObjectPool<Connection> {
    let next_id = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let config = PoolConfiguration::new().with_bounds(minimum, maximum).unwrap();

    ObjectPool::with_async_factory(
        move |_cancel: CancellationToken| {
            let next_id = Arc::clone(&next_id);
            async move {
                // Pretend to do a handshake
                sleep(Duration::from_millis(20)).await;
                let id = next_id.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                Ok::<_, FactoryError>(Connection { id })
            }
        },
        config,
    )
    .await
    .unwrap()
}

async fn async_factory() {
    println!("1. Async Factory:");
    let pool = connection_pool(2, 4).await;
    println!("   Idle after construction: {}", pool.objects_in_pool_count());

    {
        let conn = pool.get_object_async(&CancellationToken::new()).await.unwrap();
        println!("   Got connection {}", conn.id);
    }

    match pool.get_object() {
        Ok(_) => println!("   Unexpected sync acquisition"),
        Err(e) => println!("   Sync acquisition refused: {}", e),
    }

    println!();
}

async fn cancellation() {
    println!("2. Cancellation:");
    let pool = connection_pool(0, 4).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    match pool.get_object_async(&cancel).await {
        Ok(_) => println!("   Got connection"),
        Err(e) => println!("   Error: {}", e),
    }

    println!();
}

async fn concurrent_access() {
    println!("3. Concurrent Access:");
    let pool = connection_pool(0, 5).await;

    let mut handles = vec![];

    for i in 0..10 {
        let pool = pool.clone();
        let handle = tokio::spawn(async move {
            let conn = pool.get_object_async(&CancellationToken::new()).await.unwrap();
            println!("   Task {} got connection {}", i, conn.id);
            sleep(Duration::from_millis(50)).await;
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    println!("   Final idle: {}", pool.objects_in_pool_count());
}
