use objectpool::{
    Bounds, CancellationToken, FactoryError, ObjectPool, PoolConfiguration, PoolError, PooledObject,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[derive(Debug, Default)]
struct Resource {
    uses: usize,
}

fn default_pool() -> ObjectPool<Resource> {
    ObjectPool::with_configuration(Resource::default, PoolConfiguration::new())
}

#[test]
fn satisfies_minimum_size_on_construction() {
    for minimum in [0, 1, 5, 10, 50, 100] {
        let pool = ObjectPool::new(minimum, minimum * 2 + 1, Resource::default).unwrap();
        assert_eq!(pool.objects_in_pool_count(), minimum, "minimum {minimum}");
    }
}

#[test]
fn fills_until_maximum_size() {
    for maximum in [1, 5, 10, 50, 100] {
        let pool = ObjectPool::new(0, maximum, Resource::default).unwrap();

        let objects: Vec<_> = (0..maximum * 2).map(|_| pool.get_object().unwrap()).collect();
        drop(objects);

        assert_eq!(pool.objects_in_pool_count(), maximum, "maximum {maximum}");
    }
}

#[test]
fn fills_until_maximum_size_concurrently() {
    for maximum in [1, 5, 10, 50, 100] {
        let pool = ObjectPool::new(0, maximum, Resource::default).unwrap();

        let objects: Vec<PooledObject<Resource>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..maximum * 2)
                .map(|_| scope.spawn(|| pool.get_object().unwrap()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        thread::scope(|scope| {
            for object in objects {
                scope.spawn(move || drop(object));
            }
        });

        assert_eq!(pool.objects_in_pool_count(), maximum, "maximum {maximum}");
    }
}

#[test]
fn rejects_invalid_bounds() {
    let err = ObjectPool::new(0, 0, Resource::default).unwrap_err();
    assert!(err.is_configuration());

    assert!(ObjectPool::new(10, 9, Resource::default).unwrap_err().is_configuration());

    let pool = default_pool();
    assert!(pool.set_maximum_size(0).unwrap_err().is_configuration());
    assert_eq!(pool.bounds(), Bounds::default());
}

#[test]
fn changes_pool_limits() {
    let pool = default_pool();
    assert_eq!(pool.minimum_size(), Bounds::DEFAULT_MINIMUM);
    assert_eq!(pool.maximum_size(), Bounds::DEFAULT_MAXIMUM);

    pool.set_minimum_size(pool.maximum_size() - 5);
    assert_eq!(pool.minimum_size(), Bounds::DEFAULT_MAXIMUM - 5);
    assert_eq!(pool.maximum_size(), Bounds::DEFAULT_MAXIMUM);

    pool.set_maximum_size(pool.maximum_size() * 2).unwrap();
    assert_eq!(pool.minimum_size(), Bounds::DEFAULT_MAXIMUM - 5);
    assert_eq!(pool.maximum_size(), Bounds::DEFAULT_MAXIMUM * 2);

    pool.set_minimum_size(1);
    assert_eq!(pool.minimum_size(), 1);
    assert_eq!(pool.maximum_size(), Bounds::DEFAULT_MAXIMUM * 2);

    pool.set_maximum_size(2).unwrap();
    assert_eq!(pool.minimum_size(), 1);
    assert_eq!(pool.maximum_size(), 2);
}

#[test]
fn lowering_maximum_drops_surplus_idle_objects() {
    let pool = ObjectPool::new(5, 100, Resource::default).unwrap();
    assert_eq!(pool.objects_in_pool_count(), 5);

    pool.set_maximum_size(2).unwrap();
    assert_eq!(pool.minimum_size(), 2);
    assert_eq!(pool.objects_in_pool_count(), 2);

    // Objects checked out before the change are dropped when they come back
    pool.set_maximum_size(10).unwrap();
    let held: Vec<_> = (0..6).map(|_| pool.get_object().unwrap()).collect();
    pool.set_maximum_size(3).unwrap();
    drop(held);
    assert!(pool.objects_in_pool_count() <= 3);
}

#[test]
fn clear_after_no_usage() {
    let pool = default_pool();
    pool.clear();
    assert_eq!(pool.objects_in_pool_count(), 0);
}

#[test]
fn clear_after_some_usage() {
    let pool = default_pool();
    drop(pool.get_object().unwrap());

    pool.clear();
    assert_eq!(pool.objects_in_pool_count(), 0);
}

#[test]
fn clear_then_pool_can_be_used_again() {
    let pool = default_pool();
    drop(pool.get_object().unwrap());

    pool.clear();
    drop(pool.get_object().unwrap());

    assert_eq!(pool.objects_in_pool_count(), 1);
}

#[test]
fn clear_then_reach_minimum_size_at_second_usage() {
    let pool = default_pool();
    drop(pool.get_object().unwrap());

    pool.clear();

    // Usage A
    drop(pool.get_object().unwrap());
    drop(pool.get_object().unwrap());

    // One is for usage A
    assert_eq!(pool.objects_in_pool_count(), Bounds::DEFAULT_MINIMUM + 1);
}

#[test]
fn objects_are_reused() {
    let pool = ObjectPool::new(0, 4, Resource::default).unwrap();

    for _ in 0..3 {
        let mut resource = pool.get_object().unwrap();
        resource.uses += 1;
    }

    assert_eq!(pool.get_object().unwrap().uses, 3);
}

#[test]
fn acquire_release_storm_stays_within_maximum() {
    let maximum = 16;
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let pool = ObjectPool::new(4, maximum, move || {
        counter.fetch_add(1, Ordering::Relaxed);
        Resource::default()
    })
    .unwrap();

    thread::scope(|scope| {
        for _ in 0..200 {
            scope.spawn(|| {
                for i in 0..50 {
                    let mut held = vec![pool.get_object().unwrap()];
                    if i % 3 == 0 {
                        held.push(pool.get_object().unwrap());
                    }
                    held[0].uses += 1;
                }
            });
        }
    });

    assert!(pool.objects_in_pool_count() <= maximum);
    assert!(pool.objects_in_pool_count() >= 4);
    assert!(built.load(Ordering::Relaxed) >= pool.objects_in_pool_count());
}

#[test]
fn adjust_after_concurrent_use() {
    let pool = ObjectPool::new(0, 8, Resource::default).unwrap();

    let objects: Vec<_> = (0..32).map(|_| pool.get_object().unwrap()).collect();
    thread::scope(|scope| {
        for object in objects {
            scope.spawn(move || drop(object));
        }
    });

    pool.adjust_pool_size_to_bounds().unwrap();
    assert_eq!(pool.objects_in_pool_count(), 8);
}

#[tokio::test]
async fn sync_acquisition_refused_with_only_async_factory() {
    let pool = ObjectPool::with_async_factory(
        |_: CancellationToken| async { Ok::<_, FactoryError>(Resource::default()) },
        PoolConfiguration::new(),
    )
    .await
    .unwrap();

    assert_eq!(pool.objects_in_pool_count(), Bounds::DEFAULT_MINIMUM);
    for _ in 0..3 {
        assert!(matches!(pool.get_object(), Err(PoolError::SyncOverAsync)));
    }
}

#[tokio::test]
async fn async_acquisition_uses_async_factory_on_miss() {
    let sync_built = Arc::new(AtomicUsize::new(0));
    let async_built = Arc::new(AtomicUsize::new(0));

    let pool = {
        let sync_built = Arc::clone(&sync_built);
        let async_built = Arc::clone(&async_built);
        ObjectPool::with_factories(
            move || {
                sync_built.fetch_add(1, Ordering::Relaxed);
                Ok(Resource::default())
            },
            move |_: CancellationToken| {
                let async_built = Arc::clone(&async_built);
                async move {
                    tokio::task::yield_now().await;
                    async_built.fetch_add(1, Ordering::Relaxed);
                    Ok::<_, FactoryError>(Resource::default())
                }
            },
            PoolConfiguration::new().with_bounds(0, 4).unwrap(),
        )
        .unwrap()
    };
    assert_eq!(sync_built.load(Ordering::Relaxed), 0);

    let cancel = CancellationToken::new();
    let first = pool.get_object_async(&cancel).await.unwrap();
    let second = pool.get_object_async(&cancel).await.unwrap();
    drop((first, second));

    assert_eq!(async_built.load(Ordering::Relaxed), 2);
    assert_eq!(pool.objects_in_pool_count(), 2);

    // Sync acquisition is served from the store, then by the sync factory.
    drop(pool.get_object().unwrap());
    assert_eq!(sync_built.load(Ordering::Relaxed), 0);

    pool.clear();
    drop(pool.get_object().unwrap());
    assert_eq!(sync_built.load(Ordering::Relaxed), 1);
    assert_eq!(async_built.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn async_factory_failure_is_returned_unchanged() {
    let pool = ObjectPool::with_async_factory(
        |_: CancellationToken| async { Err::<Resource, FactoryError>("connection refused".into()) },
        PoolConfiguration::new().with_bounds(0, 4).unwrap(),
    )
    .await
    .unwrap();

    let err = pool.get_object_async(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, PoolError::Factory(_)));
    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(pool.objects_in_pool_count(), 0);
}

#[tokio::test]
async fn async_factory_failure_during_prefill_fails_construction() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);

    let result = ObjectPool::with_async_factory(
        move |_: CancellationToken| {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::Relaxed) == 2 {
                    return Err::<Resource, FactoryError>("out of handles".into());
                }
                Ok(Resource::default())
            }
        },
        PoolConfiguration::new().with_bounds(4, 8).unwrap(),
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, PoolError::Factory(_)));
    assert_eq!(err.to_string(), "out of handles");
    assert_eq!(built.load(Ordering::Relaxed), 3);
}

#[tokio::test]
async fn cancellation_is_checked_only_before_construction() {
    let cancel = CancellationToken::new();
    let started = Arc::new(tokio::sync::Notify::new());
    let proceed = Arc::new(tokio::sync::Notify::new());

    let pool = {
        let started = Arc::clone(&started);
        let proceed = Arc::clone(&proceed);
        ObjectPool::with_async_factory(
            move |_: CancellationToken| {
                let started = Arc::clone(&started);
                let proceed = Arc::clone(&proceed);
                async move {
                    started.notify_one();
                    proceed.notified().await;
                    Ok::<_, FactoryError>(Resource::default())
                }
            },
            PoolConfiguration::new().with_bounds(0, 4).unwrap(),
        )
        .await
        .unwrap()
    };

    let acquire = {
        let pool = pool.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { pool.get_object_async(&cancel).await.map(|o| o.uses) })
    };

    started.notified().await;
    cancel.cancel();
    proceed.notify_one();

    assert_eq!(acquire.await.unwrap().unwrap(), 0);
    assert!(matches!(
        pool.get_object_async(&cancel).await,
        Err(PoolError::Cancelled)
    ));
}

#[tokio::test]
async fn concurrent_async_acquisition() {
    let pool = ObjectPool::new(0, 10, Resource::default).unwrap();

    let tasks: Vec<_> = (0..100)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                let mut obj = pool.get_object_async(&CancellationToken::new()).await.unwrap();
                obj.uses += 1;
                tokio::task::yield_now().await;
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert!(pool.objects_in_pool_count() <= 10);
}

#[test]
fn handle_outlives_pool() {
    let pool = ObjectPool::new(0, 2, Resource::default).unwrap();
    let mut obj = pool.get_object().unwrap();
    drop(pool);

    obj.uses += 1;
    drop(obj);
}
