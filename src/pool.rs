//! Core object pool implementation

use crate::bounds::Bounds;
use crate::config::{PoolConfiguration, ResetFn, ValidationFn};
use crate::diagnostics::PoolDiagnostics;
use crate::errors::{PoolError, PoolResult};
use crate::factory::{AsyncFactory, Factories, FactoryError, SyncFactory};
use crate::store::IdleStore;

use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::convert::Infallible;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio_util::sync::CancellationToken;

/// A pooled object that automatically returns to the pool when dropped
///
/// The handle only holds a weak reference to its pool. If the pool is gone
/// by the time the handle is released, the object is simply dropped.
pub struct PooledObject<T> {
    value: Option<T>,
    pool: Weak<PoolInner<T>>,
}

impl<T> PooledObject<T> {
    fn new(value: T, pool: Weak<PoolInner<T>>) -> Self {
        Self {
            value: Some(value),
            pool,
        }
    }

    /// Return the object to its pool now instead of at end of scope
    pub fn release(mut self) {
        self.return_to_owner();
    }

    /// Whether the object has already gone back to the pool
    pub fn is_released(&self) -> bool {
        self.value.is_none()
    }

    /// Take the object out of the pool's control for good.
    ///
    /// Returns `None` if the handle was already released.
    pub fn into_inner(mut self) -> Option<T> {
        self.value.take()
    }

    fn return_to_owner(&mut self) {
        let Some(value) = self.value.take() else {
            return;
        };

        match self.pool.upgrade() {
            Some(pool) => pool.accept_returned(value),
            None => tracing::trace!("Pool is gone, dropping released object"),
        }
    }
}

impl<T> Deref for PooledObject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value.as_ref().expect("Pooled object already released")
    }
}

impl<T> DerefMut for PooledObject<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value.as_mut().expect("Pooled object already released")
    }
}

impl<T> Drop for PooledObject<T> {
    fn drop(&mut self) {
        self.return_to_owner();
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledObject")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

struct PoolInner<T> {
    store: IdleStore<T>,
    bounds: RwLock<Bounds>,
    factories: Factories<T>,
    validation: Option<ValidationFn<T>>,
    reset: Option<ResetFn<T>>,
    diagnostics: ArcSwap<PoolDiagnostics>,
    refilling: AtomicBool,
}

impl<T> PoolInner<T> {
    fn accept_returned(&self, mut value: T) {
        let diagnostics = self.diagnostics.load();

        if let Some(validate) = &self.validation
            && !validate(&value)
        {
            drop(value);
            diagnostics.record_destroyed(1);
            tracing::debug!("Destroyed returned object that failed validation");
            return;
        }

        if let Some(reset) = &self.reset {
            reset(&mut value);
        }

        let maximum = self.bounds.read().maximum();
        match self.store.try_add(value, maximum) {
            Ok(()) => {
                diagnostics.record_returned();
                tracing::trace!("Returned object to pool");
            }
            Err(value) => {
                drop(value);
                diagnostics.record_destroyed(1);
                tracing::debug!(maximum, "Pool is full, destroyed returned object");
            }
        }
    }

    /// Count a freshly built object and try to idle it. False if the store was full.
    fn admit_created(&self, value: T, maximum: usize) -> bool {
        let diagnostics = self.diagnostics.load();
        diagnostics.record_created();

        match self.store.try_add(value, maximum) {
            Ok(()) => true,
            Err(value) => {
                drop(value);
                diagnostics.record_destroyed(1);
                false
            }
        }
    }
}

/// Thread-safe object pool bounded between a minimum and maximum idle size
///
/// Cloning the pool is cheap and yields another handle to the same pool.
///
/// # Examples
///
/// ```
/// use objectpool::ObjectPool;
///
/// let pool = ObjectPool::new(2, 10, || String::with_capacity(64)).unwrap();
/// assert_eq!(pool.objects_in_pool_count(), 2);
///
/// {
///     let mut text = pool.get_object().unwrap();
///     text.push_str("hello");
///     assert_eq!(pool.objects_in_pool_count(), 2);
/// }
///
/// // Back in the pool once the handle went out of scope
/// assert_eq!(pool.objects_in_pool_count(), 3);
/// ```
pub struct ObjectPool<T> {
    inner: Arc<PoolInner<T>>,
}

impl<T> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("bounds", &*self.inner.bounds.read())
            .field("objects_in_pool", &self.inner.store.len())
            .field("has_async_factory", &self.inner.factories.has_async())
            .finish()
    }
}

impl<T: Send + 'static> ObjectPool<T> {
    /// Create a pool with the given bounds, pre-filled to `minimum_size`
    pub fn new<F>(minimum_size: usize, maximum_size: usize, factory: F) -> PoolResult<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let config = PoolConfiguration::new().with_bounds(minimum_size, maximum_size)?;
        Ok(Self::with_configuration(factory, config))
    }

    /// Create a pool from a configuration and an infallible factory
    pub fn with_configuration<F>(factory: F, config: PoolConfiguration<T>) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory = Arc::new(factory);
        let sync: SyncFactory<T> = {
            let factory = Arc::clone(&factory);
            Arc::new(move || Ok(factory()))
        };

        let pool = Self::from_parts(Factories::Sync(sync), config);
        let Ok(_) = pool.fill_with(|| Ok::<_, Infallible>(factory()));
        pool
    }

    /// Create a pool whose factory may fail.
    ///
    /// Fails if the factory fails while pre-filling the pool.
    pub fn try_with_configuration<F>(factory: F, config: PoolConfiguration<T>) -> PoolResult<Self>
    where
        F: Fn() -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        let pool = Self::from_parts(Factories::Sync(Arc::new(factory)), config);
        pool.top_up()?;
        Ok(pool)
    }

    /// Create a pool with only an async factory.
    ///
    /// Such a pool refuses [`get_object`](Self::get_object); use
    /// [`get_object_async`](Self::get_object_async).
    pub async fn with_async_factory<A>(factory: A, config: PoolConfiguration<T>) -> PoolResult<Self>
    where
        A: AsyncFactory<T> + 'static,
    {
        let pool = Self::from_parts(Factories::Async(Arc::new(factory)), config);
        pool.top_up_async(&CancellationToken::new()).await?;
        Ok(pool)
    }

    /// Create a pool with both a sync and an async factory.
    ///
    /// The sync factory pre-fills the pool and serves [`get_object`](Self::get_object);
    /// the async one serves misses in [`get_object_async`](Self::get_object_async).
    pub fn with_factories<F, A>(
        factory: F,
        async_factory: A,
        config: PoolConfiguration<T>,
    ) -> PoolResult<Self>
    where
        F: Fn() -> Result<T, FactoryError> + Send + Sync + 'static,
        A: AsyncFactory<T> + 'static,
    {
        let factories = Factories::Both {
            sync: Arc::new(factory),
            asynchronous: Arc::new(async_factory),
        };
        let pool = Self::from_parts(factories, config);
        pool.top_up()?;
        Ok(pool)
    }

    fn from_parts(factories: Factories<T>, config: PoolConfiguration<T>) -> Self {
        let diagnostics = if config.diagnostics_enabled {
            PoolDiagnostics::enabled()
        } else {
            PoolDiagnostics::new()
        };

        Self {
            inner: Arc::new(PoolInner {
                store: IdleStore::new(),
                bounds: RwLock::new(config.bounds),
                factories,
                validation: config.validation_function,
                reset: config.reset_function,
                diagnostics: ArcSwap::from_pointee(diagnostics),
                refilling: AtomicBool::new(false),
            }),
        }
    }

    /// Get an object from the pool, building one if no idle object is available.
    ///
    /// Never blocks on async construction: a pool with only an async factory
    /// fails with [`PoolError::SyncOverAsync`].
    pub fn get_object(&self) -> PoolResult<PooledObject<T>> {
        let Some(factory) = self.inner.factories.sync() else {
            return Err(PoolError::SyncOverAsync);
        };

        if let Some(value) = self.take_idle() {
            self.refill_after_hit();
            return Ok(self.wrap(value));
        }

        let value = factory().map_err(PoolError::from)?;
        self.inner.diagnostics.load().record_created();
        tracing::trace!("Created new object on pool miss");
        Ok(self.wrap(value))
    }

    /// Get an object from the pool, awaiting the factory if no idle object is available.
    ///
    /// `cancel` is checked once, before anything else. A factory call that
    /// has started runs to completion. A hit never refills the pool here:
    /// that would run the sync factory on the calling task.
    pub async fn get_object_async(&self, cancel: &CancellationToken) -> PoolResult<PooledObject<T>> {
        if cancel.is_cancelled() {
            return Err(PoolError::Cancelled);
        }

        if let Some(value) = self.take_idle() {
            return Ok(self.wrap(value));
        }

        let value = self.inner.factories.create(cancel).await?;
        self.inner.diagnostics.load().record_created();
        tracing::trace!("Created new object on pool miss");
        Ok(self.wrap(value))
    }

    /// Return a checked-out object to the pool that owns it.
    ///
    /// Releasing an already released handle does nothing. The handle is left
    /// empty; dereferencing it afterwards panics.
    pub fn return_object_to_pool(&self, object: &mut PooledObject<T>) {
        object.return_to_owner();
    }

    /// Drop every idle object. The pool is not refilled.
    pub fn clear(&self) {
        let dropped = self.inner.store.drain();
        let diagnostics = self.inner.diagnostics.load();
        diagnostics.record_destroyed(dropped as u64);
        diagnostics.record_cleared();
        tracing::debug!(dropped, "Cleared pool");
    }

    /// Trim idle objects above the maximum and build new ones up to the minimum.
    ///
    /// Topping up needs the sync factory; on a pool with only an async
    /// factory it fails with [`PoolError::SyncOverAsync`] once trimming is done.
    pub fn adjust_pool_size_to_bounds(&self) -> PoolResult<()> {
        self.trim_to_maximum();
        let added = self.top_up()?;
        if added > 0 {
            tracing::debug!(added, "Topped pool up to its minimum size");
        }
        Ok(())
    }

    /// Async variant of [`adjust_pool_size_to_bounds`](Self::adjust_pool_size_to_bounds).
    ///
    /// With a sync factory the work runs on tokio's blocking pool; otherwise
    /// the async factory tops the pool up.
    pub async fn adjust_pool_size_to_bounds_async(&self) -> PoolResult<()> {
        if self.inner.factories.sync().is_some() {
            let pool = self.clone();
            return match tokio::task::spawn_blocking(move || pool.adjust_pool_size_to_bounds()).await {
                Ok(result) => result,
                Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
                Err(_) => Err(PoolError::Cancelled),
            };
        }

        self.trim_to_maximum();
        let added = self.top_up_async(&CancellationToken::new()).await?;
        if added > 0 {
            tracing::debug!(added, "Topped pool up to its minimum size");
        }
        Ok(())
    }

    fn take_idle(&self) -> Option<T> {
        let value = self.inner.store.try_take()?;
        self.inner.diagnostics.load().record_reused();
        tracing::trace!("Reusing idle object");
        Some(value)
    }

    /// A hit that leaves the store under the minimum tops it back up, one caller at a time.
    fn refill_after_hit(&self) {
        if self.inner.factories.sync().is_none() || self.inner.store.len() >= self.minimum_size() {
            return;
        }

        if self
            .inner
            .refilling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        match self.top_up() {
            Ok(added) => tracing::debug!(added, "Refilled pool to its minimum size"),
            Err(error) => tracing::warn!(%error, "Failed to refill pool to its minimum size"),
        }

        self.inner.refilling.store(false, Ordering::Release);
    }

    fn wrap(&self, value: T) -> PooledObject<T> {
        PooledObject::new(value, Arc::downgrade(&self.inner))
    }

    fn top_up(&self) -> PoolResult<usize> {
        if self.inner.store.len() >= self.minimum_size() {
            return Ok(0);
        }

        let Some(factory) = self.inner.factories.sync() else {
            return Err(PoolError::SyncOverAsync);
        };

        self.fill_with(|| factory().map_err(PoolError::from))
    }

    /// Build objects with `make` until the store holds the minimum.
    fn fill_with<E>(&self, mut make: impl FnMut() -> Result<T, E>) -> Result<usize, E> {
        let mut added = 0;

        loop {
            let bounds = self.bounds();
            if self.inner.store.len() >= bounds.minimum() {
                break;
            }

            if !self.inner.admit_created(make()?, bounds.maximum()) {
                break;
            }
            added += 1;
        }

        Ok(added)
    }

    async fn top_up_async(&self, cancel: &CancellationToken) -> PoolResult<usize> {
        let mut added = 0;

        loop {
            let bounds = self.bounds();
            if self.inner.store.len() >= bounds.minimum() {
                break;
            }

            let value = self.inner.factories.create(cancel).await.inspect_err(|error| {
                tracing::warn!(%error, "Factory failed while filling pool");
            })?;
            if !self.inner.admit_created(value, bounds.maximum()) {
                break;
            }
            added += 1;
        }

        Ok(added)
    }
}

impl<T> ObjectPool<T> {
    pub fn minimum_size(&self) -> usize {
        self.inner.bounds.read().minimum()
    }

    /// Set the minimum size, raising the maximum to match if needed.
    ///
    /// The pool is not topped up until the next hit or
    /// `adjust_pool_size_to_bounds`.
    pub fn set_minimum_size(&self, minimum: usize) {
        let mut bounds = self.inner.bounds.write();
        *bounds = bounds.with_minimum(minimum);
        tracing::debug!(minimum = bounds.minimum(), maximum = bounds.maximum(), "Changed pool bounds");
    }

    pub fn maximum_size(&self) -> usize {
        self.inner.bounds.read().maximum()
    }

    /// Set the maximum size, lowering the minimum to match if needed.
    ///
    /// Fails if `maximum` is zero. Idle objects above the new maximum are
    /// dropped right away; checked-out objects are dropped when they come back.
    pub fn set_maximum_size(&self, maximum: usize) -> PoolResult<()> {
        {
            let mut bounds = self.inner.bounds.write();
            *bounds = bounds.with_maximum(maximum)?;
            tracing::debug!(minimum = bounds.minimum(), maximum = bounds.maximum(), "Changed pool bounds");
        }

        if self.objects_in_pool_count() > maximum {
            self.trim_to_maximum();
        }
        Ok(())
    }

    fn trim_to_maximum(&self) -> usize {
        let maximum = self.maximum_size();
        let mut trimmed = 0;

        while self.inner.store.len() > maximum {
            match self.inner.store.try_take() {
                Some(value) => {
                    drop(value);
                    trimmed += 1;
                }
                None => break,
            }
        }

        if trimmed > 0 {
            self.inner.diagnostics.load().record_destroyed(trimmed as u64);
            tracing::debug!(trimmed, maximum, "Trimmed pool to its maximum size");
        }
        trimmed
    }

    /// Current bounds, read atomically
    pub fn bounds(&self) -> Bounds {
        *self.inner.bounds.read()
    }

    /// Number of idle objects. Exact only while no other thread uses the pool.
    pub fn objects_in_pool_count(&self) -> usize {
        self.inner.store.len()
    }

    pub fn diagnostics(&self) -> Arc<PoolDiagnostics> {
        self.inner.diagnostics.load_full()
    }

    /// Replace the diagnostics counters, e.g. to share them between pools
    pub fn set_diagnostics(&self, diagnostics: Arc<PoolDiagnostics>) {
        self.inner.diagnostics.store(diagnostics);
    }

    pub fn has_sync_factory(&self) -> bool {
        self.inner.factories.sync().is_some()
    }

    pub fn has_async_factory(&self) -> bool {
        self.inner.factories.has_async()
    }
}
