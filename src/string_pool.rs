//! Pool of reusable `String` buffers

use crate::config::PoolConfiguration;
use crate::errors::PoolResult;
use crate::pool::{ObjectPool, PooledObject};

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

static SHARED: OnceLock<StringPool> = OnceLock::new();

/// An [`ObjectPool`] of `String` buffers, ready to use.
///
/// New buffers start with [`minimum_string_capacity`](Self::minimum_string_capacity).
/// Buffers that grew past [`maximum_string_capacity`](Self::maximum_string_capacity)
/// are dropped on return instead of being kept around; the others are
/// cleared and reused.
///
/// Everything else (bounds, diagnostics, clearing) comes from the wrapped
/// pool, reachable through `Deref`.
///
/// # Examples
///
/// ```
/// use objectpool::StringPool;
///
/// let pool = StringPool::new();
/// {
///     let mut text = pool.get_object_with("id=").unwrap();
///     text.push_str("42");
///     assert_eq!(text.as_str(), "id=42");
/// }
///
/// // Reused buffers come back empty
/// assert!(pool.get_object().unwrap().is_empty());
/// ```
pub struct StringPool {
    pool: ObjectPool<String>,
    minimum_capacity: Arc<AtomicUsize>,
    maximum_capacity: Arc<AtomicUsize>,
}

impl StringPool {
    /// Capacity of newly built buffers unless configured otherwise (4 KiB)
    pub const DEFAULT_MINIMUM_CAPACITY: usize = 4 * 1024;

    /// Largest capacity a buffer may have and still be reused (512 KiB)
    pub const DEFAULT_MAXIMUM_CAPACITY: usize = 512 * 1024;

    /// A string pool with default bounds
    pub fn new() -> Self {
        Self::with_configuration(PoolConfiguration::new())
    }

    /// A string pool with custom bounds or diagnostics.
    ///
    /// Validation and reset hooks in `config` are replaced by the string
    /// pool's own.
    pub fn with_configuration(config: PoolConfiguration<String>) -> Self {
        let minimum_capacity = Arc::new(AtomicUsize::new(Self::DEFAULT_MINIMUM_CAPACITY));
        let maximum_capacity = Arc::new(AtomicUsize::new(Self::DEFAULT_MAXIMUM_CAPACITY));

        let config = {
            let maximum_capacity = Arc::clone(&maximum_capacity);
            config
                .with_validation(move |text: &String| {
                    text.capacity() <= maximum_capacity.load(Ordering::Relaxed)
                })
                .with_reset(String::clear)
        };

        let factory = {
            let minimum_capacity = Arc::clone(&minimum_capacity);
            move || String::with_capacity(minimum_capacity.load(Ordering::Relaxed))
        };

        Self {
            pool: ObjectPool::with_configuration(factory, config),
            minimum_capacity,
            maximum_capacity,
        }
    }

    /// Process-wide string pool, created on first use and never torn down
    pub fn shared() -> &'static StringPool {
        SHARED.get_or_init(StringPool::new)
    }

    /// Get a buffer holding `value`
    pub fn get_object_with(&self, value: &str) -> PoolResult<PooledObject<String>> {
        let mut text = self.pool.get_object()?;
        text.push_str(value);
        Ok(text)
    }

    pub fn minimum_string_capacity(&self) -> usize {
        self.minimum_capacity.load(Ordering::Relaxed)
    }

    /// Capacity of buffers built from now on
    pub fn set_minimum_string_capacity(&self, capacity: usize) {
        self.minimum_capacity.store(capacity, Ordering::Relaxed);
    }

    pub fn maximum_string_capacity(&self) -> usize {
        self.maximum_capacity.load(Ordering::Relaxed)
    }

    /// Largest capacity a returned buffer may have and still be reused
    pub fn set_maximum_string_capacity(&self, capacity: usize) {
        self.maximum_capacity.store(capacity, Ordering::Relaxed);
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for StringPool {
    type Target = ObjectPool<String>;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
