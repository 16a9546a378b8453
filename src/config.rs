//! Pool configuration options

use crate::bounds::Bounds;
use crate::errors::PoolResult;
use std::fmt;
use std::sync::Arc;

pub(crate) type ValidationFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
pub(crate) type ResetFn<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// Configuration for object pool behavior
///
/// # Examples
///
/// ```
/// use objectpool::PoolConfiguration;
///
/// let config = PoolConfiguration::<Vec<u8>>::new()
///     .with_bounds(2, 16)
///     .unwrap()
///     .with_validation(|buffer| buffer.capacity() <= 4096)
///     .with_reset(|buffer| buffer.clear())
///     .with_diagnostics(true);
///
/// assert_eq!(config.bounds.minimum(), 2);
/// assert_eq!(config.bounds.maximum(), 16);
/// assert!(config.diagnostics_enabled);
/// ```
pub struct PoolConfiguration<T> {
    /// Minimum and maximum number of idle objects
    pub bounds: Bounds,

    /// Decides on return whether an object may be reused; rejected objects are dropped
    pub(crate) validation_function: Option<ValidationFn<T>>,

    /// Puts a returned object back into a reusable state
    pub(crate) reset_function: Option<ResetFn<T>>,

    /// Whether the pool starts with diagnostics recording
    pub diagnostics_enabled: bool,
}

impl<T> Default for PoolConfiguration<T> {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            validation_function: None,
            reset_function: None,
            diagnostics_enabled: false,
        }
    }
}

impl<T> Clone for PoolConfiguration<T> {
    fn clone(&self) -> Self {
        Self {
            bounds: self.bounds,
            validation_function: self.validation_function.clone(),
            reset_function: self.reset_function.clone(),
            diagnostics_enabled: self.diagnostics_enabled,
        }
    }
}

impl<T> fmt::Debug for PoolConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfiguration")
            .field("bounds", &self.bounds)
            .field("validates_on_return", &self.validation_function.is_some())
            .field("resets_on_return", &self.reset_function.is_some())
            .field("diagnostics_enabled", &self.diagnostics_enabled)
            .finish()
    }
}

impl<T> PoolConfiguration<T> {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum and maximum pool size
    ///
    /// # Examples
    ///
    /// ```
    /// use objectpool::PoolConfiguration;
    ///
    /// assert!(PoolConfiguration::<i32>::new().with_bounds(0, 1).is_ok());
    /// assert!(PoolConfiguration::<i32>::new().with_bounds(0, 0).is_err());
    /// assert!(PoolConfiguration::<i32>::new().with_bounds(3, 2).is_err());
    /// ```
    pub fn with_bounds(mut self, minimum: usize, maximum: usize) -> PoolResult<Self> {
        self.bounds = Bounds::new(minimum, maximum)?;
        Ok(self)
    }

    /// Validate objects when they are returned
    pub fn with_validation<F>(mut self, func: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validation_function = Some(Arc::new(func));
        self
    }

    /// Reset objects that pass validation before they go back to the idle store
    pub fn with_reset<F>(mut self, func: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.reset_function = Some(Arc::new(func));
        self
    }

    /// Enable or disable diagnostics recording
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics_enabled = enabled;
        self
    }
}
