//! Minimum/maximum size bounds of a pool

use crate::errors::{PoolError, PoolResult};

/// Validated size bounds of a pool.
///
/// `maximum` is at least 1 and `minimum` never exceeds `maximum`. A value
/// of this type cannot be built in any other state.
///
/// # Examples
///
/// ```
/// use objectpool::Bounds;
///
/// let bounds = Bounds::new(2, 10).unwrap();
///
/// // Raising the minimum above the maximum drags the maximum along.
/// let bounds = bounds.with_minimum(20);
/// assert_eq!((bounds.minimum(), bounds.maximum()), (20, 20));
///
/// // Lowering the maximum below the minimum drags the minimum along.
/// let bounds = bounds.with_maximum(4).unwrap();
/// assert_eq!((bounds.minimum(), bounds.maximum()), (4, 4));
///
/// assert!(Bounds::new(0, 0).is_err());
/// assert!(Bounds::new(5, 4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    minimum: usize,
    maximum: usize,
}

impl Bounds {
    /// Minimum pool size used when none is configured
    pub const DEFAULT_MINIMUM: usize = 5;

    /// Maximum pool size used when none is configured
    pub const DEFAULT_MAXIMUM: usize = 100;

    /// Validate a pair of bounds.
    ///
    /// Unlike the setters, construction does not cross-adjust: both values
    /// must be consistent.
    pub fn new(minimum: usize, maximum: usize) -> PoolResult<Self> {
        if maximum < 1 || minimum > maximum {
            return Err(PoolError::InvalidBounds { minimum, maximum });
        }
        Ok(Self { minimum, maximum })
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn maximum(&self) -> usize {
        self.maximum
    }

    /// Bounds with a new minimum. The maximum is raised to match if needed.
    pub fn with_minimum(self, minimum: usize) -> Self {
        Self {
            minimum,
            maximum: self.maximum.max(minimum),
        }
    }

    /// Bounds with a new maximum. The minimum is lowered to match if needed.
    pub fn with_maximum(self, maximum: usize) -> PoolResult<Self> {
        if maximum < 1 {
            return Err(PoolError::InvalidBounds {
                minimum: self.minimum,
                maximum,
            });
        }
        Ok(Self {
            minimum: self.minimum.min(maximum),
            maximum,
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            minimum: Self::DEFAULT_MINIMUM,
            maximum: Self::DEFAULT_MAXIMUM,
        }
    }
}
