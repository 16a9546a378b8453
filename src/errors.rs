//! Error types for the object pool

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PoolError {
    /// The requested bounds violate `1 <= maximum` or `minimum <= maximum`.
    #[error("Invalid pool bounds: minimum {minimum}, maximum {maximum}")]
    InvalidBounds { minimum: usize, maximum: usize },

    /// Synchronous construction was requested from a pool that only has an
    /// asynchronous factory.
    #[error("Pool has only an async factory; use the async variant of this operation")]
    SyncOverAsync,

    #[error("Operation was cancelled")]
    Cancelled,

    /// The factory failed. The factory's own error is carried unchanged.
    #[error(transparent)]
    Factory(Arc<dyn StdError + Send + Sync>),
}

impl PoolError {
    /// Whether this error comes from invalid bounds.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PoolError::InvalidBounds { .. })
    }

    /// The factory error, if this is one.
    pub fn factory_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            PoolError::Factory(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl From<crate::factory::FactoryError> for PoolError {
    fn from(error: crate::factory::FactoryError) -> Self {
        PoolError::Factory(Arc::from(error))
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
