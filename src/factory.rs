//! Factories that build new pool objects

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Error type returned by fallible factories
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type SyncFactory<T> = Arc<dyn Fn() -> Result<T, FactoryError> + Send + Sync>;

/// Builds pool objects asynchronously.
///
/// The cancellation token is the one passed to
/// [`ObjectPool::get_object_async`](crate::ObjectPool::get_object_async).
/// The pool checks it only before calling the factory; the factory may
/// observe it to stop early, but is not required to.
///
/// Any `Fn(CancellationToken) -> impl Future<Output = Result<T, FactoryError>>`
/// closure is an `AsyncFactory`.
///
/// # Examples
///
/// ```
/// use objectpool::{FactoryError, ObjectPool, PoolConfiguration};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let pool = ObjectPool::with_async_factory(
///     |_cancel: CancellationToken| async { Ok::<_, FactoryError>(vec![0u8; 1024]) },
///     PoolConfiguration::new().with_bounds(1, 4).unwrap(),
/// )
/// .await
/// .unwrap();
///
/// let buffer = pool.get_object_async(&CancellationToken::new()).await.unwrap();
/// assert_eq!(buffer.len(), 1024);
/// # }
/// ```
#[async_trait]
pub trait AsyncFactory<T>: Send + Sync {
    async fn create(&self, cancel: &CancellationToken) -> Result<T, FactoryError>;
}

#[async_trait]
impl<T, F, Fut> AsyncFactory<T> for F
where
    T: Send + 'static,
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, FactoryError>> + Send + 'static,
{
    async fn create(&self, cancel: &CancellationToken) -> Result<T, FactoryError> {
        (self)(cancel.clone()).await
    }
}

/// The factories a pool was built with
pub(crate) enum Factories<T> {
    Sync(SyncFactory<T>),
    Async(Arc<dyn AsyncFactory<T>>),
    Both {
        sync: SyncFactory<T>,
        asynchronous: Arc<dyn AsyncFactory<T>>,
    },
}

impl<T> Factories<T> {
    pub fn sync(&self) -> Option<&SyncFactory<T>> {
        match self {
            Factories::Sync(sync) | Factories::Both { sync, .. } => Some(sync),
            Factories::Async(_) => None,
        }
    }

    pub fn has_async(&self) -> bool {
        !matches!(self, Factories::Sync(_))
    }

    /// Build one object, preferring the async factory when there is one.
    pub async fn create(&self, cancel: &CancellationToken) -> Result<T, FactoryError> {
        match self {
            Factories::Sync(sync) => sync(),
            Factories::Async(asynchronous) | Factories::Both { asynchronous, .. } => {
                asynchronous.create(cancel).await
            }
        }
    }
}
