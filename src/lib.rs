//! # objectpool
//!
//! Thread-safe pool of expensive-to-build objects, bounded between a
//! minimum and a maximum number of idle objects.
//!
//! ## Features
//!
//! - Lock-free idle store; no global lock on acquire or return
//! - Automatic return of objects via RAII (Drop trait)
//! - Sync and async factories, async acquisition with cancellation
//! - Bounds adjustable at runtime, with on-demand trim/top-up
//! - Validation and reset hooks applied on return
//! - Optional usage diagnostics
//! - Ready-made pool of `String` buffers
//!
//! ## Quick Start
//!
//! ```rust
//! use objectpool::ObjectPool;
//!
//! let pool = ObjectPool::new(1, 8, || Vec::<u8>::with_capacity(1024)).unwrap();
//! {
//!     let mut buffer = pool.get_object().unwrap();
//!     buffer.extend_from_slice(b"payload");
//!     // Buffer automatically returned when `buffer` goes out of scope
//! }
//! assert_eq!(pool.objects_in_pool_count(), 2);
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`trace` per object, `debug` for
//! maintenance) and never installs a subscriber itself.

mod bounds;
mod config;
mod diagnostics;
mod errors;
mod factory;
mod pool;
mod store;
mod string_pool;

pub use bounds::Bounds;
pub use config::PoolConfiguration;
pub use diagnostics::{DiagnosticsSnapshot, PoolDiagnostics};
pub use errors::{PoolError, PoolResult};
pub use factory::{AsyncFactory, FactoryError};
pub use pool::{ObjectPool, PooledObject};
pub use string_pool::StringPool;
pub use tokio_util::sync::CancellationToken;
