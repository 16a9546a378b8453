//! Usage diagnostics for object pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Counters describing how a pool is used.
///
/// Disabled by default: every `record_*` call then stops after a relaxed
/// load of the enabled flag. The pool still reads its current diagnostics
/// object through an `ArcSwap` guard before each call. Counters only grow;
/// [`reset`](Self::reset) is the only way to bring them back to zero.
///
/// # Examples
///
/// ```
/// use objectpool::{ObjectPool, PoolConfiguration};
///
/// let config = PoolConfiguration::new().with_bounds(0, 4).unwrap().with_diagnostics(true);
/// let pool = ObjectPool::with_configuration(|| 0u32, config);
///
/// drop(pool.get_object().unwrap());
/// drop(pool.get_object().unwrap());
///
/// let snapshot = pool.diagnostics().snapshot();
/// assert_eq!(snapshot.created, 1);
/// assert_eq!(snapshot.reused, 1);
/// assert_eq!(snapshot.returned, 2);
/// ```
#[derive(Debug, Default)]
pub struct PoolDiagnostics {
    enabled: AtomicBool,
    created: AtomicU64,
    reused: AtomicU64,
    returned: AtomicU64,
    destroyed: AtomicU64,
    cleared: AtomicU64,
}

impl PoolDiagnostics {
    /// Disabled counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters that start out recording
    pub fn enabled() -> Self {
        let diagnostics = Self::default();
        diagnostics.set_enabled(true);
        diagnostics
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Zero every counter. Does not change whether recording is enabled.
    pub fn reset(&self) {
        for counter in [
            &self.created,
            &self.reused,
            &self.returned,
            &self.destroyed,
            &self.cleared,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Copy out the current counter values
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            cleared: self.cleared.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_created(&self) {
        self.bump(&self.created, 1);
    }

    pub(crate) fn record_reused(&self) {
        self.bump(&self.reused, 1);
    }

    pub(crate) fn record_returned(&self) {
        self.bump(&self.returned, 1);
    }

    pub(crate) fn record_destroyed(&self, count: u64) {
        self.bump(&self.destroyed, count);
    }

    pub(crate) fn record_cleared(&self) {
        self.bump(&self.cleared, 1);
    }

    #[inline]
    fn bump(&self, counter: &AtomicU64, by: u64) {
        if self.is_enabled() {
            counter.fetch_add(by, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`PoolDiagnostics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct DiagnosticsSnapshot {
    /// Objects built by a factory
    pub created: u64,

    /// Acquisitions served from the idle store
    pub reused: u64,

    /// Objects that went back into the idle store
    pub returned: u64,

    /// Objects dropped by the pool (store full, rejected, cleared, trimmed)
    pub destroyed: u64,

    /// Calls to `clear`
    pub cleared: u64,
}

impl DiagnosticsSnapshot {
    /// Export the counters as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("created".to_string(), self.created.to_string());
        metrics.insert("reused".to_string(), self.reused.to_string());
        metrics.insert("returned".to_string(), self.returned.to_string());
        metrics.insert("destroyed".to_string(), self.destroyed.to_string());
        metrics.insert("cleared".to_string(), self.cleared.to_string());
        metrics
    }

    /// Share of acquisitions served from the idle store (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let acquisitions = self.created + self.reused;
        if acquisitions > 0 {
            self.reused as f64 / acquisitions as f64
        } else {
            0.0
        }
    }
}
