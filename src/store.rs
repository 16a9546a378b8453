//! Lock-free store of idle objects

use crossbeam::queue::SegQueue;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Idle objects waiting to be reused.
///
/// `slots` counts reserved places, so it is bumped before the push and
/// lowered after the pop. The queue therefore never holds more items than
/// `slots`, and `slots` only grows past a limit through `try_add`'s CAS.
pub(crate) struct IdleStore<T> {
    items: SegQueue<T>,
    slots: AtomicUsize,
}

impl<T> IdleStore<T> {
    pub fn new() -> Self {
        Self {
            items: SegQueue::new(),
            slots: AtomicUsize::new(0),
        }
    }

    pub fn try_take(&self) -> Option<T> {
        let item = self.items.pop()?;
        self.slots.fetch_sub(1, Ordering::AcqRel);
        Some(item)
    }

    /// Store `item` if fewer than `maximum` items are held, otherwise hand it back.
    pub fn try_add(&self, item: T, maximum: usize) -> Result<(), T> {
        let reserved = self
            .slots
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |slots| {
                (slots < maximum).then_some(slots + 1)
            });

        match reserved {
            Ok(_) => {
                self.items.push(item);
                Ok(())
            }
            Err(_) => Err(item),
        }
    }

    /// Advisory; exact only when no one else is touching the store.
    pub fn len(&self) -> usize {
        self.slots.load(Ordering::Acquire)
    }

    /// Drop every idle item, returning how many were dropped.
    pub fn drain(&self) -> usize {
        let mut dropped = 0;
        while self.try_take().is_some() {
            dropped += 1;
        }
        dropped
    }
}

impl<T> Default for IdleStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
