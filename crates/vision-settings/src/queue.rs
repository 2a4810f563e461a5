//! Lock-protected FIFO buffer of pending setting changes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::event::PendingChange;

/// Ordered buffer of changes awaiting application.
///
/// One mutex guards the whole list: intake holds it for the push, the
/// processor holds it for the swap in `drain_all`. Neither side ever holds
/// it across change side effects, so intake blocks only briefly.
#[derive(Default)]
pub struct ChangeQueue {
    pending: Mutex<Vec<PendingChange>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append under the lock; insertion order is processing order.
    pub fn enqueue(&self, change: PendingChange) {
        self.lock().push(change);
    }

    /// Atomically remove and return every queued change, leaving the queue
    /// empty. Each change is observed by exactly one drain, in insertion
    /// order.
    pub fn drain_all(&self) -> Vec<PendingChange> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingChange>> {
        // a poisoned lock still holds a coherent list
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
