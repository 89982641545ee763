use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

/// Proof that a request was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter that lets only the most recent request of a kind
/// write its response. Starting a new request makes every older ticket
/// stale.
#[derive(Debug)]
pub struct RequestGuard {
    name: &'static str,
    generation: AtomicU64,
}

impl RequestGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: AtomicU64::new(0),
        }
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` in `slot` if `ticket` is still current. Returns whether
    /// the value was stored.
    pub fn apply<T>(&self, ticket: Ticket, slot: &Slot<T>, value: T) -> bool {
        let mut guard = slot.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            debug!(request = self.name, ticket = ticket.0, "Dropping stale response");
            return false;
        }
        *guard = value;
        true
    }
}

/// Shared value written through a [`RequestGuard`].
#[derive(Debug, Default)]
pub struct Slot<T> {
    inner: RwLock<T>,
}

impl<T: Clone> Slot<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    pub fn get(&self) -> T {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}
