//! Connection admission gate
//!
//! A counting semaphore bounding how many connections are served at once.
//! The accept loop takes a slot *before* accepting, so once the gate is
//! saturated new clients wait in the OS accept queue instead of inside the
//! process. A slot only counts as an active connection once a client has
//! actually been accepted into it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct ConnectionGate {
    semaphore: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    capacity: usize,
}

impl ConnectionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            active: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// Waits for a free slot.
    ///
    /// Fails only after [`close`](Self::close).
    pub async fn acquire(&self) -> Result<GateSlot, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(GateSlot { permit })
    }

    /// Hands a reserved slot to an accepted client and counts it as active.
    pub fn admit(&self, slot: GateSlot) -> ConnectionPermit {
        self.active.fetch_add(1, Ordering::AcqRel);
        ConnectionPermit {
            _permit: slot.permit,
            active: Arc::clone(&self.active),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accepted connections currently holding a slot.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Slots neither held by a connection nor reserved by the accept loop.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wakes every waiter with an error; no further slots are handed out.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

/// A slot reserved by the accept loop while it waits for a client.
///
/// Dropping it returns the slot without touching the active count.
#[derive(Debug)]
pub struct GateSlot {
    permit: OwnedSemaphorePermit,
}

/// One slot of the gate, owned by a single accepted connection.
///
/// Dropping it releases the slot, so the release happens exactly once on
/// every exit path, including panics and task cancellation.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: OwnedSemaphorePermit,
    active: Arc<AtomicUsize>,
}

impl ConnectionPermit {
    /// Connections holding a permit, this one included.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        let left = self.active.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::debug!(active = left, "Connection slot released");
    }
}
