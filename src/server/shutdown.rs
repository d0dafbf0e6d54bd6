//! Two-phase shutdown signal
//!
//! Stopping first clears the running flag, which streaming loops poll at
//! every chunk boundary. After a grace window the cancellation token fires
//! and every task still alive is torn down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct Shutdown {
    running: Arc<AtomicBool>,
    token: CancellationToken,
}

impl Shutdown {
    /// A signal in the running state.
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            token: CancellationToken::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clears the running flag. In-flight work stops at its next check.
    pub fn begin(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Clears the flag and cancels everything still waiting on [`cancelled`](Self::cancelled).
    pub fn force(&self) {
        self.begin();
        self.token.cancel();
    }

    /// Completes once [`force`](Self::force) has been called.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
