//! Cooperative cancellation.
//!
//! A [`CancelToken`] carries a flag plus a channel whose sender side is
//! dropped on cancellation, so blocked waiters wake immediately instead of
//! sleeping out their timeout. Closing channels to stop waiters is the same
//! shutdown idiom the rest of the crate uses for its worker threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

/// A cloneable cancellation token shared between the dispatcher, its
/// operator, and any waiting loops.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    // Never sent on; dropped to disconnect every waiting receiver.
    closer: Arc<Mutex<Option<Sender<()>>>>,
    rx: Receiver<()>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            closer: Arc::new(Mutex::new(Some(tx))),
            rx,
        }
    }

    /// Signals cancellation. Idempotent; wakes every waiter.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Ok(mut guard) = self.closer.lock() {
            guard.take();
        }
    }

    /// True once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Waits for cancellation for up to `timeout`. Returns true when the
    /// token is cancelled, false when the timeout elapsed first.
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match self.rx.recv_timeout(timeout) {
            // Nothing is ever sent; disconnection is the wake-up.
            Err(RecvTimeoutError::Disconnected) | Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => self.is_cancelled(),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
