//! Bounded hand-off queue between stream callbacks and the printer.
//!
//! A single bounded channel bridges N concurrent producers to one consumer.
//! The bound protects memory under event bursts and makes backpressure an
//! explicit, observable signal instead of letting unbounded growth hide a
//! slow sink. Completed pushes are serialized, so pop order equals the
//! order in which pushes completed.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};

/// Error from [`RecordQueue::push`].
#[derive(Debug, PartialEq, Eq)]
pub enum PushError {
    /// The queue stayed at capacity for the whole timeout. Carries the
    /// rejected record back so the caller decides its fate; nothing is
    /// dropped silently.
    Full(String),
    /// The consumer side is gone.
    Disconnected(String),
}

/// Error from [`RecordQueue::pop`].
#[derive(Debug, PartialEq, Eq)]
pub enum PopError {
    /// No record arrived within the timeout. Control flow only, used to
    /// re-check a stop flag; never an error condition.
    Empty,
    /// All producer sides are gone.
    Disconnected,
}

/// A fixed-capacity FIFO queue of formatted text records.
#[derive(Debug, Clone)]
pub struct RecordQueue {
    tx: Sender<String>,
    rx: Receiver<String>,
    capacity: usize,
}

impl RecordQueue {
    /// Creates a queue holding at most `capacity` records.
    ///
    /// Capacity is clamped to at least 1; configuration validation rejects
    /// zero before construction.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Blocks the calling producer for up to `timeout` waiting for free
    /// capacity.
    ///
    /// # Errors
    ///
    /// [`PushError::Full`] if the timeout elapses with the queue still at
    /// capacity; [`PushError::Disconnected`] if the consumer is gone.
    pub fn push(&self, record: String, timeout: Duration) -> Result<(), PushError> {
        self.tx.send_timeout(record, timeout).map_err(|err| match err {
            SendTimeoutError::Timeout(record) => PushError::Full(record),
            SendTimeoutError::Disconnected(record) => PushError::Disconnected(record),
        })
    }

    /// Blocks the consumer for up to `timeout` waiting for a record.
    ///
    /// # Errors
    ///
    /// [`PopError::Empty`] on timeout; [`PopError::Disconnected`] once every
    /// producer is gone and the queue is drained.
    pub fn pop(&self, timeout: Duration) -> Result<String, PopError> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => PopError::Empty,
            RecvTimeoutError::Disconnected => PopError::Disconnected,
        })
    }

    /// Number of records currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True when no records are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// The fixed capacity set at construction.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
