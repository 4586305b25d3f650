//! The single consumer thread.
//!
//! The printer drains the record queue and writes each record to the sink
//! as one atomic unit, in dequeue order. Its pop timeout only exists so the
//! stop flag gets re-checked periodically; a record that is already
//! available when the stop flag is raised is still written.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

use crate::error::{EchoError, EchoResult};
use crate::queue::{PopError, RecordQueue};

/// Handle to a running printer thread.
pub struct PrinterHandle {
    stop: Arc<AtomicBool>,
    done_rx: Receiver<()>,
    join: Option<JoinHandle<()>>,
}

/// Spawns the printer thread consuming `queue` into `sink`.
///
/// # Errors
///
/// [`EchoError::Internal`] when the thread cannot be spawned.
pub fn spawn(
    queue: RecordQueue,
    mut sink: Box<dyn Write + Send>,
    pop_timeout: Duration,
) -> EchoResult<PrinterHandle> {
    let stop = Arc::new(AtomicBool::new(false));
    let (done_tx, done_rx) = bounded::<()>(0);

    let thread_stop = Arc::clone(&stop);
    let join = thread::Builder::new()
        .name("action-echo-printer".to_string())
        .spawn(move || {
            run_loop(&queue, sink.as_mut(), &thread_stop, pop_timeout);
            // Disconnects the handle's receiver; nothing is ever sent.
            drop(done_tx);
        })
        .map_err(|err| EchoError::internal(format!("failed to spawn printer thread: {err}")))?;

    Ok(PrinterHandle {
        stop,
        done_rx,
        join: Some(join),
    })
}

fn run_loop(
    queue: &RecordQueue,
    sink: &mut dyn Write,
    stop: &AtomicBool,
    pop_timeout: Duration,
) {
    loop {
        match queue.pop(pop_timeout) {
            Ok(record) => {
                // One write per record; never a partial record.
                let line = format!("{record}\n");
                if sink.write_all(line.as_bytes()).is_err() {
                    return;
                }
                let _ = sink.flush();
            }
            Err(PopError::Empty) => {
                if stop.load(Ordering::Acquire) {
                    return;
                }
            }
            Err(PopError::Disconnected) => return,
        }
    }
}

impl PrinterHandle {
    /// Raises the stop flag; observed on the printer's next empty pop.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Stops the printer and waits up to `window` for it to exit.
    ///
    /// Returns true when the thread finished inside the window. On timeout
    /// the thread is detached and any still-queued records are abandoned;
    /// shutdown never waits for a full flush.
    pub fn join_within(mut self, window: Duration) -> bool {
        self.stop();
        match self.done_rx.recv_timeout(window) {
            Err(RecvTimeoutError::Disconnected) | Ok(()) => {
                if let Some(handle) = self.join.take() {
                    let _ = handle.join();
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                // Abandon: the detached thread exits on its next stop check.
                self.join.take();
                false
            }
        }
    }
}

impl Drop for PrinterHandle {
    fn drop(&mut self) {
        // A leaked handle must not wedge the thread forever.
        self.stop();
        self.join.take();
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;

    /// A cloneable in-memory sink.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_prints_in_dequeue_order() {
        let queue = RecordQueue::new(10);
        let sink = SharedSink::default();
        let handle = spawn(
            queue.clone(),
            Box::new(sink.clone()),
            Duration::from_millis(50),
        )
        .unwrap();

        for i in 0..3 {
            queue
                .push(format!("record-{i}"), Duration::from_millis(100))
                .unwrap();
        }
        thread::sleep(Duration::from_millis(150));
        assert!(handle.join_within(Duration::from_secs(1)));

        assert_eq!(sink.contents(), "record-0\nrecord-1\nrecord-2\n");
    }

    #[test]
    fn test_available_record_printed_at_stop() {
        let queue = RecordQueue::new(10);
        let sink = SharedSink::default();
        let handle = spawn(
            queue.clone(),
            Box::new(sink.clone()),
            Duration::from_millis(50),
        )
        .unwrap();

        queue
            .push("last-words".to_string(), Duration::from_millis(100))
            .unwrap();
        // Stop immediately; the queued record must still be drained.
        assert!(handle.join_within(Duration::from_secs(1)));
        assert_eq!(sink.contents(), "last-words\n");
    }

    #[test]
    fn test_join_within_bounded_on_blocked_sink() {
        struct BlockingSink;
        impl Write for BlockingSink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                thread::sleep(Duration::from_secs(30));
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let queue = RecordQueue::new(10);
        let handle = spawn(
            queue.clone(),
            Box::new(BlockingSink),
            Duration::from_millis(50),
        )
        .unwrap();
        queue.push("stuck".to_string(), Duration::ZERO).unwrap();

        let start = std::time::Instant::now();
        assert!(!handle.join_within(Duration::from_millis(200)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_idle_printer_stops_within_pop_timeout() {
        let queue = RecordQueue::new(4);
        let handle = spawn(
            queue,
            Box::new(SharedSink::default()),
            Duration::from_millis(50),
        )
        .unwrap();

        let start = std::time::Instant::now();
        assert!(handle.join_within(Duration::from_secs(1)));
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
