//! Run lifecycle orchestration.
//!
//! The dispatcher owns the record queue, the stream sources and the printer
//! thread, and walks the run through `Idle -> Running -> Draining ->
//! Stopped`. Cancellation is the normal way a run ends; configuration and
//! resolution failures abort before any subscription or thread exists, so
//! there is never partial state to unwind.

use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::config::EchoConfig;
use crate::error::EchoResult;
use crate::format::MessageFormatter;
use crate::printer;
use crate::queue::RecordQueue;
use crate::schema::ResolveAction;
use crate::source::StreamSource;
use crate::transport::ActionTransport;

/// Observable lifecycle state of a dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DispatcherState {
    /// No run started yet.
    Idle = 0,
    /// Sources registered, printer running, event loop spinning.
    Running = 1,
    /// Sources released; printer finishing inside the join window.
    Draining = 2,
    /// Run complete.
    Stopped = 3,
}

impl DispatcherState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Draining,
            3 => Self::Stopped,
            _ => Self::Idle,
        }
    }
}

/// Orchestrates one echo run over a transport.
pub struct EchoDispatcher {
    config: EchoConfig,
    transport: Arc<dyn ActionTransport>,
    formatter: Arc<dyn MessageFormatter>,
    state: AtomicU8,
}

impl EchoDispatcher {
    /// Creates a dispatcher for `config` over the given collaborators.
    #[must_use]
    pub fn new(
        config: EchoConfig,
        transport: Arc<dyn ActionTransport>,
        formatter: Arc<dyn MessageFormatter>,
    ) -> Self {
        Self {
            config,
            transport,
            formatter,
            state: AtomicU8::new(DispatcherState::Idle as u8),
        }
    }

    /// The current lifecycle state; readable from any thread.
    #[must_use]
    pub fn state(&self) -> DispatcherState {
        DispatcherState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: DispatcherState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Runs until the token is cancelled or the middleware context dies.
    ///
    /// Records may remain unprinted when the join window elapses first;
    /// shutdown never waits for a full flush.
    ///
    /// # Errors
    ///
    /// Configuration, resolution and subscription errors; all of them occur
    /// before the run reaches `Running`.
    pub fn run(
        &self,
        resolver: &dyn ResolveAction,
        sink: Box<dyn Write + Send>,
        cancel: &CancelToken,
    ) -> EchoResult<()> {
        self.config.validate()?;

        // Fatal before any subscription or thread exists.
        let schema = resolver.resolve(
            &self.config.action_name,
            self.config.action_type.as_deref(),
        )?;

        let queue = RecordQueue::new(self.config.queue_size);
        let printer = printer::spawn(queue.clone(), sink, self.config.pop_timeout)?;

        let mut sources = Vec::new();
        for interface in self.config.selected_interfaces() {
            let channel = schema.channel(interface);
            let source = StreamSource::attach(
                self.transport.as_ref(),
                &channel,
                Arc::clone(&self.formatter),
                queue.clone(),
                self.config.push_timeout,
            );
            match source {
                Ok(source) => sources.push(source),
                Err(err) => {
                    for source in &sources {
                        source.detach();
                    }
                    printer.join_within(self.config.join_window);
                    return Err(err);
                }
            }
        }

        self.set_state(DispatcherState::Running);
        loop {
            if cancel.wait(self.config.spin_interval) {
                break;
            }
            if !self.transport.is_alive() {
                break;
            }
        }

        // Release every subscription first so no push can follow.
        self.set_state(DispatcherState::Draining);
        for source in &sources {
            source.detach();
        }
        drop(sources);

        printer.join_within(self.config.join_window);
        self.set_state(DispatcherState::Stopped);
        Ok(())
    }
}
