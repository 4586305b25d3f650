//! # action-echo
//!
//! action-echo observes a single named "action" in a pub/sub middleware: up
//! to five message streams (goal, cancel and result service events plus the
//! feedback and status topics), rendered to text and written to a sink in
//! dequeue order. A fixed-capacity queue decouples the stream callbacks
//! from the printer so a slow sink never blocks message receipt; overload
//! drops the overflowing record with an explicit warning instead of growing
//! without bound.
//!
//! ## Core Concepts
//!
//! - **ActionInterface**: one of the five fixed sub-channels of an action
//! - **RecordQueue**: the bounded FIFO hand-off between producers and the printer
//! - **StreamSource**: one subscription, rendering events into the queue
//! - **EchoDispatcher**: the run lifecycle, `Idle -> Running -> Draining -> Stopped`
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use action_echo::{
//!     CancelToken, EchoConfig, EchoDispatcher, FormatOptions, LocalActionBus,
//!     TextFormatter,
//! };
//!
//! let bus = LocalActionBus::new();
//! bus.register_action("/fibonacci", "example_interfaces/action/Fibonacci");
//!
//! let mut config = EchoConfig::new("/fibonacci");
//! config.join_window = Duration::from_millis(100);
//!
//! let dispatcher = EchoDispatcher::new(
//!     config,
//!     Arc::new(bus.clone()),
//!     Arc::new(TextFormatter::new(FormatOptions::default())),
//! );
//!
//! let cancel = CancelToken::new();
//! cancel.cancel(); // a real run cancels on operator interrupt
//! dispatcher.run(&bus, Box::new(std::io::sink()), &cancel).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cancel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod format;
pub mod interface;
pub mod printer;
pub mod queue;
pub mod schema;
pub mod source;
pub mod transport;
pub mod value;

// Re-export primary types at crate root for convenience
pub use cancel::CancelToken;
pub use config::{EchoConfig, DEFAULT_QUEUE_SIZE};
pub use dispatcher::{DispatcherState, EchoDispatcher};
pub use error::{ConfigError, EchoError, EchoResult, ResolveError, TransportError};
pub use event::{event_type, EventTypeNames, RawEvent};
pub use format::{FormatOptions, MessageFormatter, TextFormatter, DEFAULT_TRUNCATE_LENGTH};
pub use interface::ActionInterface;
pub use printer::PrinterHandle;
pub use queue::{PopError, PushError, RecordQueue};
pub use schema::{ActionSchema, ChannelSpec, ResolveAction};
pub use source::StreamSource;
pub use transport::{ActionTransport, EventCallback, LocalActionBus, Subscription};
pub use value::Value;
