//! Middleware transport seam.
//!
//! The middleware's transport, discovery and delivery mechanics are external
//! collaborators; the dispatcher only needs to open a callback-driven
//! subscription per channel and to observe context liveness. Callbacks run
//! on the middleware's own delivery context and may fire concurrently, so
//! they must not block beyond the queue's bounded wait.

mod local;

use std::sync::Arc;

use crate::error::EchoResult;
use crate::event::RawEvent;
use crate::schema::ChannelSpec;

pub use local::LocalActionBus;

/// Callback invoked for every inbound event on a subscribed channel.
pub type EventCallback = Arc<dyn Fn(RawEvent) + Send + Sync>;

/// An active channel subscription.
///
/// Handles release the underlying subscription on [`unsubscribe`]
/// (idempotent, safe before any event has arrived) and on drop.
///
/// [`unsubscribe`]: Subscription::unsubscribe
pub trait Subscription: Send {
    /// Releases the subscription; later events are no longer delivered.
    fn unsubscribe(&self);
}

/// A pub/sub middleware able to serve action channel subscriptions.
pub trait ActionTransport: Send + Sync {
    /// Subscribes to one channel; `callback` runs on the middleware's
    /// delivery context for every inbound event.
    ///
    /// # Errors
    ///
    /// [`crate::error::TransportError`] when the channel cannot be opened.
    fn subscribe(
        &self,
        channel: &ChannelSpec,
        callback: EventCallback,
    ) -> EchoResult<Box<dyn Subscription>>;

    /// True while the middleware context is alive; the dispatcher drains
    /// and stops once this goes false.
    fn is_alive(&self) -> bool;
}
