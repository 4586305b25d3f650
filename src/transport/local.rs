//! In-process bus implementation of the transport seam.
//!
//! Events published on a channel invoke subscriber callbacks synchronously
//! on the publishing thread, so concurrent publishers exercise the same
//! interleavings a real middleware's delivery contexts would. Used by the
//! integration tests and the demo binary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{EchoResult, ResolveError, TransportError};
use crate::event::RawEvent;
use crate::schema::{ActionSchema, ChannelSpec, ResolveAction};

use super::{ActionTransport, EventCallback, Subscription};

#[derive(Default)]
struct BusState {
    /// Registered action name to type identifier.
    actions: HashMap<String, String>,
    /// Channel name to live subscriber callbacks.
    subscribers: HashMap<String, Vec<(u64, EventCallback)>>,
    next_subscription_id: u64,
}

/// An in-process pub/sub bus serving action channels.
#[derive(Clone, Default)]
pub struct LocalActionBus {
    state: Arc<Mutex<BusState>>,
    alive: Arc<AtomicBool>,
}

impl LocalActionBus {
    /// Creates an empty, alive bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState::default())),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Registers an action so name resolution can discover it.
    pub fn register_action(&self, action_name: impl Into<String>, type_name: impl Into<String>) {
        let mut state = self.state.lock().expect("bus state poisoned");
        state.actions.insert(action_name.into(), type_name.into());
    }

    /// Publishes an event on a channel, invoking every subscriber callback
    /// on the calling thread. Returns the number of subscribers reached.
    pub fn publish(&self, channel_name: &str, event: &RawEvent) -> usize {
        if !self.is_alive() {
            return 0;
        }
        // Callbacks run outside the lock; they may block on the queue.
        let callbacks: Vec<EventCallback> = {
            let state = self.state.lock().expect("bus state poisoned");
            state
                .subscribers
                .get(channel_name)
                .map(|subs| subs.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };
        for callback in &callbacks {
            callback(event.clone());
        }
        callbacks.len()
    }

    /// Number of live subscriptions on a channel.
    #[must_use]
    pub fn subscriber_count(&self, channel_name: &str) -> usize {
        let state = self.state.lock().expect("bus state poisoned");
        state
            .subscribers
            .get(channel_name)
            .map_or(0, Vec::len)
    }

    /// Total live subscriptions across all channels.
    #[must_use]
    pub fn total_subscriptions(&self) -> usize {
        let state = self.state.lock().expect("bus state poisoned");
        state.subscribers.values().map(Vec::len).sum()
    }

    /// Marks the bus context as down; publishes become no-ops and the
    /// dispatcher drains on its next liveness check.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
    }

    fn remove_subscription(&self, channel_name: &str, id: u64) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(subs) = state.subscribers.get_mut(channel_name) {
                subs.retain(|(sub_id, _)| *sub_id != id);
                if subs.is_empty() {
                    state.subscribers.remove(channel_name);
                }
            }
        }
    }
}

impl ActionTransport for LocalActionBus {
    fn subscribe(
        &self,
        channel: &ChannelSpec,
        callback: EventCallback,
    ) -> EchoResult<Box<dyn Subscription>> {
        if !self.is_alive() {
            return Err(TransportError::ContextDown.into());
        }
        let id = {
            let mut state = self.state.lock().map_err(|_| TransportError::SubscribeFailed {
                channel: channel.name.clone(),
                reason: "bus state poisoned".to_string(),
            })?;
            let id = state.next_subscription_id;
            state.next_subscription_id += 1;
            state
                .subscribers
                .entry(channel.name.clone())
                .or_default()
                .push((id, callback));
            id
        };
        Ok(Box::new(LocalSubscription {
            bus: self.clone(),
            channel_name: channel.name.clone(),
            id,
            released: AtomicBool::new(false),
        }))
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl ResolveAction for LocalActionBus {
    fn resolve(
        &self,
        action_name: &str,
        explicit_type: Option<&str>,
    ) -> Result<ActionSchema, ResolveError> {
        let state = self.state.lock().map_err(|_| ResolveError::UnknownAction {
            name: action_name.to_string(),
        })?;

        if let Some(type_name) = explicit_type {
            // Explicit type: the name is taken as-is, only the type must be
            // known to the bus.
            if state.actions.values().any(|t| t == type_name) {
                return Ok(ActionSchema::new(action_name, type_name));
            }
            return Err(ResolveError::UnknownType {
                name: type_name.to_string(),
            });
        }

        state
            .actions
            .get(action_name)
            .map(|type_name| ActionSchema::new(action_name, type_name.clone()))
            .ok_or_else(|| ResolveError::UnknownAction {
                name: action_name.to_string(),
            })
    }
}

/// Subscription handle for [`LocalActionBus`].
struct LocalSubscription {
    bus: LocalActionBus,
    channel_name: String,
    id: u64,
    released: AtomicBool,
}

impl Subscription for LocalSubscription {
    fn unsubscribe(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.bus.remove_subscription(&self.channel_name, self.id);
    }
}

impl Drop for LocalSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use crate::interface::ActionInterface;
    use crate::value::Value;

    use super::*;

    fn fibonacci_bus() -> (LocalActionBus, ActionSchema) {
        let bus = LocalActionBus::new();
        bus.register_action("/fibonacci", "example_interfaces/action/Fibonacci");
        let schema = bus.resolve("/fibonacci", None).unwrap();
        (bus, schema)
    }

    #[test]
    fn test_resolve_registered_action() {
        let (_, schema) = fibonacci_bus();
        assert_eq!(schema.action_name, "/fibonacci");
        assert_eq!(schema.type_name, "example_interfaces/action/Fibonacci");
    }

    #[test]
    fn test_resolve_unknown_action() {
        let bus = LocalActionBus::new();
        let err = bus.resolve("/missing", None).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownAction { .. }));
    }

    #[test]
    fn test_resolve_explicit_type() {
        let (bus, _) = fibonacci_bus();
        // Any name resolves when the explicit type is known.
        let schema = bus
            .resolve("/renamed", Some("example_interfaces/action/Fibonacci"))
            .unwrap();
        assert_eq!(schema.action_name, "/renamed");

        let err = bus.resolve("/renamed", Some("no_such/action/Type")).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownType { .. }));
    }

    #[test]
    fn test_publish_reaches_subscribers() {
        let (bus, schema) = fibonacci_bus();
        let channel = schema.channel(ActionInterface::FeedbackTopic);

        let seen = Arc::new(AtomicUsize::new(0));
        let callback: EventCallback = {
            let seen = Arc::clone(&seen);
            Arc::new(move |_event| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };
        let subscription = bus.subscribe(&channel, callback).unwrap();

        let event = RawEvent::new(Value::Int(1));
        assert_eq!(bus.publish(&channel.name, &event), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        // No delivery on other channels.
        let status = schema.channel(ActionInterface::StatusTopic);
        assert_eq!(bus.publish(&status.name, &event), 0);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        subscription.unsubscribe();
        assert_eq!(bus.publish(&channel.name, &event), 0);
    }

    #[test]
    fn test_unsubscribe_idempotent_and_on_drop() {
        let (bus, schema) = fibonacci_bus();
        let channel = schema.channel(ActionInterface::StatusTopic);

        let subscription = bus.subscribe(&channel, Arc::new(|_| {})).unwrap();
        assert_eq!(bus.subscriber_count(&channel.name), 1);
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert_eq!(bus.subscriber_count(&channel.name), 0);

        {
            let _scoped = bus.subscribe(&channel, Arc::new(|_| {})).unwrap();
            assert_eq!(bus.subscriber_count(&channel.name), 1);
        }
        assert_eq!(bus.subscriber_count(&channel.name), 0);
    }

    #[test]
    fn test_shutdown_stops_delivery_and_subscribing() {
        let (bus, schema) = fibonacci_bus();
        let channel = schema.channel(ActionInterface::GoalService);
        let _subscription = bus.subscribe(&channel, Arc::new(|_| {})).unwrap();

        bus.shutdown();
        assert!(!bus.is_alive());
        assert_eq!(bus.publish(&channel.name, &RawEvent::new(Value::Null)), 0);
        assert!(bus.subscribe(&channel, Arc::new(|_| {})).is_err());
    }
}
