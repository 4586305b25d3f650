//! Per-interface stream sources.
//!
//! A stream source binds exactly one of the five action channels to the
//! record queue: every inbound event is rendered on the middleware's own
//! delivery context and pushed with a bounded wait. A full queue costs the
//! producer that one record and a warning line, never its subscription.

use std::sync::Arc;
use std::time::Duration;

use crate::error::EchoResult;
use crate::format::MessageFormatter;
use crate::interface::ActionInterface;
use crate::queue::{PushError, RecordQueue};
use crate::schema::ChannelSpec;
use crate::transport::{ActionTransport, EventCallback, Subscription};

/// One active subscription feeding the record queue.
pub struct StreamSource {
    interface: ActionInterface,
    subscription: Box<dyn Subscription>,
}

impl StreamSource {
    /// Subscribes to `channel` and starts forwarding formatted records.
    ///
    /// # Errors
    ///
    /// Propagates the transport's subscribe failure; no state is left
    /// behind on error.
    pub fn attach(
        transport: &dyn ActionTransport,
        channel: &ChannelSpec,
        formatter: Arc<dyn MessageFormatter>,
        queue: RecordQueue,
        push_timeout: Duration,
    ) -> EchoResult<Self> {
        let interface = channel.interface;
        let callback: EventCallback = Arc::new(move |event| {
            let record = format!(
                "interface: {}\n{}",
                interface.label(),
                formatter.render(&event)
            );
            match queue.push(record, push_timeout) {
                Ok(()) => {}
                Err(PushError::Full(_)) => {
                    // The record is dropped; the subscription keeps serving.
                    eprintln!(
                        "Output message queue is full! Please increase the \
                         queue size with \"--queue-size\""
                    );
                }
                // Consumer already gone; shutdown is in progress.
                Err(PushError::Disconnected(_)) => {}
            }
        });

        let subscription = transport.subscribe(channel, callback)?;
        Ok(Self {
            interface,
            subscription,
        })
    }

    /// The interface this source serves.
    #[must_use]
    pub const fn interface(&self) -> ActionInterface {
        self.interface
    }

    /// Releases the subscription; idempotent, safe before any event arrived.
    pub fn detach(&self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use crate::event::RawEvent;
    use crate::format::{FormatOptions, TextFormatter};
    use crate::schema::ResolveAction;
    use crate::transport::LocalActionBus;
    use crate::value::Value;

    use super::*;

    fn setup() -> (LocalActionBus, ChannelSpec) {
        let bus = LocalActionBus::new();
        bus.register_action("/fibonacci", "example_interfaces/action/Fibonacci");
        let schema = bus.resolve("/fibonacci", None).unwrap();
        (bus, schema.channel(ActionInterface::FeedbackTopic))
    }

    fn formatter() -> Arc<dyn MessageFormatter> {
        Arc::new(TextFormatter::new(FormatOptions::default()))
    }

    fn feedback(order: i64) -> RawEvent {
        RawEvent::new(Value::Map(vec![(
            "partial_sequence".to_string(),
            Value::Array(vec![Value::Int(order)]),
        )]))
    }

    #[test]
    fn test_events_become_labeled_records() {
        let (bus, channel) = setup();
        let queue = RecordQueue::new(10);
        let source = StreamSource::attach(
            &bus,
            &channel,
            formatter(),
            queue.clone(),
            Duration::from_millis(100),
        )
        .unwrap();
        assert_eq!(source.interface(), ActionInterface::FeedbackTopic);

        bus.publish(&channel.name, &feedback(1));
        let record = queue.pop(Duration::from_millis(100)).unwrap();
        assert!(record.starts_with("interface: FEEDBACK_TOPIC\n"));
        assert!(record.contains("partial_sequence"));
        assert!(record.ends_with("---"));
    }

    #[test]
    fn test_full_queue_drops_record_keeps_subscription() {
        let (bus, channel) = setup();
        let queue = RecordQueue::new(1);
        let _source = StreamSource::attach(
            &bus,
            &channel,
            formatter(),
            queue.clone(),
            Duration::ZERO,
        )
        .unwrap();

        bus.publish(&channel.name, &feedback(1));
        bus.publish(&channel.name, &feedback(2)); // dropped, queue full

        let first = queue.pop(Duration::from_millis(100)).unwrap();
        assert!(first.contains("- 1"));
        assert!(queue.is_empty());

        // The source still serves after the drop.
        bus.publish(&channel.name, &feedback(3));
        let third = queue.pop(Duration::from_millis(100)).unwrap();
        assert!(third.contains("- 3"));
    }

    #[test]
    fn test_detach_stops_delivery() {
        let (bus, channel) = setup();
        let queue = RecordQueue::new(10);
        let source = StreamSource::attach(
            &bus,
            &channel,
            formatter(),
            queue.clone(),
            Duration::from_millis(100),
        )
        .unwrap();

        source.detach();
        source.detach(); // idempotent
        assert_eq!(bus.publish(&channel.name, &feedback(1)), 0);
        assert!(queue.is_empty());
    }
}
