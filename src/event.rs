//! Raw events and service-event envelope helpers.
//!
//! The queue/dispatcher core treats every inbound payload as an opaque
//! [`Value`]; this module adds the conventions around service-event
//! envelopes (the `info` block carried by the three service channels) and
//! the injected lookup table that humanizes `info.event_type`.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::value::Value;

/// An unformatted message payload delivered on one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Decoded message payload.
    pub payload: Value,
}

impl RawEvent {
    /// Wraps a decoded payload.
    #[must_use]
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl From<Value> for RawEvent {
    fn from(payload: Value) -> Self {
        Self { payload }
    }
}

/// Service-event type constants, as numbered on the wire.
pub mod event_type {
    /// A request was sent by a client.
    pub const REQUEST_SENT: i64 = 0;
    /// A request was received by the server.
    pub const REQUEST_RECEIVED: i64 = 1;
    /// A response was sent by the server.
    pub const RESPONSE_SENT: i64 = 2;
    /// A response was received by a client.
    pub const RESPONSE_RECEIVED: i64 = 3;
}

/// Injected number-to-name mapping for `info.event_type`.
///
/// The wire carries an integer; output shows the constant's name. Kept as a
/// value passed to the formatter rather than global state so alternative
/// middlewares can supply their own table.
#[derive(Debug, Clone)]
pub struct EventTypeNames {
    entries: Vec<(i64, &'static str)>,
}

impl EventTypeNames {
    /// An empty table; every number renders as-is.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Looks up the name for a wire number.
    #[must_use]
    pub fn name_of(&self, number: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, name)| *name)
    }
}

impl Default for EventTypeNames {
    /// The standard service-event table.
    fn default() -> Self {
        Self {
            entries: vec![
                (event_type::REQUEST_SENT, "REQUEST_SENT"),
                (event_type::REQUEST_RECEIVED, "REQUEST_RECEIVED"),
                (event_type::RESPONSE_SENT, "RESPONSE_SENT"),
                (event_type::RESPONSE_RECEIVED, "RESPONSE_RECEIVED"),
            ],
        }
    }
}

/// Builds the `info` block of a service-event envelope.
///
/// Used by the local bus and by tests to produce envelopes shaped like the
/// middleware's own: event type, timestamp, client identity and sequence
/// number, in that field order.
#[must_use]
pub fn service_event_info(
    event_type: i64,
    stamp: DateTime<Utc>,
    client_gid: Uuid,
    sequence_number: i64,
) -> Value {
    Value::Map(vec![
        ("event_type".to_string(), Value::Int(event_type)),
        (
            "stamp".to_string(),
            Value::String(stamp.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        ),
        (
            "client_gid".to_string(),
            Value::String(client_gid.to_string()),
        ),
        (
            "sequence_number".to_string(),
            Value::Int(sequence_number),
        ),
    ])
}

/// Wraps a request or response body in a full service-event envelope.
#[must_use]
pub fn service_event(info: Value, request: Vec<Value>, response: Vec<Value>) -> Value {
    Value::Map(vec![
        ("info".to_string(), info),
        ("request".to_string(), Value::Array(request)),
        ("response".to_string(), Value::Array(response)),
    ])
}
