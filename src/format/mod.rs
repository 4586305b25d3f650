//! Message formatting.
//!
//! Formatting is a pure function from a decoded payload and a fixed set of
//! options to text. The queue/dispatcher core only requires that some
//! deterministic renderer exists behind [`MessageFormatter`]; the bundled
//! [`TextFormatter`] provides the CSV and structured-block modes.

mod block;
mod csv;

use crate::event::{EventTypeNames, RawEvent};
use crate::value::Value;

/// Rendering options, immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Output one comma-separated row of flattened fields per message.
    pub csv: bool,
    /// Truncate arrays, bytes and strings beyond this many elements.
    /// `None` disables truncation entirely.
    pub truncate_length: Option<usize>,
    /// Suppress array and byte fields.
    pub no_arr: bool,
    /// Suppress string fields.
    pub no_str: bool,
    /// Render collections inline instead of one entry per line.
    /// Ignored in CSV mode.
    pub flow_style: bool,
}

/// Default truncation applied to arrays, bytes and strings.
pub const DEFAULT_TRUNCATE_LENGTH: usize = 128;

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            csv: false,
            truncate_length: Some(DEFAULT_TRUNCATE_LENGTH),
            no_arr: false,
            no_str: false,
            flow_style: false,
        }
    }
}

/// A deterministic message-to-text function.
///
/// Implementations must be pure: identical payload and options always
/// produce identical text. Called concurrently from every stream callback.
pub trait MessageFormatter: Send + Sync {
    /// Renders one event to its textual body (label line excluded).
    fn render(&self, event: &RawEvent) -> String;
}

/// The bundled formatter: CSV rows or structured key/value blocks.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    options: FormatOptions,
    event_names: EventTypeNames,
}

impl TextFormatter {
    /// Creates a formatter with the standard event-type table.
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            event_names: EventTypeNames::default(),
        }
    }

    /// Creates a formatter with a caller-supplied event-type table.
    #[must_use]
    pub const fn with_event_names(options: FormatOptions, event_names: EventTypeNames) -> Self {
        Self {
            options,
            event_names,
        }
    }

    /// The options this formatter renders with.
    #[must_use]
    pub const fn options(&self) -> &FormatOptions {
        &self.options
    }
}

impl MessageFormatter for TextFormatter {
    fn render(&self, event: &RawEvent) -> String {
        if self.options.csv {
            csv::render(&event.payload, &self.options)
        } else {
            block::render(&event.payload, &self.options, &self.event_names)
        }
    }
}

/// Renders a string field, applying suppression then truncation.
fn render_string(s: &str, options: &FormatOptions) -> String {
    if options.no_str {
        return format!("<string of {}>", s.chars().count());
    }
    match options.truncate_length {
        Some(limit) if s.chars().count() > limit => {
            let truncated: String = s.chars().take(limit).collect();
            format!("{truncated}...")
        }
        _ => s.to_string(),
    }
}

/// Placeholder for a suppressed array or byte field.
fn array_placeholder(len: usize) -> String {
    format!("<array of {len}>")
}

/// Renders a non-collection value to its scalar form.
fn render_scalar(value: &Value, options: &FormatOptions) -> String {
    match value {
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::String(s) => render_string(s, options),
        Value::Null => "null".to_string(),
        // Collections are handled by the mode-specific renderers.
        Value::Bytes(_) | Value::Array(_) | Value::Map(_) => value.to_string(),
    }
}

/// Caps an element count at the truncation limit. Returns the number of
/// elements to render and whether a truncation marker is needed.
const fn clamp_len(len: usize, truncate: Option<usize>) -> (usize, bool) {
    match truncate {
        Some(limit) if len > limit => (limit, true),
        _ => (len, false),
    }
}
