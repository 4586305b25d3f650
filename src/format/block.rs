//! Structured block rendering: nested `key: value` lines with two-space
//! indentation, terminated by a `---` document marker. The flow layout
//! renders collections inline instead.
//!
//! The wire carries a number for `info.event_type`; output replaces it with
//! the constant's name when the injected table knows the number.

use crate::event::EventTypeNames;
use crate::value::Value;

use super::{array_placeholder, clamp_len, render_scalar, FormatOptions};

/// Renders one payload as a structured block ending in `---`.
pub(super) fn render(payload: &Value, options: &FormatOptions, names: &EventTypeNames) -> String {
    let body = if options.flow_style {
        render_flow(payload, options, names, Scope::Root)
    } else {
        let mut out = String::new();
        render_block(payload, options, names, Scope::Root, 0, &mut out);
        // Drop the trailing newline; the record is one unit.
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        out
    };
    format!("{body}\n---")
}

/// Where a value sits relative to the service-event envelope. Only
/// `info.event_type` at the top level is eligible for name substitution.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Info,
    Nested,
}

impl Scope {
    fn child(self, key: &str) -> Self {
        if self == Self::Root && key == "info" {
            Self::Info
        } else {
            Self::Nested
        }
    }
}

/// The substituted name for an in-scope `event_type` field. Emitted
/// verbatim; it is a label of this tool's making, not a wire string, so
/// `no_str` and truncation do not apply to it.
fn substituted_name(
    scope: Scope,
    key: &str,
    field: &Value,
    names: &EventTypeNames,
) -> Option<&'static str> {
    if scope != Scope::Info || key != "event_type" {
        return None;
    }
    names.name_of(field.as_int()?)
}

fn indent_to(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn render_block(
    value: &Value,
    options: &FormatOptions,
    names: &EventTypeNames,
    scope: Scope,
    indent: usize,
    out: &mut String,
) {
    match value {
        Value::Map(fields) => {
            for (key, field) in fields {
                indent_to(out, indent);
                if let Some(name) = substituted_name(scope, key, field, names) {
                    out.push_str(key);
                    out.push_str(": ");
                    out.push_str(name);
                    out.push('\n');
                    continue;
                }
                match field {
                    Value::Map(nested) if !nested.is_empty() => {
                        out.push_str(key);
                        out.push_str(":\n");
                        render_block(field, options, names, scope.child(key), indent + 1, out);
                    }
                    Value::Array(items) if !options.no_arr && !items.is_empty() => {
                        out.push_str(key);
                        out.push_str(":\n");
                        render_items(items, options, names, indent + 1, out);
                    }
                    Value::Bytes(bytes) if !options.no_arr && !bytes.is_empty() => {
                        out.push_str(key);
                        out.push_str(":\n");
                        let items: Vec<Value> =
                            bytes.iter().map(|b| Value::Int(i64::from(*b))).collect();
                        render_items(&items, options, names, indent + 1, out);
                    }
                    other => {
                        out.push_str(key);
                        out.push_str(": ");
                        out.push_str(&render_leaf(other, options, names));
                        out.push('\n');
                    }
                }
            }
        }
        other => {
            indent_to(out, indent);
            out.push_str(&render_leaf(other, options, names));
            out.push('\n');
        }
    }
}

/// One `- element` line per array entry, plus a marker line on truncation.
fn render_items(
    items: &[Value],
    options: &FormatOptions,
    names: &EventTypeNames,
    indent: usize,
    out: &mut String,
) {
    let (take, truncated) = clamp_len(items.len(), options.truncate_length);
    for item in &items[..take] {
        indent_to(out, indent);
        out.push_str("- ");
        out.push_str(&render_flow(item, options, names, Scope::Nested));
        out.push('\n');
    }
    if truncated {
        indent_to(out, indent);
        out.push_str("- ...\n");
    }
}

/// Inline form of a value that sits after `key: ` on a single line.
fn render_leaf(value: &Value, options: &FormatOptions, names: &EventTypeNames) -> String {
    match value {
        Value::Map(fields) if fields.is_empty() => "{}".to_string(),
        Value::Array(_) | Value::Bytes(_) | Value::Map(_) => {
            render_flow(value, options, names, Scope::Nested)
        }
        other => render_scalar(other, options),
    }
}

/// Fully inline rendering, used by the flow layout and for array elements.
fn render_flow(value: &Value, options: &FormatOptions, names: &EventTypeNames, scope: Scope) -> String {
    match value {
        Value::Map(fields) => {
            let inner: Vec<String> = fields
                .iter()
                .map(|(k, v)| {
                    if let Some(name) = substituted_name(scope, k, v, names) {
                        format!("{k}: {name}")
                    } else {
                        format!("{k}: {}", render_flow(v, options, names, scope.child(k)))
                    }
                })
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Array(items) => {
            if options.no_arr {
                return array_placeholder(items.len());
            }
            let (take, truncated) = clamp_len(items.len(), options.truncate_length);
            let mut inner: Vec<String> = items[..take]
                .iter()
                .map(|item| render_flow(item, options, names, Scope::Nested))
                .collect();
            if truncated {
                inner.push("...".to_string());
            }
            format!("[{}]", inner.join(", "))
        }
        Value::Bytes(bytes) => {
            if options.no_arr {
                return array_placeholder(bytes.len());
            }
            let (take, truncated) = clamp_len(bytes.len(), options.truncate_length);
            let mut inner: Vec<String> = bytes[..take].iter().map(u8::to_string).collect();
            if truncated {
                inner.push("...".to_string());
            }
            format!("[{}]", inner.join(", "))
        }
        other => render_scalar(other, options),
    }
}
