//! CSV rendering: a depth-first flatten of every leaf field, one row per
//! message. Suppression and truncation apply per leaf; the layout flag is
//! ignored in this mode.

use crate::value::Value;

use super::{array_placeholder, clamp_len, render_scalar, FormatOptions};

/// Renders one payload as a comma-separated row.
pub(super) fn render(payload: &Value, options: &FormatOptions) -> String {
    let mut cells = Vec::new();
    flatten(payload, options, &mut cells);
    cells.join(",")
}

fn flatten(value: &Value, options: &FormatOptions, cells: &mut Vec<String>) {
    match value {
        Value::Map(fields) => {
            for (_, field) in fields {
                flatten(field, options, cells);
            }
        }
        Value::Array(items) => {
            if options.no_arr {
                cells.push(array_placeholder(items.len()));
                return;
            }
            let (take, truncated) = clamp_len(items.len(), options.truncate_length);
            for item in &items[..take] {
                flatten(item, options, cells);
            }
            if truncated {
                cells.push("...".to_string());
            }
        }
        Value::Bytes(bytes) => {
            if options.no_arr {
                cells.push(array_placeholder(bytes.len()));
                return;
            }
            let (take, truncated) = clamp_len(bytes.len(), options.truncate_length);
            for byte in &bytes[..take] {
                cells.push(byte.to_string());
            }
            if truncated {
                cells.push("...".to_string());
            }
        }
        other => cells.push(render_scalar(other, options)),
    }
}
