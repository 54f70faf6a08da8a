//! Display rendering for boundary values.
//!
//! [`write_value`] prints strings as-is and everything else in inspect form,
//! which is what an interactive session shows after each line.

use crate::value::Value;

/// Inspect form of a value, e.g. `'text'`, `42n`, `Symbol(tag)`.
pub fn inspect(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Symbol(symbol) => format!("Symbol({})", symbol.description().unwrap_or_default()),
        Value::Object(_) => "{}".to_string(),
        Value::Function(_) => "[Function (anonymous)]".to_string(),
        Value::External(external) => format!("[External: {:x}]", external.tag()),
        Value::BigInt(n) => format!("{}n", n),
    }
}

/// Session output: strings raw, absent as `undefined`, the rest inspected.
pub fn write_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(value) => inspect(value),
        None => inspect(&Value::Undefined),
    }
}

/// Session output for an uncaught exception.
pub fn write_exception(message: &str) -> String {
    format!("Uncaught {}", message)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
