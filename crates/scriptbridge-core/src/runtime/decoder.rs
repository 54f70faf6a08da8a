//! Request decoding
//!
//! Turns host slots into a [`ScriptRequest`]: an owned, NUL-terminated UTF-8
//! buffer plus the optional length bound it was read with.
//!
//! # Length bounds
//!
//! A bound counts the terminator, the way C string APIs size their buffers.
//! With a bound of `n` the buffer holds at most `n - 1` bytes of text followed
//! by the NUL, and copying stops at the last complete UTF-8 character that
//! fits. The bound is trusted: passing anything smaller than the encoded
//! length plus one truncates the script, and the truncated text is what gets
//! executed. It is the caller's job to supply a large enough bound.

use crate::error::{BridgeError, Result};
use crate::value::Value;

/// Owned script text, always NUL-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBuffer {
    bytes: Vec<u8>,
}

impl ScriptBuffer {
    /// Copies all of `source`.
    pub fn new(source: &str) -> Self {
        let mut bytes = Vec::with_capacity(source.len() + 1);
        bytes.extend_from_slice(source.as_bytes());
        bytes.push(0);
        Self { bytes }
    }

    /// Copies as much of `source` as fits in a buffer of `capacity` bytes,
    /// terminator included.
    pub fn bounded(source: &str, capacity: usize) -> Self {
        let mut limit = source.len().min(capacity.saturating_sub(1));
        while !source.is_char_boundary(limit) {
            limit -= 1;
        }

        // Sized by what is copied, not by the caller's bound.
        let mut bytes = Vec::with_capacity(limit + 1);
        bytes.extend_from_slice(&source.as_bytes()[..limit]);
        bytes.push(0);
        Self { bytes }
    }

    /// The raw buffer, terminator included.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Text up to the first NUL byte.
    ///
    /// An interior NUL ends the script early, exactly like the terminator.
    pub fn text(&self) -> Result<&str> {
        let end = self.bytes.iter().position(|&b| b == 0).unwrap_or(self.bytes.len());
        std::str::from_utf8(&self.bytes[..end])
            .map_err(|e| BridgeError::Decode(format!("script is not valid UTF-8: {}", e)))
    }
}

/// A decoded script and the bound it was read with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub buffer: ScriptBuffer,
    pub length_bound: Option<usize>,
}

impl ScriptRequest {
    pub fn new(source: &str) -> Self {
        Self {
            buffer: ScriptBuffer::new(source),
            length_bound: None,
        }
    }

    /// See the module docs for how the bound is applied.
    pub fn bounded(source: &str, length_bound: usize) -> Self {
        Self {
            buffer: ScriptBuffer::bounded(source, length_bound),
            length_bound: Some(length_bound),
        }
    }
}

/// A global property assignment requested by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalContextBinding {
    pub property_name: String,
    pub value: Value,
}

/// Decodes `run(source, lengthHint?)` arguments.
pub fn decode_run_args(argv: &[Value]) -> Result<ScriptRequest> {
    let source = string_slot(argv, 0, "source")?;

    match argv.get(1) {
        None | Some(Value::Undefined) => Ok(ScriptRequest::new(source)),
        Some(hint) => {
            let bound = length_hint(hint)?;
            tracing::trace!(bound, "decoding bounded script");
            Ok(ScriptRequest::bounded(source, bound))
        }
    }
}

/// Decodes `eval(source, specifier)` arguments.
pub fn decode_eval_args(argv: &[Value]) -> Result<(ScriptRequest, String)> {
    let source = string_slot(argv, 0, "source")?;
    let specifier = string_slot(argv, 1, "specifier")?;
    Ok((ScriptRequest::new(source), specifier.to_string()))
}

/// Decodes `set_context(propertyName, value)` arguments.
pub fn decode_binding_args(argv: &[Value]) -> Result<GlobalContextBinding> {
    let property_name = string_slot(argv, 0, "property name")?;
    let value = argv
        .get(1)
        .cloned()
        .ok_or_else(|| BridgeError::Decode("missing value argument".into()))?;

    Ok(GlobalContextBinding {
        property_name: property_name.to_string(),
        value,
    })
}

fn string_slot<'a>(argv: &'a [Value], index: usize, what: &str) -> Result<&'a str> {
    match argv.get(index) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(BridgeError::Decode(format!(
            "{} must be a string, got {}",
            what,
            other.type_name()
        ))),
        None => Err(BridgeError::Decode(format!("missing {} argument", what))),
    }
}

fn length_hint(value: &Value) -> Result<usize> {
    let hint = match value {
        Value::Number(n) => i64::from(*n),
        Value::BigInt(n) => *n,
        other => {
            return Err(BridgeError::Decode(format!(
                "length hint must be an unsigned integer, got {}",
                other.type_name()
            )))
        }
    };

    usize::try_from(hint)
        .map_err(|_| BridgeError::Decode(format!("length hint must not be negative, got {}", hint)))
}
