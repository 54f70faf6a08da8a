//! Script compilation, execution and the exception gate.

use boa_engine::{Context, JsError, JsResult, JsValue, Script, Source};
use std::path::Path;

use crate::error::{BridgeError, Result};

/// Parses `text` under `specifier` (anonymous when `None`).
///
/// The specifier only shows up in diagnostics; it is never resolved.
pub(crate) fn compile(ctx: &mut Context, text: &str, specifier: Option<&str>) -> JsResult<Script> {
    let source = Source::from_bytes(text);
    match specifier {
        Some(specifier) => Script::parse(source.with_path(Path::new(specifier)), None, ctx),
        None => Script::parse(source, None, ctx),
    }
}

/// Runs a compiled script against the current global object.
pub(crate) fn execute(ctx: &mut Context, script: &Script) -> JsResult<JsValue> {
    script.evaluate(ctx)
}

/// Fails while an exception is pending. Never clears it.
pub(crate) fn gate(pending: Option<&JsError>) -> Result<()> {
    match pending {
        Some(err) => Err(BridgeError::PendingException(err.to_string())),
        None => Ok(()),
    }
}
