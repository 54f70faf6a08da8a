//! Global context binding
//!
//! Installs host values on the engine's global object. Bindings are ordinary
//! own data properties (writable, enumerable, configurable when newly
//! created), so every later script in the same engine sees them, and scripts
//! may overwrite them.

use boa_engine::{Context, JsResult, JsString, JsValue};

/// Assigns `value` to `property_name` on the global object.
///
/// Uses an ordinary `[[Set]]`, so rebinding a name a script declared with
/// `var` updates that variable instead of failing.
pub(crate) fn bind_global(ctx: &mut Context, property_name: &str, value: JsValue) -> JsResult<()> {
    let global = ctx.global_object();
    global.set(JsString::from(property_name), value, true, ctx)?;
    Ok(())
}
