//! Process-wide engine handle and the host boundary surface.
//!
//! The embedding initializes one engine with [`init`] when it starts and tears
//! it down with [`shutdown`]. In between, [`run`], [`eval`] and
//! [`set_context`] take their arguments as host value slots and report every
//! failure as an absent result. The cause is left behind as the engine's
//! pending exception; read it with [`take_pending_exception`].
//!
//! The engine is single-threaded, so the handle lives in a thread-local slot:
//! it belongs to the thread that called [`init`].
//!
//! ```
//! use scriptbridge_core::{host, EngineConfig, Value};
//!
//! host::init(EngineConfig::default()).unwrap();
//! host::set_context(&[Value::from("x"), Value::from(40)]);
//! assert_eq!(host::run(&[Value::from("x + 2")]), Some(Value::Number(42)));
//! host::shutdown().unwrap();
//! ```

use boa_engine::JsError;
use std::cell::RefCell;

use crate::config::EngineConfig;
use crate::error::{BridgeError, Result};
use crate::runtime::Engine;
use crate::value::Value;

thread_local! {
    static ENGINE: RefCell<Option<Engine>> = const { RefCell::new(None) };
}

/// Create this thread's engine.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if an engine exists, or `InvalidConfig` if
/// `config` does not validate.
pub fn init(config: EngineConfig) -> Result<()> {
    ENGINE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(BridgeError::AlreadyInitialized);
        }
        *slot = Some(Engine::with_config(config)?);
        tracing::debug!("engine initialized");
        Ok(())
    })
}

/// Drop this thread's engine, along with any pending exception.
pub fn shutdown() -> Result<()> {
    let engine = ENGINE.with(|slot| slot.borrow_mut().take());
    match engine {
        Some(engine) => {
            drop(engine);
            tracing::debug!("engine shut down");
            Ok(())
        }
        None => Err(BridgeError::NotInitialized),
    }
}

pub fn is_initialized() -> bool {
    ENGINE.with(|slot| slot.borrow().is_some())
}

/// Run `f` against this thread's engine.
///
/// Calls must not nest: `f` cannot call back into this module.
pub fn with_engine<R>(f: impl FnOnce(&mut Engine) -> R) -> Result<R> {
    ENGINE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let engine = slot.as_mut().ok_or(BridgeError::NotInitialized)?;
        Ok(f(engine))
    })
}

/// `run(source, lengthHint?)`: the marshalled result, or absent.
pub fn run(argv: &[Value]) -> Option<Value> {
    absent_on_failure("run", with_engine(|engine| engine.run_args(argv)))
}

/// `eval(source, specifier)`: the marshalled result, or absent.
pub fn eval(argv: &[Value]) -> Option<Value> {
    absent_on_failure("eval", with_engine(|engine| engine.eval_args(argv)))
}

/// `set_context(propertyName, value)`.
pub fn set_context(argv: &[Value]) {
    if let Err(err) = with_engine(|engine| engine.set_context_args(argv)).and_then(|r| r) {
        tracing::debug!(error = %err, "set_context failed");
    }
}

pub fn has_pending_exception() -> bool {
    with_engine(|engine| engine.has_pending_exception()).unwrap_or(false)
}

/// Take and clear this thread's pending exception.
pub fn take_pending_exception() -> Option<JsError> {
    with_engine(|engine| engine.take_pending_exception())
        .ok()
        .flatten()
}

fn absent_on_failure(op: &str, result: Result<Result<Option<Value>>>) -> Option<Value> {
    match result.and_then(|r| r) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(op, error = %err, "returning absent result");
            None
        }
    }
}
