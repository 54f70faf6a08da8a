use boa_engine::{Context, JsError, JsNativeError, JsResult, JsValue};
use serde_json::Value as JsonValue;

use crate::config::EngineConfig;
use crate::error::{BridgeError, Result};
use crate::runtime::{
    bindings,
    conversions::{encode, json_to_js_value, to_js_value},
    decoder::{self, ScriptRequest},
    executor,
};
use crate::value::{HostFunction, Value};

/// An embedded Boa engine plus its pending-exception slot.
///
/// Every call runs the same pipeline: decode, compile, execute, check the
/// exception gate, encode. A failure at any step leaves an exception pending
/// (engine errors keep their own exception, bridge errors raise a
/// `TypeError`). The exception stays pending until the host takes it with
/// [`Engine::take_pending_exception`]; until then every execution, call and
/// binding fails fast.
///
/// Global state persists across calls. There is no isolation between
/// scripts and no timeout: a script that never terminates blocks the caller.
///
/// Boa's `Context` is single-threaded, so `Engine` is neither `Send` nor
/// `Sync`. Keep it on the thread that created it (see [`crate::host`] for a
/// per-thread process handle).
pub struct Engine {
    ctx: Context,
    pending: Option<JsError>,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self {
            ctx: Context::default(),
            pending: None,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine after validating `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate().map_err(BridgeError::InvalidConfig)?;
        Ok(Self {
            ctx: Context::default(),
            pending: None,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute `source` under the configured default specifier.
    ///
    /// Returns `Ok(None)` when the result has no boundary representation.
    pub fn run(&mut self, source: &str) -> Result<Option<Value>> {
        let specifier = self.config.default_specifier.clone();
        self.execute(ScriptRequest::new(source), specifier.as_deref())
    }

    /// Execute at most `length_hint - 1` bytes of `source`.
    ///
    /// The hint is trusted as-is; see [`crate::runtime::decoder`] for how a
    /// short hint truncates the script.
    pub fn run_bounded(&mut self, source: &str, length_hint: usize) -> Result<Option<Value>> {
        let specifier = self.config.default_specifier.clone();
        self.execute(ScriptRequest::bounded(source, length_hint), specifier.as_deref())
    }

    /// Execute `source` with an explicit diagnostic specifier.
    pub fn eval(&mut self, source: &str, specifier: &str) -> Result<Option<Value>> {
        self.execute(ScriptRequest::new(source), Some(specifier))
    }

    /// `run(source, lengthHint?)` over host slots.
    pub fn run_args(&mut self, argv: &[Value]) -> Result<Option<Value>> {
        let request = decoder::decode_run_args(argv).map_err(|e| self.fail(e))?;
        let specifier = self.config.default_specifier.clone();
        self.execute(request, specifier.as_deref())
    }

    /// `eval(source, specifier)` over host slots.
    pub fn eval_args(&mut self, argv: &[Value]) -> Result<Option<Value>> {
        let (request, specifier) = decoder::decode_eval_args(argv).map_err(|e| self.fail(e))?;
        self.execute(request, Some(&specifier))
    }

    /// `set_context(propertyName, value)` over host slots.
    pub fn set_context_args(&mut self, argv: &[Value]) -> Result<()> {
        let binding = decoder::decode_binding_args(argv).map_err(|e| self.fail(e))?;
        self.set_context(&binding.property_name, binding.value)
    }

    /// Install `value` as a global named `property_name`.
    pub fn set_context(&mut self, property_name: &str, value: Value) -> Result<()> {
        executor::gate(self.pending.as_ref())?;
        tracing::debug!(property_name, kind = value.type_name(), "binding global");

        let js_value = to_js_value(&value, &mut self.ctx);
        self.bind(property_name, js_value)
    }

    /// Install a JSON document as a global, keeping its structure.
    pub fn set_context_json(&mut self, property_name: &str, value: JsonValue) -> Result<()> {
        executor::gate(self.pending.as_ref())?;
        tracing::debug!(property_name, "binding JSON global");

        let js_value = json_to_js_value(value, &mut self.ctx).map_err(|e| self.fail(e))?;
        self.bind(property_name, js_value)
    }

    /// Invoke a function previously returned by this engine.
    ///
    /// Goes through the same exception gate and encoder as script execution.
    pub fn call_function(&mut self, function: &HostFunction, args: &[Value]) -> Result<Option<Value>> {
        executor::gate(self.pending.as_ref())?;

        let js_args: Vec<JsValue> = args.iter().map(|arg| to_js_value(arg, &mut self.ctx)).collect();
        tracing::debug!(argc = js_args.len(), "calling host function");

        let result = function.function().call(&JsValue::undefined(), &js_args, &mut self.ctx);
        let result = self.record_exception(result);
        executor::gate(self.pending.as_ref())?;

        self.encode_result(&result)
    }

    pub fn has_pending_exception(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_exception(&self) -> Option<&JsError> {
        self.pending.as_ref()
    }

    /// Take and clear the pending exception.
    pub fn take_pending_exception(&mut self) -> Option<JsError> {
        self.pending.take()
    }

    /// Take the pending exception and render it as `Name: message`.
    pub fn take_exception_message(&mut self) -> Option<String> {
        let err = self.pending.take()?;
        Some(self.describe(&err))
    }

    /// Render an exception as `Name: message` when it is an error object,
    /// or as the thrown value otherwise.
    ///
    /// Backtrace positions are left out.
    pub fn describe(&mut self, err: &JsError) -> String {
        match err.try_native(&mut self.ctx) {
            Ok(native) if native.message().is_empty() => native.kind.to_string(),
            Ok(native) => format!("{}: {}", native.kind, native.message()),
            Err(_) => match err.as_opaque() {
                Some(value) => match value.to_string(&mut self.ctx) {
                    Ok(text) => text.to_std_string_escaped(),
                    Err(_) => value.display().to_string(),
                },
                None => err.to_string(),
            },
        }
    }

    /// Decode -> compile -> execute -> gate -> encode.
    fn execute(&mut self, request: ScriptRequest, specifier: Option<&str>) -> Result<Option<Value>> {
        executor::gate(self.pending.as_ref())?;

        let text = request.buffer.text().map_err(|e| self.fail(e))?;
        tracing::debug!(
            specifier = specifier.unwrap_or("<anonymous>"),
            bytes = text.len(),
            bounded = request.length_bound.is_some(),
            "executing script"
        );

        let script = match executor::compile(&mut self.ctx, text, specifier) {
            Ok(script) => script,
            Err(err) => {
                let message = err.to_string();
                self.pending = Some(err);
                return Err(BridgeError::Execution(message));
            }
        };

        let result = executor::execute(&mut self.ctx, &script);
        let result = self.record_exception(result);
        executor::gate(self.pending.as_ref())?;

        self.encode_result(&result)
    }

    /// A thrown exception becomes the pending exception; the result is then
    /// never looked at.
    fn record_exception(&mut self, result: JsResult<JsValue>) -> JsValue {
        result.unwrap_or_else(|err| {
            self.pending = Some(err);
            JsValue::undefined()
        })
    }

    fn encode_result(&mut self, result: &JsValue) -> Result<Option<Value>> {
        encode(result, &mut self.ctx).map_err(|e| self.fail(e))
    }

    fn bind(&mut self, property_name: &str, value: JsValue) -> Result<()> {
        bindings::bind_global(&mut self.ctx, property_name, value).map_err(|err| {
            let message = err.to_string();
            self.pending = Some(err);
            BridgeError::Execution(message)
        })
    }

    /// Records a bridge-side failure as a pending `TypeError`.
    fn fail(&mut self, err: BridgeError) -> BridgeError {
        if !err.is_engine_reported() && self.pending.is_none() {
            self.pending = Some(JsNativeError::typ().with_message(err.to_string()).into());
        }
        tracing::debug!(error = %err, "bridge call failed");
        err
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
