//! Boundary value <-> Boa `JsValue` conversions
//!
//! The result encoder dispatches on a closed [`ValueKind`] enumeration and
//! applies a fixed, deliberately lossy policy per kind:
//!
//! | Kind | Boundary value |
//! |------|----------------|
//! | undefined | `Value::Undefined` |
//! | null | `Value::Null` |
//! | boolean | `Value::Boolean` |
//! | number | `Value::Number`, narrowed with ToInt32 |
//! | string | `Value::String`, UTF-8 copy, lone surrogates replaced by U+FFFD |
//! | symbol | `Value::Symbol`, same symbol |
//! | object | `Value::Object`, empty placeholder |
//! | function | `Value::Function`, anonymous trampoline to the original |
//! | external | absent |
//! | bigint | `Value::BigInt`, narrowed with ToBigInt64 |
//!
//! The numeric narrowing is the contract, not an accident:
//! `9007199254740993` comes back as `0` and `2n ** 64n + 5n` as `5`.
//!
//! The reverse direction ([`to_js_value`]) is what the context binder uses.
//! [`json_to_js_value`] is the structure-preserving alternative for hosts that
//! hold JSON.

use boa_engine::{
    js_string,
    native_function::NativeFunction,
    object::{builtins::JsArray, FunctionObjectBuilder, JsObject},
    value::{JsValue, Type},
    Context, JsBigInt, JsData, JsString,
};
use boa_gc::{Finalize, Trace};
use serde_json::Value as JsonValue;

use crate::error::{BridgeError, Result};
use crate::value::{ExternalRef, HostFunction, ObjectPlaceholder, SymbolRef, Value};

/// Engine-side payload of an external value.
#[derive(Debug, Trace, Finalize, JsData)]
pub(crate) struct ExternalData {
    tag: u64,
}

/// Dynamic type of an engine value, as seen by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Object,
    Function,
    External,
    BigInt,
}

impl ValueKind {
    /// Classifies `value`. Externals and callables are split out of objects.
    pub fn of(value: &JsValue) -> Self {
        match value.get_type() {
            Type::Undefined => ValueKind::Undefined,
            Type::Null => ValueKind::Null,
            Type::Boolean => ValueKind::Boolean,
            Type::Number => ValueKind::Number,
            Type::String => ValueKind::String,
            Type::Symbol => ValueKind::Symbol,
            Type::BigInt => ValueKind::BigInt,
            Type::Object => match value.as_object() {
                Some(object) if object.is::<ExternalData>() => ValueKind::External,
                Some(object) if object.is_callable() => ValueKind::Function,
                _ => ValueKind::Object,
            },
        }
    }
}

/// Converts an engine result into a boundary value.
///
/// Returns `Ok(None)` for externals, which have no boundary representation.
///
/// # Errors
///
/// Returns `BridgeError::Conversion` if reading the payload of the detected
/// kind fails (for example ToInt32 on a number throws).
pub fn encode(value: &JsValue, ctx: &mut Context) -> Result<Option<Value>> {
    let kind = ValueKind::of(value);
    tracing::trace!(?kind, "encoding result");

    let encoded = match kind {
        ValueKind::Undefined => Value::Undefined,
        ValueKind::Null => Value::Null,
        ValueKind::Boolean => {
            let b = value
                .as_boolean()
                .ok_or_else(|| conversion_error(kind, "missing boolean payload"))?;
            Value::Boolean(b)
        }
        ValueKind::Number => {
            let n = value
                .to_i32(ctx)
                .map_err(|e| conversion_error(kind, e))?;
            Value::Number(n)
        }
        ValueKind::String => {
            let s = value
                .as_string()
                .ok_or_else(|| conversion_error(kind, "missing string payload"))?;
            // Lone surrogates become U+FFFD.
            Value::String(s.to_std_string_lossy())
        }
        ValueKind::Symbol => {
            let symbol = value
                .as_symbol()
                .ok_or_else(|| conversion_error(kind, "missing symbol payload"))?;
            Value::Symbol(SymbolRef::new(symbol.clone()))
        }
        ValueKind::Object => Value::Object(ObjectPlaceholder),
        ValueKind::Function => {
            let target = value
                .as_object()
                .ok_or_else(|| conversion_error(kind, "missing function object"))?;
            Value::Function(reregister_function(target.clone(), ctx))
        }
        ValueKind::External => return Ok(None),
        ValueKind::BigInt => {
            let n = value
                .to_big_int64(ctx)
                .map_err(|e| conversion_error(kind, e))?;
            Value::BigInt(n)
        }
    };

    Ok(Some(encoded))
}

/// Converts a boundary value into an engine value.
///
/// Placeholders become fresh empty objects; symbols and functions map back to
/// the engine objects they wrap; externals become opaque engine objects
/// carrying the host's tag.
pub fn to_js_value(value: &Value, ctx: &mut Context) -> JsValue {
    match value {
        Value::Undefined => JsValue::undefined(),
        Value::Null => JsValue::null(),
        Value::Boolean(b) => JsValue::new(*b),
        Value::Number(n) => JsValue::new(*n),
        Value::String(s) => JsValue::new(JsString::from(s.as_str())),
        Value::Symbol(symbol) => JsValue::new(symbol.symbol().clone()),
        Value::Object(ObjectPlaceholder) => JsObject::with_object_proto(ctx.intrinsics()).into(),
        Value::Function(function) => function.function().clone().into(),
        Value::External(external) => external_object(*external).into(),
        Value::BigInt(n) => JsValue::new(JsBigInt::from(*n)),
    }
}

/// Convert serde_json::Value to Boa JsValue.
///
/// Unlike [`to_js_value`] this keeps structure: arrays and objects are built
/// element by element.
///
/// # Errors
///
/// Returns `BridgeError::Conversion` if:
/// - A number is out of range for JavaScript's Number type
/// - Object property creation fails
/// - Array push operation fails
pub fn json_to_js_value(json: JsonValue, ctx: &mut Context) -> Result<JsValue> {
    match json {
        JsonValue::Null => Ok(JsValue::null()),
        JsonValue::Bool(b) => Ok(JsValue::new(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                return Ok(JsValue::new(i));
            }
            n.as_f64()
                .map(JsValue::new)
                .ok_or_else(|| BridgeError::Conversion(format!("Number out of range: {}", n)))
        }
        JsonValue::String(s) => Ok(JsValue::new(JsString::from(s.as_str()))),
        JsonValue::Array(arr) => {
            let js_array = JsArray::new(ctx);
            for (i, v) in arr.into_iter().enumerate() {
                let js_value = json_to_js_value(v, ctx)?;
                js_array.push(js_value, ctx).map_err(|e| {
                    BridgeError::Conversion(format!("Failed to push array element {}: {}", i, e))
                })?;
            }
            Ok(js_array.into())
        }
        JsonValue::Object(obj) => {
            let js_obj = JsObject::with_object_proto(ctx.intrinsics());

            for (key, value) in obj {
                let js_value = json_to_js_value(value, ctx)?;
                js_obj
                    .create_data_property_or_throw(JsString::from(key.as_str()), js_value, ctx)
                    .map_err(|e| {
                        BridgeError::Conversion(format!("Failed to set property '{}': {}", key, e))
                    })?;
            }

            Ok(js_obj.into())
        }
    }
}

/// Wraps `target` in a fresh, anonymous native function that forwards every
/// call to it.
fn reregister_function(target: JsObject, ctx: &mut Context) -> HostFunction {
    let trampoline = FunctionObjectBuilder::new(
        ctx.realm(),
        NativeFunction::from_copy_closure_with_captures(
            |this, args, target: &JsObject, context| target.call(this, args, context),
            target,
        ),
    )
    .name(js_string!())
    .length(0)
    .build();

    HostFunction::new(trampoline)
}

fn external_object(external: ExternalRef) -> JsObject {
    JsObject::from_proto_and_data(None::<JsObject>, ExternalData { tag: external.tag() })
}

/// Reads the host tag back out of an external engine object.
pub(crate) fn external_tag(value: &JsValue) -> Option<u64> {
    let object = value.as_object()?;
    let data = object.downcast_ref::<ExternalData>()?;
    Some(data.tag)
}

fn conversion_error(kind: ValueKind, cause: impl std::fmt::Display) -> BridgeError {
    BridgeError::Conversion(format!("{:?}: {}", kind, cause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;
    use serde_json::json;

    fn eval(ctx: &mut Context, src: &str) -> JsValue {
        ctx.eval(Source::from_bytes(src)).expect("script should evaluate")
    }

    fn encode_src(src: &str) -> Option<Value> {
        let mut ctx = Context::default();
        let value = eval(&mut ctx, src);
        encode(&value, &mut ctx).expect("encoding should succeed")
    }

    #[test]
    fn test_kind_of_primitives() {
        let mut ctx = Context::default();
        assert_eq!(ValueKind::of(&eval(&mut ctx, "undefined")), ValueKind::Undefined);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "null")), ValueKind::Null);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "false")), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "1.5")), ValueKind::Number);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "'s'")), ValueKind::String);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "Symbol()")), ValueKind::Symbol);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "10n")), ValueKind::BigInt);
    }

    #[test]
    fn test_kind_splits_objects() {
        let mut ctx = Context::default();
        assert_eq!(ValueKind::of(&eval(&mut ctx, "({})")), ValueKind::Object);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "[1, 2]")), ValueKind::Object);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "(function f() {})")), ValueKind::Function);
        assert_eq!(ValueKind::of(&eval(&mut ctx, "() => 1")), ValueKind::Function);

        let external = to_js_value(&Value::External(ExternalRef::new(3)), &mut ctx);
        assert_eq!(ValueKind::of(&external), ValueKind::External);
    }

    #[test]
    fn test_encode_undefined_and_null() {
        assert_eq!(encode_src("undefined"), Some(Value::Undefined));
        assert_eq!(encode_src("null"), Some(Value::Null));
    }

    #[test]
    fn test_encode_boolean() {
        assert_eq!(encode_src("1 < 2"), Some(Value::Boolean(true)));
        assert_eq!(encode_src("false"), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_encode_number_narrows_to_int32() {
        assert_eq!(encode_src("1 + 2"), Some(Value::Number(3)));
        assert_eq!(encode_src("-7"), Some(Value::Number(-7)));
        assert_eq!(encode_src("1.9"), Some(Value::Number(1)));
        assert_eq!(encode_src("-1.9"), Some(Value::Number(-1)));
        assert_eq!(encode_src("NaN"), Some(Value::Number(0)));
        assert_eq!(encode_src("Infinity"), Some(Value::Number(0)));
        assert_eq!(encode_src("2147483648"), Some(Value::Number(i32::MIN)));
        assert_eq!(encode_src("4294967297"), Some(Value::Number(1)));
        assert_eq!(encode_src("9007199254740993"), Some(Value::Number(0)));
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(encode_src("'a' + 'b'"), Some(Value::from("ab")));
        assert_eq!(encode_src("''"), Some(Value::from("")));
        assert_eq!(encode_src("'héllo 🌍'"), Some(Value::from("héllo 🌍")));
    }

    #[test]
    fn test_encode_lone_surrogate_is_replaced() {
        let mut ctx = Context::default();
        let value = eval(&mut ctx, "'a\\uD800b'");
        let encoded = encode(&value, &mut ctx).unwrap();
        assert_eq!(encoded, Some(Value::String("a\u{FFFD}b".to_string())));
    }

    #[test]
    fn test_encode_symbol_preserves_identity() {
        let mut ctx = Context::default();
        let value = eval(&mut ctx, "globalThis.sym = Symbol('tag'); sym");
        let first = encode(&value, &mut ctx).unwrap().unwrap();
        let again = eval(&mut ctx, "sym");
        let second = encode(&again, &mut ctx).unwrap().unwrap();

        assert_eq!(first, second);
        let Value::Symbol(symbol) = first else {
            panic!("expected a symbol, got {:?}", first);
        };
        assert_eq!(symbol.description().as_deref(), Some("tag"));

        let other = eval(&mut ctx, "Symbol('tag')");
        let other = encode(&other, &mut ctx).unwrap().unwrap();
        assert_ne!(Value::Symbol(symbol), other);
    }

    #[test]
    fn test_encode_object_is_empty_placeholder() {
        assert_eq!(encode_src("({ foo: 42 })"), Some(Value::Object(ObjectPlaceholder)));
        assert_eq!(encode_src("[1, 2, 3]"), Some(Value::Object(ObjectPlaceholder)));
        assert_eq!(encode_src("new Date(0)"), Some(Value::Object(ObjectPlaceholder)));
    }

    #[test]
    fn test_encode_function_is_callable_trampoline() {
        let mut ctx = Context::default();
        let value = eval(&mut ctx, "(function add(a, b) { return a + b; })");
        let encoded = encode(&value, &mut ctx).unwrap().unwrap();
        let Value::Function(function) = encoded else {
            panic!("expected a function, got {:?}", encoded);
        };

        let result = function
            .function()
            .call(&JsValue::undefined(), &[JsValue::new(2), JsValue::new(3)], &mut ctx)
            .unwrap();
        assert_eq!(result.to_i32(&mut ctx).unwrap(), 5);
    }

    #[test]
    fn test_encode_function_discards_name() {
        let mut ctx = Context::default();
        let value = eval(&mut ctx, "(function add(a, b) { return a + b; })");
        let Some(Value::Function(function)) = encode(&value, &mut ctx).unwrap() else {
            panic!("expected a function");
        };

        ctx.global_object()
            .set(js_string!("wrapped"), function.function().clone(), true, &mut ctx)
            .unwrap();
        let name = eval(&mut ctx, "wrapped.name");
        assert_eq!(encode(&name, &mut ctx).unwrap(), Some(Value::from("")));
    }

    #[test]
    fn test_encode_external_is_absent() {
        let mut ctx = Context::default();
        let external = to_js_value(&Value::External(ExternalRef::new(9)), &mut ctx);
        assert_eq!(encode(&external, &mut ctx).unwrap(), None);
        assert_eq!(external_tag(&external), Some(9));
    }

    #[test]
    fn test_encode_bigint_narrows_to_int64() {
        assert_eq!(encode_src("42n"), Some(Value::BigInt(42)));
        assert_eq!(encode_src("-42n"), Some(Value::BigInt(-42)));
        assert_eq!(encode_src("2n ** 64n + 5n"), Some(Value::BigInt(5)));
        assert_eq!(encode_src("2n ** 63n"), Some(Value::BigInt(i64::MIN)));
    }

    #[test]
    fn test_to_js_value_primitives() {
        let mut ctx = Context::default();
        assert!(to_js_value(&Value::Undefined, &mut ctx).is_undefined());
        assert!(to_js_value(&Value::Null, &mut ctx).is_null());
        assert_eq!(to_js_value(&Value::Boolean(true), &mut ctx).as_boolean(), Some(true));
        assert_eq!(to_js_value(&Value::Number(42), &mut ctx).as_number(), Some(42.0));

        let s = to_js_value(&Value::from("hi"), &mut ctx);
        assert_eq!(encode(&s, &mut ctx).unwrap(), Some(Value::from("hi")));

        let big = to_js_value(&Value::BigInt(-3), &mut ctx);
        assert_eq!(ValueKind::of(&big), ValueKind::BigInt);
        assert_eq!(encode(&big, &mut ctx).unwrap(), Some(Value::BigInt(-3)));
    }

    #[test]
    fn test_to_js_value_placeholder_is_fresh_empty_object() {
        let mut ctx = Context::default();
        let a = to_js_value(&Value::Object(ObjectPlaceholder), &mut ctx);
        let b = to_js_value(&Value::Object(ObjectPlaceholder), &mut ctx);

        let a = a.as_object().unwrap().clone();
        let b = b.as_object().unwrap().clone();
        assert!(!JsObject::equals(&a, &b));
        assert!(a.own_property_keys(&mut ctx).unwrap().is_empty());
    }

    #[test]
    fn test_json_to_js_value_keeps_structure() {
        let mut ctx = Context::default();
        let value = json_to_js_value(json!({"name": "test", "items": [1, 2, 3]}), &mut ctx).unwrap();
        ctx.global_object()
            .set(js_string!("data"), value, true, &mut ctx)
            .unwrap();

        let name = eval(&mut ctx, "data.name");
        assert_eq!(encode(&name, &mut ctx).unwrap(), Some(Value::from("test")));
        let total = eval(&mut ctx, "data.items.reduce((a, b) => a + b, 0)");
        assert_eq!(encode(&total, &mut ctx).unwrap(), Some(Value::Number(6)));
    }

    #[test]
    fn test_json_to_js_value_floats() {
        let mut ctx = Context::default();
        let value = json_to_js_value(json!(2.5), &mut ctx).unwrap();
        assert_eq!(value.as_number(), Some(2.5));
        let value = json_to_js_value(json!(5_000_000_000i64), &mut ctx).unwrap();
        assert_eq!(value.as_number(), Some(5_000_000_000.0));
    }
}
