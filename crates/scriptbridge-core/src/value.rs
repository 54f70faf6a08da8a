//! Boundary values
//!
//! [`Value`] is the only representation that crosses between the host and the
//! engine. Primitives are plain Rust data. The three reference kinds
//! ([`SymbolRef`], [`HostFunction`], [`ExternalRef`]) are opaque: they keep the
//! engine object alive but never hand out the raw engine handle.
//!
//! Values holding engine references are tied to the engine that produced them
//! and, like the engine itself, are neither `Send` nor `Sync`.

use boa_engine::{object::builtins::JsFunction, JsObject, JsSymbol};
use std::fmt;

/// A value on the host side of the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    /// Numbers are narrowed to 32 bits with ECMAScript ToInt32 semantics.
    Number(i32),
    String(String),
    Symbol(SymbolRef),
    /// Objects cross as empty placeholders; properties are not copied.
    Object(ObjectPlaceholder),
    Function(HostFunction),
    External(ExternalRef),
    /// BigInts are narrowed to 64 bits (modulo 2^64).
    BigInt(i64),
}

impl Value {
    /// Name of the variant, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::External(_) => "external",
            Value::BigInt(_) => "bigint",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&HostFunction> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ExternalRef> for Value {
    fn from(external: ExternalRef) -> Self {
        Value::External(external)
    }
}

/// Stand-in for an engine object.
///
/// Carries no properties. Binding it into the engine creates a fresh, empty
/// object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectPlaceholder;

/// The same engine symbol, wrapped.
///
/// Two refs compare equal only when they wrap the same symbol.
#[derive(Clone, PartialEq)]
pub struct SymbolRef(JsSymbol);

impl SymbolRef {
    pub(crate) fn new(symbol: JsSymbol) -> Self {
        Self(symbol)
    }

    pub(crate) fn symbol(&self) -> &JsSymbol {
        &self.0
    }

    /// The symbol's description, if it has one.
    pub fn description(&self) -> Option<String> {
        self.0.description().map(|d| d.to_std_string_escaped())
    }
}

impl fmt::Debug for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SymbolRef").field(&self.description()).finish()
    }
}

/// A callable re-registered on the host side.
///
/// The wrapped function is an anonymous engine trampoline that forwards
/// `this` and its arguments to the original callable. The original name is
/// not kept. Invoke it through [`crate::Engine::call_function`].
#[derive(Clone)]
pub struct HostFunction(JsFunction);

impl HostFunction {
    pub(crate) fn new(function: JsFunction) -> Self {
        Self(function)
    }

    pub(crate) fn function(&self) -> &JsFunction {
        &self.0
    }
}

impl PartialEq for HostFunction {
    fn eq(&self, other: &Self) -> bool {
        JsObject::equals(&self.0, &other.0)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostFunction(anonymous)")
    }
}

/// Opaque host data carried through the engine untouched.
///
/// The tag is whatever the host wants it to be (an index, a key into its own
/// table, ...). Externals bound into the engine come back from the result
/// encoder as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalRef {
    tag: u64,
}

impl ExternalRef {
    pub fn new(tag: u64) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }
}
