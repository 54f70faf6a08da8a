pub mod context;
pub mod conversions;
pub mod decoder;

mod bindings;
mod executor;


pub use context::Engine;
pub use conversions::ValueKind;
pub use decoder::{GlobalContextBinding, ScriptBuffer, ScriptRequest};
