// Copyright 2025 ScriptBridge Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! ScriptBridge Core
//!
//! Hands script source to an embedded Boa JavaScript engine, runs it, and
//! brings the result back as a typed boundary [`Value`]. Hosts can also
//! pre-populate the engine's global object.
//!
//! ```
//! use scriptbridge_core::{Engine, Value};
//!
//! let mut engine = Engine::new();
//! engine.set_context("x", Value::Number(40)).unwrap();
//! assert_eq!(engine.run("x + 2").unwrap(), Some(Value::Number(42)));
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod inspect;
pub mod runtime;
pub mod session;
pub mod value;

pub use config::{EngineConfig, SessionConfig};
pub use error::{BridgeError, Result};
pub use runtime::{Engine, ValueKind};
pub use session::{Reply, Session};
pub use value::{ExternalRef, HostFunction, ObjectPlaceholder, SymbolRef, Value};
