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

//! # ScriptBridge CLI
//!
//! Command-line host for the scriptbridge engine bridge.
//!
//! - `scriptbridge eval <expr>`: evaluate one expression and print the result
//! - `scriptbridge run <file>`: run a script file, tagged with its path
//! - `scriptbridge repl`: line-by-line interactive session
//!
//! Every command accepts `--set name=<json>` to pre-populate globals before
//! the script runs. The helpers here do the work so the binary stays a thin
//! argument dispatcher.

use anyhow::{anyhow, bail, Context as _, Result};
use scriptbridge_core::{inspect, Engine, Session, Value};
use serde_json::Value as JsonValue;
use std::io::{BufRead, Write};

/// Result of evaluating one script from the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Finished; `None` when the result has no boundary form.
    Value(Option<Value>),
    /// Threw, or failed to compile; carries the rendered exception.
    Exception(String),
}

impl Outcome {
    /// Text for stdout on success, or stderr on failure.
    pub fn render(&self) -> String {
        match self {
            Outcome::Value(value) => inspect::write_value(value.as_ref()),
            Outcome::Exception(message) => inspect::write_exception(message),
        }
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Outcome::Exception(_))
    }
}

/// Parse a `name=<json>` global binding.
///
/// # Errors
///
/// Returns an error if the `=` is missing, the name is empty, or the value is
/// not valid JSON.
pub fn parse_binding(binding: &str) -> Result<(String, JsonValue)> {
    let (name, json) = binding
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid binding '{}': expected name=<json>", binding))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid binding '{}': name is empty", binding);
    }

    let value = serde_json::from_str(json)
        .with_context(|| format!("Invalid JSON in binding '{}'", name))?;
    Ok((name.to_string(), value))
}

/// Install every `name=<json>` binding as a global on `engine`.
pub fn apply_bindings(engine: &mut Engine, bindings: &[String]) -> Result<()> {
    for binding in bindings {
        let (name, value) = parse_binding(binding)?;
        tracing::debug!(name = %name, "applying --set binding");
        engine
            .set_context_json(&name, value)
            .with_context(|| format!("Failed to bind global '{}'", name))?;
    }
    Ok(())
}

/// Run `source` on `engine`, bounded by `length_hint` when given.
///
/// Exceptions are taken off the engine, so it is ready for the next call.
pub fn evaluate(engine: &mut Engine, source: &str, length_hint: Option<usize>) -> Outcome {
    let result = match length_hint {
        Some(hint) => engine.run_bounded(source, hint),
        None => engine.run(source),
    };

    match result {
        Ok(value) => Outcome::Value(value),
        Err(err) => {
            let message = engine
                .take_exception_message()
                .unwrap_or_else(|| err.to_string());
            Outcome::Exception(message)
        }
    }
}

/// Drive `session` from `input` until end of input or `.exit`.
///
/// The prompt and each reply are written to `output`.
pub fn run_repl<R: BufRead, W: Write>(session: &mut Session, mut input: R, mut output: W) -> Result<()> {
    let mut line = String::new();

    while !session.is_exited() {
        write!(output, "{}", session.prompt())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        if let Some(text) = session.handle_line(&line).render() {
            writeln!(output, "{}", text)?;
        }
    }

    Ok(())
}
