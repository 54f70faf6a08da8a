//! Line-oriented interactive session
//!
//! A [`Session`] feeds one line at a time to an [`Engine`]. Plain lines are
//! evaluated under the session specifier and their result is stored in the
//! global `_`. Lines starting with `.` are commands:
//!
//! - `.help` - list the commands
//! - `.exit` - end the session
//!
//! Sessions keep no history; each line is a single bridge call.

use crate::config::SessionConfig;
use crate::error::{BridgeError, Result};
use crate::inspect;
use crate::runtime::Engine;
use crate::value::Value;

const COMMANDS: &[(&str, &str)] = &[
    ("help", "Print this help message"),
    ("exit", "Exit the session"),
];

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Command { keyword: &'a str, args: Vec<&'a str> },
    Expression(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Input::Empty;
        }

        match line.strip_prefix('.') {
            Some(rest) => {
                let mut words = rest.split_whitespace();
                let keyword = words.next().unwrap_or("");
                Input::Command {
                    keyword,
                    args: words.collect(),
                }
            }
            None => Input::Expression(line),
        }
    }
}

/// What the session produced for one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to print.
    Nothing,
    /// Evaluation finished; `None` means the result had no boundary form.
    Value(Option<Value>),
    /// Evaluation threw; carries the rendered exception.
    Exception(String),
    Help(String),
    InvalidKeyword(String),
    Exit,
}

impl Reply {
    /// The text to show for this reply, if any.
    pub fn render(&self) -> Option<String> {
        match self {
            Reply::Nothing | Reply::Exit => None,
            Reply::Value(value) => Some(inspect::write_value(value.as_ref())),
            Reply::Exception(message) => Some(inspect::write_exception(message)),
            Reply::Help(text) => Some(text.clone()),
            Reply::InvalidKeyword(_) => Some("Invalid REPL keyword".to_string()),
        }
    }
}

pub struct Session {
    engine: Engine,
    config: SessionConfig,
    exited: bool,
}

impl Session {
    /// Create a session with its own engine.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_engine(Engine::new(), config)
    }

    /// Create a session around an existing engine, keeping its globals.
    pub fn with_engine(engine: Engine, config: SessionConfig) -> Result<Self> {
        config.validate().map_err(BridgeError::InvalidConfig)?;
        Ok(Self {
            engine,
            config,
            exited: false,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Evaluate `expr` and bind the result to the last-result global.
    ///
    /// The binding only changes when evaluation succeeds. Results with no
    /// boundary form bind `undefined`.
    pub fn run(&mut self, expr: &str) -> Result<Option<Value>> {
        let value = self.engine.eval(expr, &self.config.specifier)?;

        if let Some(name) = &self.config.last_result_binding {
            let bound = value.clone().unwrap_or(Value::Undefined);
            self.engine.set_context(name, bound)?;
        }

        Ok(value)
    }

    /// Handle one line of input.
    ///
    /// Exceptions are taken off the engine here, so the next line starts
    /// clean.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        if self.exited {
            return Reply::Exit;
        }

        match Input::parse(line) {
            Input::Empty => Reply::Nothing,
            Input::Command { keyword, .. } => self.command(keyword),
            Input::Expression(expr) => match self.run(expr) {
                Ok(value) => Reply::Value(value),
                Err(err) => {
                    let message = self
                        .engine
                        .take_exception_message()
                        .unwrap_or_else(|| err.to_string());
                    Reply::Exception(message)
                }
            },
        }
    }

    fn command(&mut self, keyword: &str) -> Reply {
        match keyword {
            "help" => Reply::Help(help_text()),
            "exit" => {
                tracing::debug!("session exit requested");
                self.exited = true;
                Reply::Exit
            }
            other => Reply::InvalidKeyword(other.to_string()),
        }
    }
}

fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(keyword, help)| format!(".{:<8}{}", keyword, help))
        .collect::<Vec<_>>()
        .join("\n")
}
