//! Configuration for engines and interactive sessions.
//!
//! Both structs follow the same builder shape: start from `new()` (the
//! defaults), chain `with_*` setters, then call `validate()` before use.
//! [`crate::Engine::with_config`] and [`crate::Session::new`] validate for you.

/// Specifier used for interactive evaluation.
pub const REPL_SPECIFIER: &str = "<repl>";

/// Global name the last session result is bound to.
pub const LAST_RESULT_BINDING: &str = "_";

/// Engine-wide settings.
///
/// # Example
///
/// ```
/// use scriptbridge_core::EngineConfig;
///
/// let config = EngineConfig::new().with_default_specifier("main.js");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Specifier `run` compiles under. `None` runs scripts anonymously.
    pub default_specifier: Option<String>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the specifier used by `run` and `run_bounded`.
    pub fn with_default_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.default_specifier = Some(specifier.into());
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the default specifier is empty or spans several lines.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(specifier) = &self.default_specifier {
            validate_specifier(specifier)?;
        }
        Ok(())
    }
}

/// Settings for a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Prompt printed before each line of input.
    pub prompt: String,
    /// Specifier every session expression compiles under.
    pub specifier: String,
    /// Global the last result is stored in. `None` disables the binding.
    pub last_result_binding: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            specifier: REPL_SPECIFIER.to_string(),
            last_result_binding: Some(LAST_RESULT_BINDING.to_string()),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.specifier = specifier.into();
        self
    }

    /// Stores each result under `name` on the global object.
    pub fn with_last_result_binding(mut self, name: impl Into<String>) -> Self {
        self.last_result_binding = Some(name.into());
        self
    }

    pub fn without_last_result_binding(mut self) -> Self {
        self.last_result_binding = None;
        self
    }

    /// Validates the session configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The prompt is empty or contains a line break
    /// - The specifier is empty or contains a line break
    /// - The result binding is not a plain identifier
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.is_empty() {
            return Err("prompt must not be empty".to_string());
        }
        if self.prompt.contains(['\n', '\r']) {
            return Err("prompt must be a single line".to_string());
        }

        validate_specifier(&self.specifier)?;

        if let Some(name) = &self.last_result_binding {
            if !is_identifier(name) {
                return Err(format!("'{}' is not a valid binding name", name));
            }
        }

        Ok(())
    }
}

fn validate_specifier(specifier: &str) -> Result<(), String> {
    if specifier.is_empty() {
        return Err("specifier must not be empty".to_string());
    }
    if specifier.contains(['\n', '\r']) {
        return Err("specifier must be a single line".to_string());
    }
    Ok(())
}

/// ASCII subset of ECMAScript identifier syntax.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
