use thiserror::Error;

/// Failures of a single bridge call.
///
/// None of these are recovered inside the bridge. The typed API returns them
/// to the caller; the host surface in [`crate::host`] collapses every one of
/// them into an absent result. Engine-level exception state is kept separately
/// on the [`crate::Engine`] and survives until the host takes it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Reading the source string or length hint out of a host slot failed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The engine rejected the script outright (syntax error and friends).
    #[error("Script execution error: {0}")]
    Execution(String),

    /// An exception is pending in the engine.
    #[error("Pending exception: {0}")]
    PendingException(String),

    /// Converting the result into a boundary value failed.
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Engine is not initialized")]
    NotInitialized,

    #[error("Engine is already initialized")]
    AlreadyInitialized,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BridgeError {
    /// Whether the engine already holds an exception describing this failure.
    pub(crate) fn is_engine_reported(&self) -> bool {
        matches!(self, BridgeError::Execution(_) | BridgeError::PendingException(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
