use thiserror::Error;

/// Core error type for the Merx runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A caller violated an operation's contract; raised before any I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity type name could not be resolved through the type registry
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// List store query failed
    #[error("List store error: {0}")]
    ListStoreError(String),

    /// Identifier resolution failed
    #[error("Identifier resolution error: {0}")]
    IdResolutionError(String),

    /// Cache collaborator failed
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The operation observed cancellation and aborted
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Pipeline execution error
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// A configured block name has no registered instance
    #[error("Pipeline block not found: {0}")]
    BlockNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<merx_cache::CacheError> for CoreError {
    fn from(err: merx_cache::CacheError) -> Self {
        CoreError::CacheError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}
