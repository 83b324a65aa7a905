use thiserror::Error;

/// ocusage error types
#[derive(Error, Debug)]
pub enum OcusageError {
    /// Failed to parse JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache operation failed
    #[error("cache error: {0}")]
    Cache(String),

    /// Pricing load or lookup failed
    #[error("pricing error: {0}")]
    Pricing(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Requested item does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for ocusage
pub type Result<T> = std::result::Result<T, OcusageError>;

/// Why a single model pricing entry was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("missing or invalid field `{0}`")]
    MissingField(&'static str),
}
