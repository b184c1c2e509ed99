//! Common error types used throughout gallery-util.
//!
//! The planner reports malformed input and misconfiguration through this
//! type; the binary wraps it in `anyhow` context where it crosses into I/O.

/// Common error type for gallery-util.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed arguments, such as a zero row count or an empty column set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A caller misconfiguration, such as a column set too wide for the
    /// bound-parameter limit.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A requested path or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new InvalidArgument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new Configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
