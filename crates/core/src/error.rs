use thiserror::Error;

/// Result type alias for murmur-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the murmur chat client
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote chat service could not be reached or answered garbage
    #[error("transport error: {0}")]
    Transport(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}
