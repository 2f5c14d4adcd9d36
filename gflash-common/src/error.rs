//! Common error types for gflash

use thiserror::Error;

/// Common result type for gflash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the server and the player
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog document is not a valid array of song records
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures that happened while reading the file, as opposed to
    /// decoding its contents
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
