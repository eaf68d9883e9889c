//! Error types for kneeplan

use thiserror::Error;

/// Main error type for kneeplan operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for kneeplan operations
pub type Result<T> = std::result::Result<T, Error>;
