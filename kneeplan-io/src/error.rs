//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for kneeplan_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(io) => kneeplan_core::Error::Io(io),
            IoError::FileNotFound { .. } | IoError::ParseError { .. } => {
                kneeplan_core::Error::InvalidData(e.to_string())
            }
            IoError::WriteError { .. } => kneeplan_core::Error::Io(std::io::Error::other(e.to_string())),
        }
    }
}
