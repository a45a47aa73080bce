//! Common error types for the territory injector

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for injector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the injector crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or unreadable XML document
    #[error("XML error in {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build an XML error for a document that has no backing file yet
    pub fn xml(message: impl Into<String>) -> Self {
        Error::Xml {
            path: PathBuf::from("<memory>"),
            message: message.into(),
        }
    }

    /// Attach a source path to an XML error, leaving other variants untouched
    pub fn with_path(self, source: impl Into<PathBuf>) -> Self {
        match self {
            Error::Xml { message, .. } => Error::Xml {
                path: source.into(),
                message,
            },
            other => other,
        }
    }

    /// True for errors that must abort the run before any processing
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
