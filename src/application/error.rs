//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add session-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("no active editor")]
    NoActiveEditor,

    #[error("file already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("editor not found for file: {0}")]
    EditorNotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("session state error: {message}")]
    SessionState { message: String },
}

impl ApplicationError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
