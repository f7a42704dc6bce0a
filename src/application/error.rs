//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add registry and script context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no family tree selected")]
    NoTreeSelected,

    #[error("family tree not found: {0}")]
    TreeNotFound(String),

    #[error("family tree already exists: {0}")]
    TreeAlreadyExists(String),

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ApplicationError>,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// The error without line context.
    pub fn root_cause(&self) -> &ApplicationError {
        match self {
            ApplicationError::Line { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
