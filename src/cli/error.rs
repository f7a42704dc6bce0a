//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => application_exit_code(app.root_cause()),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Script { .. } | ApplicationError::EmptyName(_) => crate::exitcode::DATAERR,
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
        ApplicationError::Domain(DomainError::DuplicateName(_))
        | ApplicationError::Domain(DomainError::RootAlreadyExists(_))
        | ApplicationError::Domain(DomainError::SpouseAlreadyExists { .. })
        | ApplicationError::TreeAlreadyExists(_) => crate::exitcode::DATAERR,
        ApplicationError::Domain(_)
        | ApplicationError::TreeNotFound(_)
        | ApplicationError::NoTreeSelected => crate::exitcode::NOINPUT,
        ApplicationError::Line { .. } => crate::exitcode::SOFTWARE,
    }
}
