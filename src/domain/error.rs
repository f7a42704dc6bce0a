//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Reported conditions of tree operations.
///
/// Every variant is a no-op outcome: the tree is unchanged when an operation
/// returns one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("root member already exists: {0}")]
    RootAlreadyExists(String),

    #[error("parent not found: {0}")]
    ParentNotFound(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("spouse {spouse} not found for member {member}")]
    SpouseNotFound { member: String, spouse: String },

    #[error("spouse {spouse} already exists for member {member}")]
    SpouseAlreadyExists { member: String, spouse: String },

    #[error("member has no parent (root or unreachable): {0}")]
    NoParent(String),

    #[error("name already used in tree: {0}")]
    DuplicateName(String),
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
