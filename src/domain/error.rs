//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rejected document edits and history boundaries.
/// None of them is fatal; the caller decides how to surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced id does not exist, or the target is the root element.
    #[error("element not found: {0}")]
    NotFound(String),

    #[error("element with id '{0}' already exists in the tree")]
    DuplicateId(String),

    /// The operation would break the html/head/body/title skeleton.
    #[error("'{id}' is a reserved element: cannot {action}")]
    ReservedElement { id: String, action: &'static str },

    #[error("no actions to undo")]
    NothingToUndo,

    #[error("no actions to redo")]
    NothingToRedo,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
