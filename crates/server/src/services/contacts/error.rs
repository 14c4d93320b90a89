//! Contact service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during contact operations.
#[derive(Debug, Error)]
pub enum ContactError {
    /// A required field is blank or the category is unknown.
    #[error("{0}")]
    Validation(String),

    /// No contact with this id belongs to the requesting user.
    #[error("Contact not found")]
    NotFound,

    /// The requesting user no longer exists.
    #[error("User not found")]
    OwnerNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
