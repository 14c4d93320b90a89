//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required registration field was absent or blank.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Password too short.
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Invalid email format.
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] contact_book_core::EmailError),

    /// Email already belongs to an account.
    #[error("Email already registered")]
    EmailTaken,

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on the request.
    #[error("No token provided")]
    MissingToken,

    /// Bearer token failed verification.
    #[error("Invalid token")]
    InvalidToken,

    /// Token was valid but its user is gone.
    #[error("User not found")]
    UserNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Token signing error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
