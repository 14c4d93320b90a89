//! Bearer token minting.
//!
//! # Usage
//!
//! ```bash
//! contact-book-cli token --user-id 42
//! ```
//!
//! Prints a token with the same claims and expiry as one issued at login,
//! signed with `CONTACT_BOOK_JWT_SECRET`. Useful for poking at the API with
//! curl without knowing the user's password.

use contact_book_core::UserId;
use contact_book_server::config::{self, ConfigError};
use contact_book_server::db::{self, PgStore, RepositoryError, UserRepository};
use contact_book_server::services::TokenKeys;
use contact_book_server::services::token::TokenError;
use thiserror::Error;

/// Errors that can occur while minting a token.
#[derive(Debug, Error)]
pub enum TokenCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("No user with id {0}")]
    UnknownUser(UserId),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Mint a token for an existing user.
///
/// # Errors
///
/// Returns `TokenCommandError::UnknownUser` if the id does not exist, or a
/// configuration/database error.
pub async fn mint(user_id: UserId) -> Result<String, TokenCommandError> {
    let secret = config::jwt_secret_from_env()?;
    let database_url = config::database_url_from_env()?;

    let store = PgStore::new(db::create_pool(&database_url).await?);
    let user = store
        .get_by_id(user_id)
        .await?
        .ok_or(TokenCommandError::UnknownUser(user_id))?;

    tracing::info!(user_id = %user.id, "Minting token");
    Ok(TokenKeys::new(&secret).issue(user.id)?)
}
