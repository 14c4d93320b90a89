//! Credential store.
//!
//! # Tables
//!
//! - `users` - account holders with their Argon2id password hashes
//! - `contacts` - contact records, each owned by one user
//!
//! Services talk to the store through [`UserRepository`] and
//! [`ContactRepository`]. [`PgStore`] is the production implementation;
//! [`MemoryStore`] has the same semantics without a database and backs the
//! test suites.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p contact-book-cli -- migrate
//! ```

pub mod contacts;
pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use contact_book_core::{ContactId, Email, UserId};

use crate::models::{Contact, ContactDraft, NewUser, User};

pub use memory::MemoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The owning user does not exist.
    #[error("owner {0} does not exist")]
    MissingOwner(UserId),
}

/// Persistence for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email (compared
    /// case-insensitively) is already taken.
    async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError>;

    /// Look up a user and their password hash by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Overwrite whichever of name/email are given. Returns `None` if the
    /// user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email belongs to another
    /// account.
    async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&Email>,
    ) -> Result<Option<User>, RepositoryError>;

    /// Cheap round-trip used by the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unreachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Persistence for contacts.
///
/// Every method that touches an existing contact takes the owner and matches
/// on `(id, owner)`, so a contact belonging to someone else is
/// indistinguishable from one that does not exist.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// All contacts of `owner`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn list(&self, owner: UserId) -> Result<Vec<Contact>, RepositoryError>;

    /// Insert a contact owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingOwner` if `owner` is not a user.
    async fn insert(&self, owner: UserId, draft: &ContactDraft)
    -> Result<Contact, RepositoryError>;

    /// Fetch one of `owner`'s contacts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be queried.
    async fn get(&self, id: ContactId, owner: UserId) -> Result<Option<Contact>, RepositoryError>;

    /// Replace the editable fields of one of `owner`'s contacts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the update fails.
    async fn update(
        &self,
        id: ContactId,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, RepositoryError>;

    /// Delete one of `owner`'s contacts. Returns `false` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    async fn delete(&self, id: ContactId, owner: UserId) -> Result<bool, RepositoryError>;
}

/// `PostgreSQL`-backed store.
///
/// Implements both repositories over one pool; see `users.rs` and
/// `contacts.rs` for the queries.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Map a foreign-key violation on the owner column to
/// `RepositoryError::MissingOwner`.
fn missing_owner_on_fk(e: sqlx::Error, owner: UserId) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::MissingOwner(owner);
    }
    RepositoryError::Database(e)
}
