//! Authentication service.
//!
//! Password registration and login, bearer token verification, and profile
//! updates. Passwords are hashed with Argon2id; tokens come from
//! [`TokenKeys`].

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{debug, info, instrument};

use contact_book_core::{Email, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{NewUser, User};
use crate::services::token::TokenKeys;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash checked when no account matches a login, so unknown emails pay the
/// same Argon2 cost as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("not-a-real-account").ok());

/// Registration input as submitted. Blank fields count as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

/// Authentication service.
///
/// Borrowed per request from the application state.
pub struct AuthService<'a> {
    users: &'a dyn UserRepository,
    tokens: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserRepository, tokens: &'a TokenKeys) -> Self {
        Self { users, tokens }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new user and issue their first token.
    ///
    /// Checks run in order: all fields present, password length, password
    /// confirmation, email format, email availability.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields`, `AuthError::WeakPassword`,
    /// `AuthError::PasswordMismatch` or `AuthError::InvalidEmail` for bad
    /// input, and `AuthError::EmailTaken` if the email is already registered.
    #[instrument(skip_all)]
    pub async fn register(&self, input: Registration<'_>) -> Result<String, AuthError> {
        let name = input.name.trim();
        if name.is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
            || input.password_confirm.is_empty()
        {
            return Err(AuthError::MissingFields);
        }

        validate_password(input.password)?;
        if input.password != input.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let email = Email::parse(input.email)?;
        let password_hash = hash_password(input.password)?;

        let user = self
            .users
            .create(NewUser {
                name,
                email: &email,
                password_hash: &password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(self.tokens.issue(user.id)?)
    }

    /// Log in with email and password.
    ///
    /// An unknown email, a malformed email and a wrong password all produce
    /// the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(reject_unknown_account(password));
        };

        let Some((user, password_hash)) = self.users.get_with_password_hash(&email).await? else {
            return Err(reject_unknown_account(password));
        };

        verify_password(password, &password_hash)?;

        debug!(user_id = %user.id, "User logged in");
        Ok(self.tokens.issue(user.id)?)
    }

    // =========================================================================
    // Bearer Tokens
    // =========================================================================

    /// Verify a bearer token and return the user it was issued to.
    ///
    /// Does not touch the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` if `token` is `None` or blank, and
    /// `AuthError::InvalidToken` if verification fails for any reason.
    pub fn authenticate(&self, token: Option<&str>) -> Result<UserId, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.tokens
            .verify(token)
            .map(|claims| claims.user_id)
            .map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                AuthError::InvalidToken
            })
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Get the user an authenticated request belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user no longer exists.
    pub async fn current_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update name and/or email. Absent or blank fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email,
    /// `AuthError::EmailTaken` if it belongs to another account, and
    /// `AuthError::UserNotFound` if the user no longer exists.
    #[instrument(skip(self, name, email))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let email = email
            .filter(|e| !e.trim().is_empty())
            .map(Email::parse)
            .transpose()?;

        let user = self
            .users
            .update_profile(user_id, name, email.as_ref())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?
            .ok_or(AuthError::UserNotFound)?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Burn one verification against [`DUMMY_HASH`] and fail.
fn reject_unknown_account(password: &str) -> AuthError {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    AuthError::InvalidCredentials
}
