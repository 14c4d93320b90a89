//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use contact_book_core::{Email, UserId};

/// An account holder.
///
/// Never carries the password hash; repositories hand the hash out separately
/// and only to the login path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to insert a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    /// Argon2id PHC string.
    pub password_hash: &'a str,
}
