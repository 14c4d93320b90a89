//! Contact domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use contact_book_core::{ContactCategory, ContactId, UserId};

/// A contact record, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ContactId,
    /// Owning user. Fixed at creation.
    #[serde(rename = "user")]
    pub owner: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub category: ContactCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user-editable fields of a contact, already validated.
///
/// Used for both inserts and full-row updates. There is no owner
/// field: the owner always comes from the authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub category: ContactCategory,
}
